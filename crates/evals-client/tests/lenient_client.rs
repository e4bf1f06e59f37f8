//! Integration tests for the log-and-sentinel client.
//!
//! Each remote failure must come back as its fixed placeholder, and the
//! upload path must not issue calls after a failed create.

use std::io::Write;

use evals_client::{EvalClient, EvalsConfig, EvalsError, LenientClient};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn create_test_client(mock_server: &MockServer) -> LenientClient {
    init_tracing();
    let config = EvalsConfig::default()
        .with_url(mock_server.uri())
        .with_api_key("test-key");
    LenientClient::from_config(config).expect("failed to create client")
}

fn local_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

async fn mount_file_listing(mock_server: &MockServer, names: &[&str]) {
    let data: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({"id": format!("file-{i}"), "filename": name, "purpose": "evals"}))
        .collect();

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": data,
            "has_more": false
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_upload_returns_existing_id_without_create() {
    let mock_server = MockServer::start().await;
    mount_file_listing(&mock_server, &["a.json"]).await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-new"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server).await;
    let local = local_file("different content");

    let id = client
        .upload_eval_file("a.json", local.path())
        .await
        .expect("upload failed");

    assert_eq!(id, "file-0");
}

#[tokio::test]
async fn test_upload_creates_exactly_once() {
    let mock_server = MockServer::start().await;
    mount_file_listing(&mock_server, &[]).await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_string_contains("evals"))
        .and(body_string_contains("filename=\"b.json\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "file-b",
            "filename": "b.json",
            "purpose": "evals"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server).await;
    let local = local_file("{\"q\": 1}\n");

    let id = client
        .upload_eval_file("b.json", local.path())
        .await
        .expect("upload failed");

    assert_eq!(id, "file-b");
}

#[tokio::test]
async fn test_failed_create_returns_empty_id() {
    let mock_server = MockServer::start().await;
    mount_file_listing(&mock_server, &[]).await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(500).set_body_string("storage unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server).await;
    let local = local_file("{}\n");

    let id = client
        .upload_eval_file("c.json", local.path())
        .await
        .expect("create failures are absorbed");

    assert_eq!(id, "");
    // One listing plus one create, nothing after.
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_upload_propagates_listing_and_io_errors() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server).await;

    // No listing mock mounted: wiremock answers 404.
    let err = client
        .upload_eval_file("a.json", "/tmp/a.json")
        .await
        .unwrap_err();
    assert!(matches!(err, EvalsError::NotFound { .. }));

    mount_file_listing(&mock_server, &[]).await;
    let err = client
        .upload_eval_file("missing.json", "/definitely/not/here/missing.json")
        .await
        .unwrap_err();
    assert!(matches!(err, EvalsError::Io { .. }));
    assert!(err.is_local());
}

#[tokio::test]
async fn test_retrieve_missing_eval_returns_placeholder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/evals/missing-123"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server).await;
    let eval = client.retrieve_eval("missing-123").await;

    assert_eq!(eval.name, "Unknown Evaluation (missing-123)");
    assert!(eval.id.is_empty());
}

#[tokio::test]
async fn test_retrieve_eval_passes_through_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/evals/eval_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "eval_1",
            "name": "qa-accuracy"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server).await;
    let eval = client.retrieve_eval("eval_1").await;

    assert_eq!(eval.id, "eval_1");
    assert_eq!(eval.name, "qa-accuracy");
}

#[tokio::test]
async fn test_create_eval_sentinel() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/evals"))
        .and(body_string_contains("good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "eval_1"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/evals"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "invalid schema"}
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server).await;

    let created = client
        .create_eval("good", json!({"type": "custom"}), vec![])
        .await;
    assert_eq!(created.as_deref(), Some("eval_1"));

    let failed = client.create_eval("bad", json!({}), vec![]).await;
    assert_eq!(failed, None);
}

#[tokio::test]
async fn test_delete_and_cancel_report_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/evals/eval_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "eval.deleted",
            "deleted": true,
            "eval_id": "eval_1"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/evals/eval_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "run_1",
            "status": "canceled"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/evals/eval_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "eval.run.deleted",
            "deleted": true,
            "run_id": "run_1"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server).await;

    assert!(client.delete_eval("eval_1").await);
    assert!(client.cancel_run("eval_1", "run_1").await);
    assert!(client.delete_run("eval_1", "run_1").await);

    // Anything else is unmocked and fails.
    assert!(!client.delete_eval("eval_2").await);
    assert!(!client.cancel_run("eval_1", "run_2").await);
    assert!(!client.delete_run("eval_1", "run_2").await);
}

#[tokio::test]
async fn test_run_sentinels() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/evals/eval_1/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "run_1",
            "eval_id": "eval_1",
            "status": "queued"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/evals/eval_2/runs"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server).await;
    let data_source = json!({"type": "jsonl", "source": {"type": "file_id", "id": "file-1"}});

    let run = client
        .create_run("eval_1", "baseline", data_source.clone(), None)
        .await
        .expect("run should be created");
    assert_eq!(run.id, "run_1");

    assert!(client
        .create_run("eval_2", "baseline", data_source, None)
        .await
        .is_none());
    assert!(client.retrieve_run("eval_1", "run_404").await.is_none());
    assert!(client
        .retrieve_output_item("eval_1", "run_1", "item_404")
        .await
        .is_none());
}

#[tokio::test]
async fn test_list_failures_return_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server).await;

    assert!(client.list_evals().await.is_empty());
    assert!(client.list_runs("eval_1").await.is_empty());
    assert!(client.list_output_items("eval_1", "run_1").await.is_empty());
}

#[tokio::test]
async fn test_wraps_typed_client() {
    let mock_server = MockServer::start().await;
    let config = EvalsConfig::default()
        .with_url(mock_server.uri())
        .with_api_key("test-key");

    let typed = EvalClient::new(config).unwrap();
    let lenient = LenientClient::from(typed.clone());

    assert_eq!(lenient.inner().base_url(), typed.base_url());
}

#[tokio::test]
async fn test_failed_create_is_not_retried() {
    init_tracing();
    let mock_server = MockServer::start().await;
    mount_file_listing(&mock_server, &[]).await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    // A retry budget covers reads only; the create is still sent once.
    let config = EvalsConfig::default()
        .with_url(mock_server.uri())
        .with_api_key("test-key")
        .with_max_retries(2);
    let client = LenientClient::from_config(config).unwrap();
    let local = local_file("{}\n");

    let id = client.upload_eval_file("d.json", local.path()).await.unwrap();
    assert_eq!(id, "");

    let posts = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.method.as_str() == "POST")
        .count();
    assert_eq!(posts, 1);
}

#[tokio::test]
async fn test_bodyless_acknowledgements_count_as_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/evals/eval_1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/evals/eval_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/evals/eval_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server).await;

    assert!(client.delete_eval("eval_1").await);
    assert!(client.cancel_run("eval_1", "run_1").await);
    assert!(client.delete_run("eval_1", "run_1").await);
}
