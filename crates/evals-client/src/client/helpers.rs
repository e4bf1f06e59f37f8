//! Pure helpers: endpoint paths and error body parsing (no HTTP, no status logic).

/// Maximum number of characters of a non-JSON error body kept in messages.
const MAX_RAW_MESSAGE: usize = 200;

pub(crate) fn files_path() -> String {
    "/files".to_string()
}

pub(crate) fn file_path(file_id: &str) -> String {
    format!("/files/{}", file_id)
}

pub(crate) fn evals_path() -> String {
    "/evals".to_string()
}

pub(crate) fn eval_path(eval_id: &str) -> String {
    format!("/evals/{}", eval_id)
}

pub(crate) fn runs_path(eval_id: &str) -> String {
    format!("/evals/{}/runs", eval_id)
}

pub(crate) fn run_path(eval_id: &str, run_id: &str) -> String {
    format!("/evals/{}/runs/{}", eval_id, run_id)
}

pub(crate) fn output_items_path(eval_id: &str, run_id: &str) -> String {
    format!("/evals/{}/runs/{}/output_items", eval_id, run_id)
}

pub(crate) fn output_item_path(eval_id: &str, run_id: &str, item_id: &str) -> String {
    format!(
        "/evals/{}/runs/{}/output_items/{}",
        eval_id, run_id, item_id
    )
}

/// Extract a readable message from an error response body.
///
/// Expected format: `{"error": {"message": "...", "code": "..."}}`.
/// Falls back to the (truncated) raw body, then to the status text.
pub(crate) fn parse_error_message(body: &str, status_text: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let error = json.get("error").unwrap_or(&json);
        let message = error
            .get("message")
            .and_then(|v| v.as_str())
            .filter(|m| !m.is_empty());
        let code = error.get("code").and_then(|v| v.as_str());

        match (message, code) {
            (Some(message), Some(code)) => return format!("{} ({})", message, code),
            (Some(message), None) => return message.to_string(),
            _ => {}
        }
    }

    if body.trim().is_empty() {
        status_text.to_string()
    } else {
        body.chars().take(MAX_RAW_MESSAGE).collect()
    }
}
