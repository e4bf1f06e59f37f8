//! HTTP layer: auth, default query, status mapping, retry, body decoding.
//!
//! This is the ONLY place for status code handling. The resource modules
//! never interpret status codes.

use std::time::Duration;

use rand::Rng;
use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::Credential;
use crate::error::{EvalsError, EvalsResult};

use super::helpers::parse_error_message;

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Connection handle shared by every call (holds reqwest client, credential, defaults).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) credential: Credential,
    pub(crate) default_query: Vec<(String, String)>,
    pub(crate) max_retries: u32,
}

impl HttpBackend {
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> EvalsResult<T> {
        let response = self
            .execute(Method::GET, path, |request| request.query(query))
            .await?;
        decode(response, path).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> EvalsResult<T> {
        let response = self
            .execute(Method::POST, path, |request| request.json(body))
            .await?;
        decode(response, path).await
    }

    /// POST without a body (run cancellation). A 2xx without a body yields `empty()`.
    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        empty: impl FnOnce() -> T,
    ) -> EvalsResult<T> {
        let response = self.execute(Method::POST, path, |request| request).await?;
        decode_or(response, path, empty).await
    }

    /// DELETE; a 2xx without a body (e.g. 204) yields `empty()`.
    pub(crate) async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
        empty: impl FnOnce() -> T,
    ) -> EvalsResult<T> {
        let response = self
            .execute(Method::DELETE, path, |request| request)
            .await?;
        decode_or(response, path, empty).await
    }

    /// Multipart upload; the form is rebuilt for every attempt.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: impl Fn() -> reqwest::multipart::Form,
    ) -> EvalsResult<T> {
        let response = self
            .execute(Method::POST, path, |request| request.multipart(form()))
            .await?;
        decode(response, path).await
    }

    /// Send a request, retrying transient failures of idempotent methods.
    ///
    /// POSTs create or cancel resources and are sent exactly once: a retry
    /// after a lost response could create a second file, eval or run.
    async fn execute<F>(&self, method: Method, path: &str, build: F) -> EvalsResult<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path);
        let max_retries = if is_idempotent(&method) {
            self.max_retries
        } else {
            0
        };
        let mut retries = 0;

        loop {
            debug!(method = %method, url = %url, attempt = retries + 1, "sending request");
            let request = build(self.client.request(method.clone(), &url));

            match self.send_once(request, path).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && retries < max_retries => {
                    retries += 1;
                    let backoff = backoff_for(&e, retries);

                    warn!(
                        error = %e,
                        retry = retries,
                        max_retries = max_retries,
                        backoff_ms = backoff.as_millis(),
                        "retrying request"
                    );

                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, mut request: RequestBuilder, path: &str) -> EvalsResult<Response> {
        if !self.default_query.is_empty() {
            request = request.query(&self.default_query);
        }

        if let Some(bearer) = self.credential.bearer() {
            request = request.header(AUTHORIZATION, bearer);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let status_text = status.to_string();
        let body = response.text().await.unwrap_or_default();
        let message = parse_error_message(&body, &status_text);

        Err(match status.as_u16() {
            401 | 403 => EvalsError::Unauthorized { message },
            404 => EvalsError::NotFound {
                resource: path.trim_start_matches('/').to_string(),
            },
            429 => EvalsError::RateLimited { retry_after },
            code @ 400..=499 => EvalsError::Rejected {
                status: code,
                message,
            },
            code @ 500..=599 => EvalsError::Server {
                status: code,
                message,
            },
            code => EvalsError::Network {
                message: format!("HTTP {}: {}", code, message),
            },
        })
    }
}

fn is_idempotent(method: &Method) -> bool {
    *method == Method::GET || *method == Method::DELETE
}

/// Delay before retry number `retry` (1-based).
///
/// A server-supplied `Retry-After` wins (±10%, at least 100ms); otherwise
/// the delay is drawn uniformly from `0..=2^retry` seconds. Both are capped
/// at [`MAX_BACKOFF`].
fn backoff_for(err: &EvalsError, retry: u32) -> Duration {
    let mut rng = rand::thread_rng();

    if let EvalsError::RateLimited {
        retry_after: Some(retry_after),
    } = err
    {
        let base_ms = retry_after.min(&MAX_BACKOFF).as_millis() as f64;
        let factor: f64 = rng.gen_range(0.9..=1.1);
        return Duration::from_millis(((base_ms * factor).round() as u64).max(100));
    }

    let ceiling = Duration::from_secs(1 << retry.min(5)).min(MAX_BACKOFF);
    Duration::from_millis(rng.gen_range(0..=ceiling.as_millis() as u64).max(10))
}

async fn read_body(response: Response) -> EvalsResult<Vec<u8>> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| EvalsError::Network {
            message: format!("failed to read response body: {}", e),
        })
}

fn parse<T: DeserializeOwned>(bytes: &[u8], path: &str) -> EvalsResult<T> {
    serde_json::from_slice(bytes).map_err(|e| EvalsError::InvalidResponse {
        message: format!("failed to parse response from {}: {}", path, e),
    })
}

async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> EvalsResult<T> {
    parse(&read_body(response).await?, path)
}

async fn decode_or<T: DeserializeOwned>(
    response: Response,
    path: &str,
    empty: impl FnOnce() -> T,
) -> EvalsResult<T> {
    let bytes = read_body(response).await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(empty());
    }
    parse(&bytes, path)
}
