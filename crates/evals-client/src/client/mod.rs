//! Evaluation API client.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.
//! Resource methods live in files.rs, evals.rs and runs.rs.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::auth::Credential;
use crate::config::{EvalsConfig, Provider};
use crate::error::{EvalsError, EvalsResult};

mod evals;
mod files;
pub(crate) mod helpers;
pub(crate) mod http;
mod runs;

pub use files::UploadOutcome;

use http::HttpBackend;

/// User agent for evaluation API requests.
pub const EVALS_USER_AGENT: &str = concat!("evals-client/", env!("CARGO_PKG_VERSION"));

/// Client for the files and evals endpoints.
///
/// Every method performs one remote call (paginators: one per page) and
/// returns the typed result; no errors are swallowed here. See
/// [`LenientClient`](crate::LenientClient) for the log-and-sentinel variant.
#[derive(Debug, Clone)]
pub struct EvalClient {
    http: HttpBackend,
    provider: Provider,
}

impl EvalClient {
    /// Create a client; fails if the URL or the API key is missing.
    pub fn new(config: EvalsConfig) -> EvalsResult<Self> {
        let credential = Credential::from(config.api_key.clone());
        if !credential.is_configured() {
            return Err(EvalsError::Config {
                message: format!(
                    "no API key for provider {} (set {})",
                    config.provider,
                    config.provider.api_key_var()
                ),
            });
        }

        Self::with_credential(config, credential)
    }

    /// Create a client with an explicit credential (may be [`Credential::None`]).
    pub fn with_credential(config: EvalsConfig, credential: Credential) -> EvalsResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(EvalsError::Config {
                message: format!("no endpoint configured for provider {}", config.provider),
            });
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(EVALS_USER_AGENT));

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| EvalsError::Config {
            message: format!("failed to create HTTP client: {}", e),
        })?;

        Ok(Self {
            http: HttpBackend {
                client,
                base_url,
                credential,
                default_query: config.default_query,
                max_retries: config.max_retries,
            },
            provider: config.provider,
        })
    }

    pub fn from_env() -> EvalsResult<Self> {
        Self::new(EvalsConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.http.base_url
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn is_authenticated(&self) -> bool {
        self.http.credential.is_configured()
    }
}
