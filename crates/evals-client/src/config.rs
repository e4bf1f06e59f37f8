//! Client configuration.
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `OAI_API_TYPE` | `openai` selects OpenAI, anything else Azure (default `azure`) |
//! | `AZURE_API_KEY` | Azure OpenAI key |
//! | `AZURE_API_ENDPOINT` | Azure resource endpoint, `/openai/v1` is appended |
//! | `OPENAI_API_KEY` | OpenAI key |
//! | `OPENAI_API_BASE` | OpenAI endpoint (default `https://api.openai.com`), `/v1` is appended |
//! | `EVALS_TIMEOUT_SECS` | Request timeout in seconds (unset: transport default) |
//! | `EVALS_MAX_RETRIES` | Retries of reads and deletes on transient failures (default 0) |

use std::fmt;

/// Query parameter Azure requires on every evals request.
pub const AZURE_EVALS_QUERY: (&str, &str) = ("aoai-evals", "preview");

const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com";

/// Which deployment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Azure,
    OpenAi,
}

impl Provider {
    /// Parse the `OAI_API_TYPE` selector. Only `openai` (any case) picks OpenAI.
    pub fn from_selector(selector: &str) -> Self {
        if selector.trim().eq_ignore_ascii_case("openai") {
            Self::OpenAi
        } else {
            Self::Azure
        }
    }

    /// Human-readable name used in diagnostics.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Azure => "Azure",
            Self::OpenAi => "OpenAI",
        }
    }

    pub(crate) fn api_key_var(&self) -> &'static str {
        match self {
            Self::Azure => "AZURE_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    fn endpoint_var(&self) -> &'static str {
        match self {
            Self::Azure => "AZURE_API_ENDPOINT",
            Self::OpenAi => "OPENAI_API_BASE",
        }
    }

    fn path_suffix(&self) -> &'static str {
        match self {
            Self::Azure => "/openai/v1",
            Self::OpenAi => "/v1",
        }
    }

    /// Query parameters attached to every request for this provider.
    pub fn default_query(&self) -> Vec<(String, String)> {
        match self {
            Self::Azure => vec![(
                AZURE_EVALS_QUERY.0.to_string(),
                AZURE_EVALS_QUERY.1.to_string(),
            )],
            Self::OpenAi => Vec::new(),
        }
    }

    /// Build the API base URL from an endpoint root.
    pub fn base_url(&self, endpoint: &str) -> String {
        format!("{}{}", endpoint.trim_end_matches('/'), self.path_suffix())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Evaluation client configuration.
#[derive(Clone)]
pub struct EvalsConfig {
    /// Selected provider.
    pub provider: Provider,

    /// API base URL, including the version path (e.g. `https://api.openai.com/v1`).
    pub base_url: String,

    /// API key.
    pub api_key: Option<String>,

    /// Query parameters sent with every request.
    pub default_query: Vec<(String, String)>,

    /// Request timeout in seconds. `None` keeps the transport default.
    pub timeout_secs: Option<u64>,

    /// Maximum retries of GET/DELETE requests on transient failures.
    pub max_retries: u32,
}

impl Default for EvalsConfig {
    fn default() -> Self {
        Self::for_provider(Provider::OpenAi, DEFAULT_OPENAI_BASE)
    }
}

impl EvalsConfig {
    /// Configuration for a provider rooted at `endpoint`, without credentials.
    pub fn for_provider(provider: Provider, endpoint: &str) -> Self {
        Self {
            provider,
            base_url: provider.base_url(endpoint),
            api_key: None,
            default_query: provider.default_query(),
            timeout_secs: None,
            max_retries: 0,
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let provider = std::env::var("OAI_API_TYPE")
            .map(|v| Provider::from_selector(&v))
            .unwrap_or_default();

        let endpoint = match std::env::var(provider.endpoint_var()) {
            Ok(v) if !v.is_empty() => v,
            _ if provider == Provider::OpenAi => DEFAULT_OPENAI_BASE.to_string(),
            _ => String::new(),
        };

        let mut config = Self::for_provider(provider, &endpoint);
        if endpoint.is_empty() {
            // Leave the URL empty so validation reports the missing endpoint.
            config.base_url = String::new();
        }
        config.api_key = std::env::var(provider.api_key_var())
            .ok()
            .filter(|v| !v.is_empty());
        config.timeout_secs = std::env::var("EVALS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok());
        config.max_retries = std::env::var("EVALS_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        config
    }

    /// Load `.env` (if present) and then read the environment.
    pub fn from_dotenv() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "failed to load .env file");
            }
        }
        Self::from_env()
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL verbatim (no provider suffix is appended).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Replace the default query parameters.
    pub fn with_default_query(mut self, query: Vec<(String, String)>) -> Self {
        self.default_query = query;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the retry budget.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

impl fmt::Debug for EvalsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalsConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("default_query", &self.default_query)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
