//! API key authentication.
//!
//! Both providers accept the key as a bearer token, so a single credential
//! type covers OpenAI and Azure OpenAI deployments.

use std::fmt;

use crate::config::Provider;

/// Credential attached to every request.
#[derive(Clone, Default)]
pub enum Credential {
    /// Static API key (from config or env).
    ApiKey(String),

    /// No authentication.
    #[default]
    None,
}

impl Credential {
    /// Create a static API key credential.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Read the provider's key variable (`AZURE_API_KEY` or `OPENAI_API_KEY`).
    ///
    /// Empty values are treated as absent.
    pub fn from_env(provider: Provider) -> Self {
        match std::env::var(provider.api_key_var()) {
            Ok(key) if !key.is_empty() => Self::ApiKey(key),
            _ => Self::None,
        }
    }

    /// Value for the `Authorization` header, if any.
    pub fn bearer(&self) -> Option<String> {
        match self {
            Self::ApiKey(key) => Some(format!("Bearer {}", key)),
            Self::None => None,
        }
    }

    /// Check if a credential is configured.
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<Option<String>> for Credential {
    fn from(key: Option<String>) -> Self {
        match key {
            Some(key) if !key.is_empty() => Self::ApiKey(key),
            _ => Self::None,
        }
    }
}

// Keys never end up in logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::None => f.write_str("None"),
        }
    }
}
