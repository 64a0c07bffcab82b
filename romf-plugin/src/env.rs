use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default request timeout handed to the HTTP client.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Deployment endpoints visible to every component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Env {
    /// Base URL of the upload API. Empty means same origin.
    pub api_url: String,
    /// Base URL for serving uploaded files. Empty means same origin.
    pub cdn_url: String,
}

/// Settings the external HTTP client is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpSettings {
    pub fn from_env(env: &Env, timeout: Duration) -> Self {
        Self {
            base_url: env.api_url.clone(),
            timeout,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::from_env(&Env::default(), DEFAULT_HTTP_TIMEOUT)
    }
}
