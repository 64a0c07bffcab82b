use std::path::Path;
use std::time::Duration;

use romf_plugin::{Env, HttpSettings};
use romf_router::HistoryMode;
use serde::{Deserialize, Serialize};

pub const API_URL_VAR: &str = "ROMF_API_URL";
pub const CDN_URL_VAR: &str = "ROMF_CDN_URL";
pub const ROUTER_BASE_VAR: &str = "ROMF_ROUTER_BASE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub env: Env,
    pub http: HttpConfig,
    pub router: RouterConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub mode: HistoryMode,
    pub base: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            mode: HistoryMode::History,
            base: "/".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Override fields from variables returned by `lookup`.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(API_URL_VAR) {
            self.env.api_url = val;
        }
        if let Some(val) = lookup(CDN_URL_VAR) {
            self.env.cdn_url = val;
        }
        if let Some(val) = lookup(ROUTER_BASE_VAR) {
            self.router.base = val;
        }
    }

    pub fn merge_with_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    pub fn validate(&self) -> Result<()> {
        validate_url("env.api_url", &self.env.api_url)?;
        validate_url("env.cdn_url", &self.env.cdn_url)?;
        if self.http.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "http.timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        if !self.router.base.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "router.base",
                message: format!("'{}' must start with '/'", self.router.base),
            });
        }
        Ok(())
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings::from_env(&self.env, Duration::from_millis(self.http.timeout_ms))
    }
}

// Empty means same origin.
fn validate_url(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|err| ConfigError::Invalid {
            field,
            message: format!("'{value}': {err}"),
        })
}
