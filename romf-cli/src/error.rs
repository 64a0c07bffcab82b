use crate::config::ConfigError;

/// Errors produced while booting the client context.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("plugin: {0}")]
    Plugin(#[from] romf_plugin::PluginError),
}

pub type Result<T> = std::result::Result<T, BootError>;
