/// Errors produced by capability discovery and plugin installation.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("namespace '{0}' was already discovered")]
    NamespaceAlreadyDiscovered(String),

    #[error("discovery failed in '{namespace}': {message}")]
    Discovery { namespace: String, message: String },

    #[error("service not installed: {0}")]
    MissingService(&'static str),

    #[error("plugin '{plugin}' failed to install: {message}")]
    Install { plugin: String, message: String },

    #[error("bus: {0}")]
    Bus(#[from] romf_bus::BusError),
}

pub type Result<T> = std::result::Result<T, PluginError>;
