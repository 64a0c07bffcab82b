/// Failure reported by a single listener during delivery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListenerError {
    #[error("{0}")]
    Failed(String),

    #[error("listener panicked: {0}")]
    Panicked(String),
}

impl ListenerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Errors produced by bus operations.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("failed to serialize payload for '{title}': {source}")]
    Serialize {
        title: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, BusError>;
