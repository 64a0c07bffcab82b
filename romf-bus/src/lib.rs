pub mod error;
pub mod toaster;

// Re-export key types for convenience.
pub use error::{BusError, ListenerError, Result};
pub use toaster::{Delivery, ListenerFailure, ListenerResult, Payload, SubscriptionId, Toaster};
