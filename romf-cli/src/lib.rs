pub mod bootstrap;
pub mod cli_args;
pub mod config;
pub mod error;

pub use bootstrap::{App, COMPONENTS_NAMESPACE, CapabilitySummary, GRILLS_NAMESPACE, bootstrap};
pub use cli_args::RomfCliArgs;
pub use config::{AppConfig, ConfigError};
pub use error::{BootError, Result};
