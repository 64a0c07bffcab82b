use std::path::PathBuf;

use clap::Parser;

/// Boot the romf client context and resolve one route.
#[derive(Debug, Clone, Parser)]
#[command(name = "romf", version, about)]
pub struct RomfCliArgs {
    /// TOML configuration file.
    #[arg(long, short = 'c', env = "ROMF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Location to resolve against the route table.
    #[arg(long, default_value = "/")]
    pub route: String,

    /// Seed for the grill picker, for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print every registered capability as JSON and exit.
    #[arg(long)]
    pub list_capabilities: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl RomfCliArgs {
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
