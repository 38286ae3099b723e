use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reqchain")]
#[command(about = "Run requests through a validation chain", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $REQCHAIN_CONFIG or config/reqchain.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run JSON requests through the configured chain
    Check(CheckArgs),
    /// Run the reference scenarios through the configured chain
    Demo,
    /// Print the configured chain order
    Handlers,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Requests as JSON objects, e.g. '{"identifier": 1, "admin": true}'
    #[arg(required = true)]
    pub requests: Vec<String>,
}
