mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use reqchain::config::{Config, LoggingConfig};
use reqchain::handlers::HandlerRegistry;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // Config loading logs, so the subscriber has to exist before it runs.
    // The configured filter replaces the default once known unless RUST_LOG is set.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let filter_from_env = env_filter.is_some();
    let (filter, filter_handle) = reload::Layer::new(
        env_filter.unwrap_or_else(|| EnvFilter::new(LoggingConfig::default().filter)),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let registry = HandlerRegistry::with_defaults();
    let config = Config::load_with(cli.config, &registry)?;
    if !filter_from_env {
        filter_handle.reload(EnvFilter::new(&config.logging.filter))?;
    }

    let chain = config.build_chain(&registry)?;
    tracing::debug!(handlers = ?chain.names(), "Configuration loaded");

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Check(args) => commands::check(chain, &args.requests, &mut out)?,
        Commands::Demo => commands::demo(chain, &config.chain, &mut out)?,
        Commands::Handlers => commands::handlers(&chain, &mut out)?,
    }

    Ok(())
}
