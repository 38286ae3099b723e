use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "REQCHAIN_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/reqchain.toml";
const ENV_PREFIX: &str = "REQCHAIN";
const ENV_SEPARATOR: &str = "__";

/// Resolve the config file path: explicit path, then `REQCHAIN_CONFIG`, then the default.
///
/// The flag is true when the path was asked for by name and must exist.
pub fn config_path(explicit: Option<PathBuf>) -> (PathBuf, bool) {
    match explicit.or_else(|| env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from)) {
        Some(path) => (path, true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    }
}

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load(explicit: Option<PathBuf>) -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let (path, required) = config_path(explicit);
    load_from_sources(path, required)
}

/// Load configuration from a specific path and environment.
///
/// A missing file is an error when `required`, otherwise defaults apply.
pub fn load_from_sources(config_path: PathBuf, required: bool) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else if required {
        return Err(ConfigError::Message(format!(
            "configuration file not found: {}",
            config_path.display()
        )));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // REQCHAIN__LOGGING__FILTER -> logging.filter
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
