use serde::{Deserialize, Serialize};

use crate::handlers::ChainConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub chain: ChainConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerSettings;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.chain.handlers.len(), 3);
    }

    #[test]
    fn test_chain_from_toml() {
        let config: Config = toml::from_str(
            r#"
[logging]
filter = "reqchain=debug"

[[chain.handlers]]
kind = "identity"
field = "userId"

[[chain.handlers]]
kind = "payload"
name = "log"
field = "log"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.filter, "reqchain=debug");
        assert_eq!(
            config.chain.handlers,
            vec![
                HandlerSettings::new("identity").with_field("userId"),
                HandlerSettings::new("payload").named("log").with_field("log"),
            ]
        );
    }
}
