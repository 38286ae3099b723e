use super::models::Config;
use crate::handlers::HandlerRegistry;
use std::collections::HashSet;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No handlers configured (the chain needs at least one handler)")]
    EmptyChain,

    #[error("Handler #{position} has unknown kind '{kind}'")]
    UnknownHandlerKind { position: usize, kind: String },

    #[error("Handler name '{name}' is used more than once")]
    DuplicateHandlerName { name: String },

    #[error("Handler '{handler}' has an empty field name")]
    EmptyFieldName { handler: String },

    #[error("Invalid logging filter '{filter}': {reason}")]
    InvalidLogFilter { filter: String, reason: String },
}

/// Validate the entire configuration against the kinds known to `registry`
pub fn validate(config: &Config, registry: &HandlerRegistry) -> Result<(), ValidationError> {
    validate_chain(config, registry)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_chain(config: &Config, registry: &HandlerRegistry) -> Result<(), ValidationError> {
    if config.chain.handlers.is_empty() {
        return Err(ValidationError::EmptyChain);
    }

    let mut seen = HashSet::new();
    for (position, settings) in config.chain.handlers.iter().enumerate() {
        if !registry.has_kind(&settings.kind) {
            return Err(ValidationError::UnknownHandlerKind {
                position,
                kind: settings.kind.clone(),
            });
        }

        let name = settings.display_name();
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateHandlerName {
                name: name.to_string(),
            });
        }

        if settings.field.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(ValidationError::EmptyFieldName {
                handler: name.to_string(),
            });
        }
    }

    Ok(())
}

fn validate_logging(config: &Config) -> Result<(), ValidationError> {
    EnvFilter::try_new(&config.logging.filter).map_err(|e| ValidationError::InvalidLogFilter {
        filter: config.logging.filter.clone(),
        reason: e.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerSettings;

    fn registry() -> HandlerRegistry {
        HandlerRegistry::with_defaults()
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&Config::default(), &registry()).is_ok());
    }

    #[test]
    fn test_empty_chain() {
        let mut config = Config::default();
        config.chain.handlers.clear();

        let err = validate(&config, &registry()).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyChain));
    }

    #[test]
    fn test_unknown_kind() {
        let mut config = Config::default();
        config.chain.handlers.push(HandlerSettings::new("quota"));

        let err = validate(&config, &registry()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownHandlerKind { position: 3, ref kind } if kind == "quota"
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let mut config = Config::default();
        config.chain.handlers.push(HandlerSettings::new("identity"));

        let err = validate(&config, &registry()).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateHandlerName { .. }));
    }

    #[test]
    fn test_same_kind_with_distinct_names() {
        let mut config = Config::default();
        config
            .chain
            .handlers
            .push(HandlerSettings::new("identity").named("second-id").with_field("tenant"));

        assert!(validate(&config, &registry()).is_ok());
    }

    #[test]
    fn test_blank_field_name() {
        let mut config = Config::default();
        config.chain.handlers[1].field = Some("  ".to_string());

        let err = validate(&config, &registry()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::EmptyFieldName { ref handler } if handler == "permission"
        ));
    }

    #[test]
    fn test_bad_log_filter() {
        let mut config = Config::default();
        config.logging.filter = "reqchain=notalevel".to_string();

        let err = validate(&config, &registry()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidLogFilter { .. }));
    }
}
