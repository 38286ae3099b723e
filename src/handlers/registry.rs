use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::builtin::{
    DEFAULT_IDENTIFIER_FIELD, DEFAULT_PAYLOAD_FIELD, DEFAULT_PERMISSION_FIELD, IdentityCheck,
    LoggingHandler, PermissionCheck,
};
use super::traits::Handler;
use crate::chain::Chain;

pub const IDENTITY_KIND: &str = "identity";
pub const PERMISSION_KIND: &str = "permission";
pub const PAYLOAD_KIND: &str = "payload";

/// One chain position as described in configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct HandlerSettings {
    /// Registered handler kind, e.g. `"identity"`
    pub kind: String,
    /// Display name; defaults to the kind
    #[serde(default)]
    pub name: Option<String>,
    /// Request field inspected by the handler; defaults per kind
    #[serde(default)]
    pub field: Option<String>,
}

impl HandlerSettings {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            field: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }

    fn field_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.field.as_deref().unwrap_or(default)
    }
}

/// Ordered list of handler positions
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChainConfig {
    #[serde(default = "default_handlers")]
    pub handlers: Vec<HandlerSettings>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            handlers: default_handlers(),
        }
    }
}

impl ChainConfig {
    /// Request field read by the first handler of `kind`.
    ///
    /// Falls back to the built-in default for the kind when no handler sets
    /// `field`. Unknown kinds without an explicit field yield `None`.
    pub fn field_for(&self, kind: &str) -> Option<&str> {
        let configured = self
            .handlers
            .iter()
            .find(|settings| settings.kind == kind)
            .and_then(|settings| settings.field.as_deref());

        configured.or(match kind {
            IDENTITY_KIND => Some(DEFAULT_IDENTIFIER_FIELD),
            PERMISSION_KIND => Some(DEFAULT_PERMISSION_FIELD),
            PAYLOAD_KIND => Some(DEFAULT_PAYLOAD_FIELD),
            _ => None,
        })
    }
}

fn default_handlers() -> Vec<HandlerSettings> {
    vec![
        HandlerSettings::new(IDENTITY_KIND),
        HandlerSettings::new(PERMISSION_KIND),
        HandlerSettings::new(PAYLOAD_KIND),
    ]
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown handler kind: {0}")]
    UnknownKind(String),
}

pub type HandlerFactory = Arc<dyn Fn(&HandlerSettings) -> Arc<dyn Handler> + Send + Sync>;

/// Maps handler kinds to constructors
#[derive(Clone)]
pub struct HandlerRegistry {
    factories: BTreeMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&HandlerSettings) -> Arc<dyn Handler> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn create(&self, settings: &HandlerSettings) -> Result<Arc<dyn Handler>, RegistryError> {
        let factory = self
            .factories
            .get(&settings.kind)
            .ok_or_else(|| RegistryError::UnknownKind(settings.kind.clone()))?;
        Ok(factory(settings))
    }

    /// Build a chain with handlers linked in configuration order
    pub fn build_chain(&self, config: &ChainConfig) -> Result<Chain, RegistryError> {
        let handlers = config
            .handlers
            .iter()
            .map(|settings| self.create(settings))
            .collect::<Result<Vec<_>, _>>()?;

        let chain = Chain::from_handlers(handlers);
        tracing::debug!(handlers = ?chain.names(), "Chain built");
        Ok(chain)
    }

    /// Registry with the identity, permission and payload handlers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(IDENTITY_KIND, |s: &HandlerSettings| {
            Arc::new(IdentityCheck::new(
                s.display_name(),
                s.field_or(DEFAULT_IDENTIFIER_FIELD),
            )) as Arc<dyn Handler>
        });
        registry.register(PERMISSION_KIND, |s: &HandlerSettings| {
            Arc::new(PermissionCheck::new(
                s.display_name(),
                s.field_or(DEFAULT_PERMISSION_FIELD),
            )) as Arc<dyn Handler>
        });
        registry.register(PAYLOAD_KIND, |s: &HandlerSettings| {
            Arc::new(LoggingHandler::new(
                s.display_name(),
                s.field_or(DEFAULT_PAYLOAD_FIELD),
            )) as Arc<dyn Handler>
        });

        registry
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
