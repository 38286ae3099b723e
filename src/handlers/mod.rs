//! Request handlers for reqchain
//!
//! This module provides the handler contract and the built-in checks that a
//! [`crate::chain::Chain`] links together.
//!
//! ## Key Components
//!
//! - [`Handler`] - Trait for implementing a single check
//! - [`Request`] - Key-value record passed through the chain
//! - [`IdentityCheck`], [`PermissionCheck`], [`LoggingHandler`] - Built-in checks
//! - [`HandlerRegistry`] - Builds chains from [`ChainConfig`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use reqchain::handlers::{ChainConfig, HandlerRegistry, Request};
//! use reqchain::observability::TracingSink;
//!
//! let registry = HandlerRegistry::with_defaults();
//! let chain = registry.build_chain(&ChainConfig::default())?;
//!
//! let request: Request = r#"{"identifier": 1, "admin": true, "payload": "hi"}"#.parse()?;
//! let outcome = chain.handle(&request, &TracingSink);
//! ```

mod builtin;
mod registry;
mod traits;
mod types;

pub use builtin::{
    DEFAULT_IDENTIFIER_FIELD, DEFAULT_PAYLOAD_FIELD, DEFAULT_PERMISSION_FIELD, IdentityCheck,
    LoggingHandler, PermissionCheck,
};
pub use registry::{
    ChainConfig, HandlerFactory, HandlerRegistry, HandlerSettings, IDENTITY_KIND, PAYLOAD_KIND,
    PERMISSION_KIND, RegistryError,
};
pub use traits::{Handler, RuleViolation};
pub use types::{Request, RequestError};
