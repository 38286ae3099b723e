use thiserror::Error;

use super::types::Request;
use crate::observability::DiagnosticSink;

/// Reason a handler refused to forward a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("missing identifier")]
    MissingIdentifier,
    #[error("insufficient permission")]
    InsufficientPermission,
    #[error("missing payload")]
    MissingPayload,
    #[error("{0}")]
    Custom(String),
}

/// One step of sequential request processing.
///
/// A handler only decides whether the request may continue. Linking to a
/// successor is done by [`crate::chain::Link`], so implementations hold no
/// per-request state and can be shared between chains.
pub trait Handler: Send + Sync {
    /// Name reported in diagnostics and rejections
    fn name(&self) -> &str;

    /// Run this handler's own check.
    ///
    /// Returning `Err` stops the traversal; no later handler is evaluated.
    fn check(&self, request: &Request, sink: &dyn DiagnosticSink) -> Result<(), RuleViolation>;
}
