use super::traits::{Handler, RuleViolation};
use super::types::Request;
use crate::observability::{Diagnostic, DiagnosticSink};

pub const DEFAULT_IDENTIFIER_FIELD: &str = "identifier";
pub const DEFAULT_PERMISSION_FIELD: &str = "admin";
pub const DEFAULT_PAYLOAD_FIELD: &str = "payload";

/// Requires a truthy identifier field
#[derive(Debug, Clone)]
pub struct IdentityCheck {
    name: String,
    field: String,
}

impl IdentityCheck {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl Default for IdentityCheck {
    fn default() -> Self {
        Self::new("identity", DEFAULT_IDENTIFIER_FIELD)
    }
}

impl Handler for IdentityCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, request: &Request, _sink: &dyn DiagnosticSink) -> Result<(), RuleViolation> {
        if !request.is_truthy(&self.field) {
            return Err(RuleViolation::MissingIdentifier);
        }
        Ok(())
    }
}

/// Requires a truthy permission flag
#[derive(Debug, Clone)]
pub struct PermissionCheck {
    name: String,
    field: String,
}

impl PermissionCheck {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl Default for PermissionCheck {
    fn default() -> Self {
        Self::new("permission", DEFAULT_PERMISSION_FIELD)
    }
}

impl Handler for PermissionCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, request: &Request, _sink: &dyn DiagnosticSink) -> Result<(), RuleViolation> {
        if !request.is_truthy(&self.field) {
            return Err(RuleViolation::InsufficientPermission);
        }
        Ok(())
    }
}

/// Requires a payload and reports it as `success: <payload>`.
///
/// The success diagnostic is emitted before forwarding, so it appears ahead
/// of anything later handlers report.
#[derive(Debug, Clone)]
pub struct LoggingHandler {
    name: String,
    field: String,
}

impl LoggingHandler {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl Default for LoggingHandler {
    fn default() -> Self {
        Self::new("payload", DEFAULT_PAYLOAD_FIELD)
    }
}

impl Handler for LoggingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, request: &Request, sink: &dyn DiagnosticSink) -> Result<(), RuleViolation> {
        if !request.is_truthy(&self.field) {
            return Err(RuleViolation::MissingPayload);
        }

        let payload = request.display_field(&self.field).unwrap_or_default();
        sink.emit(Diagnostic::info(&self.name, format!("success: {payload}")));
        Ok(())
    }
}
