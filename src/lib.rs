pub mod chain;
pub mod config;
pub mod handlers;
pub mod observability;
pub mod runner;

pub use chain::{Chain, Link, Outcome};
pub use handlers::{Handler, Request, RuleViolation};
pub use observability::{Diagnostic, DiagnosticSink, MemorySink};
