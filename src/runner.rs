//! Runs requests through a chain and collects what each one produced

use std::fmt;

use crate::chain::{Chain, Outcome};
use crate::handlers::{
    ChainConfig, DEFAULT_IDENTIFIER_FIELD, DEFAULT_PAYLOAD_FIELD, DEFAULT_PERMISSION_FIELD,
    IDENTITY_KIND, PAYLOAD_KIND, PERMISSION_KIND, Request,
};
use crate::observability::{ChainMetrics, Diagnostic, DiagnosticSink, MemorySink, MetricsSnapshot};

/// Everything observed while handling one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        write!(f, "{}", self.outcome)
    }
}

/// Owns a chain and counts the requests it has handled
#[derive(Debug)]
pub struct Runner {
    chain: Chain,
    metrics: ChainMetrics,
}

impl Runner {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain,
            metrics: ChainMetrics::new(),
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Handle one request, capturing its diagnostics.
    ///
    /// Each diagnostic is also passed on to `observer` as it is emitted.
    pub fn run(&self, request: &Request, observer: &dyn DiagnosticSink) -> Report {
        let sink = Tee {
            capture: MemorySink::new(),
            observer,
        };

        let outcome = self.chain.handle(request, &sink);
        if outcome.is_rejected() {
            self.metrics.request_rejected();
        } else {
            self.metrics.request_completed();
        }

        Report {
            outcome,
            diagnostics: sink.capture.drain(),
        }
    }
}

struct Tee<'a> {
    capture: MemorySink,
    observer: &'a dyn DiagnosticSink,
}

impl DiagnosticSink for Tee<'_> {
    fn emit(&self, diagnostic: Diagnostic) {
        self.observer.emit(diagnostic.clone());
        self.capture.emit(diagnostic);
    }
}

/// The reference scenarios for an identity → permission → payload chain.
///
/// Keys come from `config`, so the requests target whatever fields the
/// configured handlers inspect.
pub fn demo_requests(config: &ChainConfig) -> Vec<(&'static str, Request)> {
    let identifier = config
        .field_for(IDENTITY_KIND)
        .unwrap_or(DEFAULT_IDENTIFIER_FIELD);
    let permission = config
        .field_for(PERMISSION_KIND)
        .unwrap_or(DEFAULT_PERMISSION_FIELD);
    let payload = config
        .field_for(PAYLOAD_KIND)
        .unwrap_or(DEFAULT_PAYLOAD_FIELD);

    let identified = Request::new().with(identifier, 123);
    let admin = identified.clone().with(permission, true);

    vec![
        ("missing identifier", Request::new().with(permission, true)),
        ("not an admin", identified.with(permission, false)),
        ("missing payload", admin.clone()),
        ("payload logged", admin.with(payload, "hello")),
    ]
}
