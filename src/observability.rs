//! Diagnostic sinks and chain metrics

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A handler refused the request
    Rejection,
    /// A handler reported progress (e.g. a logged payload)
    Info,
}

/// A message emitted by a handler while processing a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub handler: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn rejection(handler: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            kind: DiagnosticKind::Rejection,
            message: message.into(),
        }
    }

    pub fn info(handler: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            kind: DiagnosticKind::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.handler, self.message)
    }
}

/// Destination for diagnostics. Passed explicitly to every traversal.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<T> {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

/// Accumulates diagnostics in emission order.
///
/// Components that should write to the same log share one instance through
/// an `Arc`.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|d| d.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return everything accumulated so far
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::Rejection => {
                tracing::warn!(handler = %diagnostic.handler, "{}", diagnostic.message)
            }
            DiagnosticKind::Info => {
                tracing::info!(handler = %diagnostic.handler, "{}", diagnostic.message)
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Counters for requests run through a chain
#[derive(Debug, Default)]
pub struct ChainMetrics {
    requests: AtomicU64,
    rejected: AtomicU64,
    completed: AtomicU64,
}

impl ChainMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_rejected(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "rejected", "Metric incremented");
    }

    pub fn request_completed(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "completed", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub rejected: u64,
    pub completed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.emit(Diagnostic::info("a", "first entry"));
        sink.emit(Diagnostic::rejection("b", "second entry"));

        assert_eq!(sink.messages(), vec!["first entry", "second entry"]);
        assert_eq!(sink.entries()[1].kind, DiagnosticKind::Rejection);
    }

    #[test]
    fn test_shared_sink_sees_all_writers() {
        let shared = Arc::new(MemorySink::new());
        let first = Arc::clone(&shared);
        let second = Arc::clone(&shared);

        first.emit(Diagnostic::info("logger", "first entry"));
        second.emit(Diagnostic::info("logger", "second entry"));

        assert_eq!(shared.len(), 2);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_separate_sinks_are_isolated() {
        let one = MemorySink::new();
        let two = MemorySink::new();
        one.emit(Diagnostic::info("logger", "only here"));

        assert_eq!(one.len(), 1);
        assert!(two.is_empty());
    }

    #[test]
    fn test_drain_empties_sink() {
        let sink = MemorySink::new();
        sink.emit(Diagnostic::info("x", "m"));

        let drained = sink.drain();
        assert_eq!(drained.len(), 1);
        assert!(sink.is_empty());
    }

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_sink_logs_by_kind() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::TRACE)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.emit(Diagnostic::rejection("identity", "missing identifier"));
            TracingSink.emit(Diagnostic::info("payload", "success: hello"));
        });

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("missing identifier"));
        assert!(lines[0].contains("handler=identity"));
        assert!(lines[1].contains("INFO"));
        assert!(lines[1].contains("success: hello"));
        assert!(lines[1].contains("handler=payload"));
    }


    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::rejection("identity", "missing identifier");
        assert_eq!(d.to_string(), "[identity] missing identifier");
    }

    #[test]
    fn test_metrics_snapshot() {
        let metrics = ChainMetrics::new();
        metrics.request_rejected();
        metrics.request_completed();
        metrics.request_completed();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                requests: 3,
                rejected: 1,
                completed: 2,
            }
        );
    }
}
