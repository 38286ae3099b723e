//! Ordered handler chains with short-circuiting traversal.
//!
//! A [`Link`] pairs a [`Handler`] with an optional successor. Calling
//! [`Link::handle`] runs the handler's check and, only if it passes, forwards
//! the request to the successor through [`forward`]. A failing check ends the
//! traversal with [`Outcome::Rejected`]; nothing after it is evaluated.
//!
//! ```rust,ignore
//! use reqchain::chain::Link;
//!
//! let head = Link::new(identity);
//! head.set_next(Link::new(permission)).set_next(Link::new(payload));
//!
//! let outcome = head.handle(&request, &sink);
//! ```
//!
//! [`Chain`] owns a sequence of links and keeps them wired in order when
//! handlers are added or inserted.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::handlers::{Handler, Request, RuleViolation};
use crate::observability::{Diagnostic, DiagnosticSink};

/// Result of handling a request at some link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The named handler's check failed; later handlers were not evaluated
    Rejected {
        handler: String,
        reason: RuleViolation,
    },
    /// The check passed and the successor produced the inner outcome
    Forwarded(Box<Outcome>),
    /// The check passed and there was no successor
    EndOfChain,
}

impl Outcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self.terminal(), Outcome::Rejected { .. })
    }

    pub fn reached_end(&self) -> bool {
        matches!(self.terminal(), Outcome::EndOfChain)
    }

    /// Innermost outcome after unwrapping every forward
    pub fn terminal(&self) -> &Outcome {
        let mut current = self;
        while let Outcome::Forwarded(inner) = current {
            current = inner;
        }
        current
    }

    pub fn rejection(&self) -> Option<(&str, &RuleViolation)> {
        match self.terminal() {
            Outcome::Rejected { handler, reason } => Some((handler.as_str(), reason)),
            _ => None,
        }
    }

    /// Number of successful forwards before the traversal ended
    pub fn hops(&self) -> usize {
        let mut hops = 0;
        let mut current = self;
        while let Outcome::Forwarded(inner) = current {
            hops += 1;
            current = inner;
        }
        hops
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.terminal() {
            Outcome::Rejected { handler, reason } => write!(
                f,
                "processing stopped at handler {handler} with reason {reason}"
            ),
            _ => f.write_str("processing reached end of chain"),
        }
    }
}

/// A handler plus its successor slot
pub struct Link {
    handler: Arc<dyn Handler>,
    next: Mutex<Option<Arc<Link>>>,
}

impl Link {
    pub fn new(handler: Arc<dyn Handler>) -> Arc<Self> {
        Arc::new(Self {
            handler,
            next: Mutex::new(None),
        })
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<Link>>> {
        self.next.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn name(&self) -> &str {
        self.handler.name()
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Install `next` as the successor and return it.
    ///
    /// Overwrites any previous successor. No cycle check is performed.
    pub fn set_next(&self, next: Arc<Link>) -> Arc<Link> {
        *self.slot() = Some(Arc::clone(&next));
        next
    }

    pub fn next(&self) -> Option<Arc<Link>> {
        self.slot().clone()
    }

    /// Run this link's check, then forward on success.
    pub fn handle(&self, request: &Request, sink: &dyn DiagnosticSink) -> Outcome {
        let name = self.handler.name();

        if let Err(reason) = self.handler.check(request, sink) {
            tracing::debug!(handler = %name, %reason, "Request rejected");
            sink.emit(Diagnostic::rejection(name, reason.to_string()));
            return Outcome::Rejected {
                handler: name.to_string(),
                reason,
            };
        }

        tracing::debug!(handler = %name, "Check passed");
        // Lock is released before the successor runs
        let next = self.next();
        forward(next.as_ref(), request, sink)
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("handler", &self.name())
            .field("next", &self.next().map(|n| n.name().to_string()))
            .finish()
    }
}

/// Pass the request to `next`, or end the chain when there is none
pub fn forward(
    next: Option<&Arc<Link>>,
    request: &Request,
    sink: &dyn DiagnosticSink,
) -> Outcome {
    match next {
        Some(link) => Outcome::Forwarded(Box::new(link.handle(request, sink))),
        None => {
            tracing::debug!("End of chain");
            Outcome::EndOfChain
        }
    }
}

/// Owning, ordered sequence of links.
///
/// Each link's successor is always the next link in the sequence and the
/// last link has none. Links are never handed out, so only [`Chain::push`]
/// and [`Chain::insert`] rewire them.
#[derive(Debug, Default)]
pub struct Chain {
    links: Vec<Arc<Link>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_handlers<I>(handlers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        let mut chain = Self::new();
        for handler in handlers {
            chain.push(handler);
        }
        chain
    }

    /// Append a handler at the tail
    pub fn push(&mut self, handler: Arc<dyn Handler>) -> &mut Self {
        let link = Link::new(handler);
        if let Some(tail) = self.links.last() {
            tail.set_next(Arc::clone(&link));
        }
        self.links.push(link);
        self
    }

    /// Insert a handler before position `index`, relinking its neighbours.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, handler: Arc<dyn Handler>) -> &mut Self {
        assert!(
            index <= self.links.len(),
            "insertion index {index} out of bounds (len {})",
            self.links.len()
        );

        let link = Link::new(handler);
        if let Some(following) = self.links.get(index) {
            link.set_next(Arc::clone(following));
        }
        if let Some(previous) = index.checked_sub(1).and_then(|i| self.links.get(i)) {
            previous.set_next(Arc::clone(&link));
        }
        self.links.insert(index, link);
        self
    }

    /// Run `request` from the head. An empty chain ends immediately.
    pub fn handle(&self, request: &Request, sink: &dyn DiagnosticSink) -> Outcome {
        match self.links.first() {
            Some(head) => head.handle(request, sink),
            None => Outcome::EndOfChain,
        }
    }

    /// Run `request` starting at position `index`, skipping earlier handlers.
    ///
    /// Returns `None` when `index` is out of range.
    pub fn handle_from(
        &self,
        index: usize,
        request: &Request,
        sink: &dyn DiagnosticSink,
    ) -> Option<Outcome> {
        self.links
            .get(index)
            .map(|link| link.handle(request, sink))
    }

    pub fn names(&self) -> Vec<&str> {
        self.links.iter().map(|link| link.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl FromIterator<Arc<dyn Handler>> for Chain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Handler>>>(iter: I) -> Self {
        Self::from_handlers(iter)
    }
}
