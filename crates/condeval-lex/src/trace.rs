//! Trace sink capability.
//!
//! The lexer, parser, and evaluator all accept a [`TraceWriter`] so an
//! embedder can observe what the engine is doing without coupling the core
//! to any particular logging framework. This is distinct from the crate's
//! own `tracing`-based ambient logging: `TraceWriter` output is part of the
//! caller-visible contract, while `tracing` events are an internal
//! diagnostic aid.

/// Sink for caller-visible trace output.
///
/// Implementors typically forward `verbose` to a debug log and `info` to
/// whatever user-facing log the host process already has; a no-op
/// implementation is provided via [`NullTraceWriter`] for callers that don't
/// care.
pub trait TraceWriter {
    /// A message intended for the embedder's normal log output.
    fn info(&self, message: &str);

    /// A message intended only for verbose/debug output. The core writes
    /// all of its own coercion and evaluation traces here.
    fn verbose(&self, message: &str);
}

/// A [`TraceWriter`] that discards everything written to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTraceWriter;

impl TraceWriter for NullTraceWriter {
    fn info(&self, _message: &str) {}
    fn verbose(&self, _message: &str) {}
}

impl<T: TraceWriter + ?Sized> TraceWriter for &T {
    fn info(&self, message: &str) {
        (**self).info(message)
    }

    fn verbose(&self, message: &str) {
        (**self).verbose(message)
    }
}
