//! Observability subsystem.
//!
//! Structured logging only: request ids and failure reasons flow through
//! tracing fields. Metrics exposition is deliberately out of scope.

pub mod logging;

pub use logging::init_logging;
