//! Structured logging: tracing subscriber setup and JSON line output.

mod format;

pub use format::StructuredLogger;
