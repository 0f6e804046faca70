//! Error values accepted by the error-reporting helpers
//!
//! `send_error` accepts anything convertible into an [`ErrorReport`]. Plain
//! strings are coerced into a report whose message is the string itself.

use super::error::LoggerError;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;

/// Stack lines kept after the header line
pub const MAX_STACK_LINES: usize = 99;

/// A message plus an optional trace whose first line is a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    message: String,
    trace: Option<String>,
}

impl ErrorReport {
    /// Coerce a plain message into a report.
    ///
    /// The trace holds an `Error: <message>` header followed by a backtrace of
    /// the call site when `RUST_BACKTRACE` enables capturing.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let mut trace = format!("Error: {}", message);
        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            trace.push('\n');
            trace.push_str(&backtrace.to_string());
        }
        Self {
            message,
            trace: Some(trace),
        }
    }

    /// A report with no trace at all; no `stack` field is logged for it
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: None,
        }
    }

    /// Build a report from an error and its `source()` chain
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        let message = error.to_string();
        let mut trace = message.clone();
        let mut source = error.source();
        while let Some(cause) = source {
            trace.push_str("\ncaused by: ");
            trace.push_str(&cause.to_string());
            source = cause.source();
        }
        Self {
            message,
            trace: Some(trace),
        }
    }

    /// Replace the trace text; its first line is treated as the header
    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    /// Trace lines without the header, at most [`MAX_STACK_LINES`]
    pub fn stack(&self) -> Option<Vec<String>> {
        self.trace.as_ref().map(|trace| {
            trace
                .lines()
                .skip(1)
                .take(MAX_STACK_LINES)
                .map(str::to_string)
                .collect()
        })
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&str> for ErrorReport {
    fn from(message: &str) -> Self {
        ErrorReport::new(message)
    }
}

impl From<String> for ErrorReport {
    fn from(message: String) -> Self {
        ErrorReport::new(message)
    }
}

impl From<&(dyn Error + 'static)> for ErrorReport {
    fn from(error: &(dyn Error + 'static)) -> Self {
        ErrorReport::from_error(error)
    }
}

impl From<&(dyn Error + Send + Sync + 'static)> for ErrorReport {
    fn from(error: &(dyn Error + Send + Sync + 'static)) -> Self {
        ErrorReport::from_error(error)
    }
}

impl From<Box<dyn Error + Send + Sync>> for ErrorReport {
    fn from(error: Box<dyn Error + Send + Sync>) -> Self {
        ErrorReport::from_error(error.as_ref())
    }
}

impl From<&LoggerError> for ErrorReport {
    fn from(error: &LoggerError) -> Self {
        ErrorReport::from_error(error)
    }
}

impl From<LoggerError> for ErrorReport {
    fn from(error: LoggerError) -> Self {
        ErrorReport::from_error(&error)
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(error: std::io::Error) -> Self {
        ErrorReport::from_error(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_coercion_keeps_message() {
        let report = ErrorReport::from("boom");
        assert_eq!(report.message(), "boom");
        assert!(report.trace().unwrap().starts_with("Error: boom"));
    }

    #[test]
    fn test_stack_skips_header_and_is_capped() {
        let trace = (0..150)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let report = ErrorReport::message_only("m").with_trace(trace);

        let stack = report.stack().unwrap();
        assert_eq!(stack.len(), MAX_STACK_LINES);
        assert_eq!(stack[0], "line 1");
        assert_eq!(stack[98], "line 99");
    }

    #[test]
    fn test_source_chain_becomes_stack() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err = LoggerError::io_operation("opening log", "cannot open", io);
        let report = ErrorReport::from(&err);

        assert_eq!(report.message(), "IO error while opening log: cannot open");
        assert_eq!(report.stack().unwrap(), vec!["caused by: missing file".to_string()]);
    }

    #[test]
    fn test_message_only_has_no_stack() {
        assert_eq!(ErrorReport::message_only("quiet").stack(), None);
    }
}
