//! Logging macros for ergonomic log message formatting.
//!
//! These macros format the message like `format!` and forward it to a
//! [`ContextLogger`](crate::ContextLogger). Data can be attached after a `;`.
//! Each expands to the `Result<()>` of the underlying call.
//!
//! # Examples
//!
//! ```
//! use context_logger::prelude::*;
//! use context_logger::info;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let logger = ContextLogger::new(
//!     Arc::new(Dispatcher::new()),
//!     Arc::new(RedactionPolicy::empty()),
//!     LogContext::new(),
//! );
//!
//! // Basic logging
//! info!(logger, "Server started")?;
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port)?;
//!
//! // With data
//! info!(logger, "User {} logged in", 42; &json!({"method": "sso"}))?;
//! # Ok::<(), context_logger::LoggerError>(())
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use context_logger::prelude::*;
/// # use std::sync::Arc;
/// # let logger = ContextLogger::new(Arc::new(Dispatcher::new()), Arc::new(RedactionPolicy::empty()), LogContext::new());
/// use context_logger::log;
/// log!(logger, LogLevel::Info, "Simple message")?;
/// log!(logger, LogLevel::Error, "Error code: {}", 500)?;
/// # Ok::<(), context_logger::LoggerError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $data:expr) => {
        $logger.log_with($level, format!($fmt $(, $arg)*), $data)
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use context_logger::prelude::*;
/// # use std::sync::Arc;
/// # let logger = ContextLogger::new(Arc::new(Dispatcher::new()), Arc::new(RedactionPolicy::empty()), LogContext::new());
/// use context_logger::info;
/// info!(logger, "Application started")?;
/// info!(logger, "Processing {} items", 100)?;
/// # Ok::<(), context_logger::LoggerError>(())
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::MemoryAppender;
    use crate::core::{ContextLogger, Dispatcher, LogContext, LogLevel, RedactionPolicy};
    use serde_json::json;
    use std::sync::Arc;

    fn logger() -> (ContextLogger, MemoryAppender) {
        let memory = MemoryAppender::new();
        let dispatcher = Dispatcher::builder()
            .min_level(LogLevel::Trace)
            .appender(memory.clone())
            .build();
        let logger = ContextLogger::new(
            Arc::new(dispatcher),
            Arc::new(RedactionPolicy::empty()),
            LogContext::new(),
        );
        (logger, memory)
    }

    #[test]
    fn test_log_macro() {
        let (logger, memory) = logger();
        log!(logger, LogLevel::Info, "Test message").unwrap();
        log!(logger, LogLevel::Info, "Formatted: {}", 42).unwrap();
        assert_eq!(
            memory.messages(),
            vec!["Test message".to_string(), "Formatted: 42".to_string()]
        );
    }

    #[test]
    fn test_leveled_macros() {
        let (logger, memory) = logger();
        trace!(logger, "Trace message").unwrap();
        debug!(logger, "Count: {}", 5).unwrap();
        info!(logger, "Items: {}", 100).unwrap();
        warn!(logger, "Retry {} of {}", 1, 3).unwrap();
        error!(logger, "Code: {}", 500).unwrap();

        let levels: Vec<LogLevel> = memory.records().iter().map(|r| r.level).collect();
        assert_eq!(
            levels,
            vec![
                LogLevel::Trace,
                LogLevel::Debug,
                LogLevel::Info,
                LogLevel::Warn,
                LogLevel::Error
            ]
        );
    }

    #[test]
    fn test_macro_with_data() {
        let (logger, memory) = logger();
        info!(logger, "User {} logged in", 42; &json!({"method": "sso"})).unwrap();

        let record = memory.last().unwrap();
        assert_eq!(record.message, "User 42 logged in");
        assert_eq!(record.data["method"], json!("sso"));
    }
}
