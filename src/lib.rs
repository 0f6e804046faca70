//! # Context Logger
//!
//! A structured logging facade. Every record carries a data map built from
//! the handle's inherited context and the call-site data, with sensitive keys
//! masked and deep structures collapsed before anything reaches a sink.
//!
//! ## Features
//!
//! - **Inheritable context**: child handles copy their parent's context and add to it
//! - **Key redaction**: exact keys and regex patterns, masked with a type hint
//! - **Depth limiting**: nested maps past a depth are stored as JSON text
//! - **Event bridging**: turn emitter events into log records
//! - **Call instrumentation**: log selected method calls of an object
//! - **Multiple Appenders**: console, file, JSON lines, TCP and in-memory sinks

pub mod appenders;
pub mod config;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::MemoryAppender;
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    #[cfg(feature = "file")]
    pub use crate::appenders::{FileAppender, JsonAppender};
    pub use crate::config::{init_logger, init_logger_with, LoggerConfig, TransportConfig, TransportRegistry};
    pub use crate::core::{
        Appender, ContextGuard, ContextLogger, Dispatcher, ErrorReport, EventBindingTable,
        EventEmitter, EventSource, Instrumented, Invoke, LogContext, LogLevel, LogRecord,
        LoggerError, LoggerMetrics, MethodTable, MethodWrapSpec, OutputFormat, RedactionPolicy,
        Result, TimestampFormat,
    };
}

pub use appenders::MemoryAppender;
pub use config::{init_logger, init_logger_with, LoggerConfig, TransportConfig, TransportRegistry};
pub use core::{
    Appender, ContextGuard, ContextLogger, Dispatcher, DispatcherBuilder, ErrorReport,
    EventBindingTable, EventEmitter, EventSource, Instrumented, Invoke, LogContext, LogLevel,
    LogRecord, LoggerError, LoggerMetrics, MethodTable, MethodWrapSpec, OutputFormat,
    RedactionPolicy, Result, TimestampFormat,
};
