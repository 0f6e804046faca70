//! Core logger types and traits

pub mod appender;
pub mod depth_limit;
pub mod dispatcher;
pub mod error;
pub mod error_report;
pub mod event_bridge;
pub mod facade;
pub mod instrument;
pub mod log_context;
pub mod log_level;
pub mod log_record;
pub mod metrics;
pub mod output_format;
pub mod redaction;
pub mod timestamp;

pub use appender::Appender;
pub use depth_limit::{bound, bound_map, normalize_key, DEFAULT_MAX_DEPTH};
pub use dispatcher::{DiagnosticCallback, Dispatcher, DispatcherBuilder};
pub use error::{LoggerError, Result};
pub use error_report::ErrorReport;
pub use event_bridge::{
    encode_args, event_message, ArgEncoder, EventBinding, EventBindingTable, EventEmitter,
    EventSource, Listener,
};
pub use facade::ContextLogger;
pub use instrument::{Instrumented, Invoke, MethodTable, MethodWrapSpec};
pub use log_context::{ContextGuard, ContextStore, LogContext};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use redaction::{redact, redact_map, RedactionPolicy};
pub use timestamp::TimestampFormat;
