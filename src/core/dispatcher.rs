//! Record dispatch to the configured sinks

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::LoggerMetrics,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Out-of-band channel for sink failures: receives the sink name and the error.
pub type DiagnosticCallback = Arc<dyn Fn(&str, &LoggerError) + Send + Sync>;

fn stderr_diagnostic(sink: &str, error: &LoggerError) {
    eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink, error);
}

/// Shared backend of every logger handle derived from one root.
///
/// Writes are synchronous and fire-and-forget: a failing or panicking sink is
/// reported to the diagnostic callback and the remaining sinks still receive
/// the record. Nothing is buffered or retried.
pub struct Dispatcher {
    min_level: RwLock<LogLevel>,
    appenders: Mutex<Vec<Box<dyn Appender>>>,
    metrics: LoggerMetrics,
    on_error: DiagnosticCallback,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: RwLock::new(LogLevel::Info),
            appenders: Mutex::new(Vec::new()),
            metrics: LoggerMetrics::new(),
            on_error: Arc::new(stderr_diagnostic),
        }
    }

    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.lock().push(appender);
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }

    /// Number of attached sinks
    pub fn appender_count(&self) -> usize {
        self.appenders.lock().len()
    }

    /// Write a record to every sink, isolating failures per sink.
    ///
    /// Returns `true` when every sink accepted the record.
    pub fn dispatch(&self, record: &LogRecord) -> bool {
        if !self.enabled(record.level) {
            return true;
        }

        let mut appenders = self.appenders.lock();
        let mut has_error = false;

        for appender in appenders.iter_mut() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(record)
            }));

            let error = match append_result {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    LoggerError::other(format!("sink panicked: {}", panic_msg))
                }
            };

            has_error = true;
            self.metrics.record_sink_error();
            (self.on_error)(appender.name(), &error);
        }

        if has_error {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }

        !has_error
    }

    /// Flush every sink, returning the first error after trying all of them
    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        let mut first_error = None;
        for appender in appenders.iter_mut() {
            if let Err(e) = appender.flush() {
                (self.on_error)(appender.name(), &e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // Failures were already passed to the diagnostic callback
        let _ = self.flush();
    }
}

/// Builder for constructing a [`Dispatcher`] with a fluent API
///
/// # Example
/// ```
/// use context_logger::prelude::*;
/// use std::sync::Arc;
///
/// let dispatcher = Dispatcher::builder()
///     .min_level(LogLevel::Debug)
///     .appender(MemoryAppender::new())
///     .on_error(Arc::new(|sink, err| eprintln!("{sink}: {err}")))
///     .build();
/// assert_eq!(dispatcher.appender_count(), 1);
/// ```
pub struct DispatcherBuilder {
    min_level: LogLevel,
    appenders: Vec<Box<dyn Appender>>,
    on_error: Option<DiagnosticCallback>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            appenders: Vec::new(),
            on_error: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Add an appender
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_appender(mut self, appender: Box<dyn Appender>) -> Self {
        self.appenders.push(appender);
        self
    }

    /// Replace the stderr diagnostic output for sink failures
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: DiagnosticCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    pub fn build(self) -> Dispatcher {
        let mut dispatcher = Dispatcher::new();
        dispatcher.set_min_level(self.min_level);
        if let Some(callback) = self.on_error {
            dispatcher.on_error = callback;
        }
        for appender in self.appenders {
            dispatcher.add_appender(appender);
        }
        dispatcher
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
