//! The logger handle used by application code
//!
//! Every leveled call merges the handle's effective context with the
//! call-site data (call-site wins), masks sensitive keys, bounds the nesting
//! depth and hands the record to the shared [`Dispatcher`].

use super::{
    depth_limit::{bound_map, DEFAULT_MAX_DEPTH},
    dispatcher::Dispatcher,
    error::{LoggerError, Result},
    error_report::ErrorReport,
    event_bridge::{self, EventBindingTable, EventSource},
    instrument::{Instrumented, Invoke, MethodWrapSpec},
    log_context::{ContextGuard, ContextStore, LogContext},
    log_level::LogLevel,
    log_record::LogRecord,
    redaction::{redact_map, RedactionPolicy},
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Structured logger handle.
///
/// Handles derived with [`get_logger_with_context`] share the dispatcher and
/// the redaction policy but own an independent copy of the context. A plain
/// `clone()` is another reference to the same handle, context included.
///
/// # Example
///
/// ```
/// use context_logger::prelude::*;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let memory = MemoryAppender::new();
/// let dispatcher = Dispatcher::builder()
///     .min_level(LogLevel::Debug)
///     .appender(memory.clone())
///     .build();
/// let policy = RedactionPolicy::new(["password"], Vec::<String>::new())?;
/// let logger = ContextLogger::new(
///     Arc::new(dispatcher),
///     Arc::new(policy),
///     LogContext::new().with_field("service", "billing"),
/// );
///
/// logger.info_with("user signed in", &json!({"user": "ann", "password": "hunter2"}))?;
///
/// let record = &memory.records()[0];
/// assert_eq!(record.data["service"], json!("billing"));
/// assert_eq!(record.data["password"], json!("**********string**********"));
/// # Ok::<(), context_logger::LoggerError>(())
/// ```
///
/// [`get_logger_with_context`]: ContextLogger::get_logger_with_context
#[derive(Clone)]
pub struct ContextLogger {
    dispatcher: Arc<Dispatcher>,
    policy: Arc<RedactionPolicy>,
    context: ContextStore,
    max_depth: usize,
}

impl ContextLogger {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        policy: Arc<RedactionPolicy>,
        default_context: LogContext,
    ) -> Self {
        Self {
            dispatcher,
            policy,
            context: ContextStore::new(default_context),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set how many levels of nested maps stay structured
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn policy(&self) -> &Arc<RedactionPolicy> {
        &self.policy
    }

    // ------------------------------------------------------------------
    // Context
    // ------------------------------------------------------------------

    /// Add entries to this handle's context, returning the handle for chaining
    pub fn add_to_context(&self, entries: impl Into<LogContext>) -> &Self {
        self.context.add(&entries.into());
        self
    }

    /// Effective context: defaults overlaid by the instance context
    pub fn context(&self) -> LogContext {
        self.context.effective()
    }

    /// Set a context field until the guard is dropped
    pub fn scoped_context<K, V>(&self, key: K, value: V) -> ContextGuard
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.context.scoped(key, value)
    }

    /// Derive a handle whose context is this one's plus `overlay`
    pub fn get_logger_with_context(&self, overlay: impl Into<LogContext>) -> ContextLogger {
        ContextLogger {
            dispatcher: Arc::clone(&self.dispatcher),
            policy: Arc::clone(&self.policy),
            context: self.context.derive_child(&overlay.into()),
            max_depth: self.max_depth,
        }
    }

    // ------------------------------------------------------------------
    // Preparation
    // ------------------------------------------------------------------

    /// Merge, redact and bound the data of one call.
    ///
    /// `extra` entries are applied last and win over call-site data.
    pub fn prepare_data(&self, data: Option<Value>, extra: &[(&str, Value)]) -> Result<Map<String, Value>> {
        let fields = call_site_fields(data)?;
        Ok(self.prepare_fields(fields, extra))
    }

    fn prepare_fields(&self, fields: Map<String, Value>, extra: &[(&str, Value)]) -> Map<String, Value> {
        let mut merged = self.context.effective().into_map();
        for (key, value) in fields {
            merged.insert(key, value);
        }
        for (key, value) in extra {
            merged.insert((*key).to_string(), value.clone());
        }

        let redacted = redact_map(&merged, &self.policy);
        bound_map(&redacted, self.max_depth)
    }

    // Call-site data is validated at every level; only merging, masking and
    // dispatch are skipped for filtered levels.
    fn write(
        &self,
        level: LogLevel,
        message: &str,
        data: Option<Value>,
        extra: &[(&str, Value)],
    ) -> Result<()> {
        let fields = call_site_fields(data)?;
        if !self.dispatcher.enabled(level) {
            return Ok(());
        }
        let data = self.prepare_fields(fields, extra);
        self.dispatcher
            .dispatch(&LogRecord::new(level, message).with_data(data));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Leveled operations
    // ------------------------------------------------------------------

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) -> Result<()> {
        self.write(level, message.as_ref(), None, &[])
    }

    /// Log with call-site data. `data` must serialize to a map (or null).
    pub fn log_with<D>(&self, level: LogLevel, message: impl AsRef<str>, data: &D) -> Result<()>
    where
        D: Serialize + ?Sized,
    {
        let data = serde_json::to_value(data)?;
        self.write(level, message.as_ref(), Some(data), &[])
    }

    #[inline]
    pub fn trace(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::Trace, message)
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    pub fn trace_with<D: Serialize + ?Sized>(&self, message: impl AsRef<str>, data: &D) -> Result<()> {
        self.log_with(LogLevel::Trace, message, data)
    }

    pub fn debug_with<D: Serialize + ?Sized>(&self, message: impl AsRef<str>, data: &D) -> Result<()> {
        self.log_with(LogLevel::Debug, message, data)
    }

    pub fn info_with<D: Serialize + ?Sized>(&self, message: impl AsRef<str>, data: &D) -> Result<()> {
        self.log_with(LogLevel::Info, message, data)
    }

    pub fn warn_with<D: Serialize + ?Sized>(&self, message: impl AsRef<str>, data: &D) -> Result<()> {
        self.log_with(LogLevel::Warn, message, data)
    }

    pub fn error_with<D: Serialize + ?Sized>(&self, message: impl AsRef<str>, data: &D) -> Result<()> {
        self.log_with(LogLevel::Error, message, data)
    }

    // ------------------------------------------------------------------
    // Alerts and errors
    // ------------------------------------------------------------------

    /// Error-level record flagged with `alert: true`
    pub fn alert(&self, message: impl AsRef<str>) -> Result<()> {
        self.write(LogLevel::Error, message.as_ref(), None, &[("alert", Value::Bool(true))])
    }

    pub fn alert_with<D: Serialize + ?Sized>(&self, message: impl AsRef<str>, data: &D) -> Result<()> {
        let data = serde_json::to_value(data)?;
        self.write(
            LogLevel::Error,
            message.as_ref(),
            Some(data),
            &[("alert", Value::Bool(true))],
        )
    }

    /// Error-level record carrying the error message and its stack lines
    pub fn send_error(&self, error: impl Into<ErrorReport>) -> Result<()> {
        self.report(error.into(), None, false)
    }

    pub fn send_error_with<D: Serialize + ?Sized>(
        &self,
        error: impl Into<ErrorReport>,
        data: &D,
    ) -> Result<()> {
        let data = serde_json::to_value(data)?;
        self.report(error.into(), Some(data), false)
    }

    /// [`send_error`](Self::send_error) flagged with `alert: true`
    pub fn alert_error(&self, error: impl Into<ErrorReport>) -> Result<()> {
        self.report(error.into(), None, true)
    }

    pub fn alert_error_with<D: Serialize + ?Sized>(
        &self,
        error: impl Into<ErrorReport>,
        data: &D,
    ) -> Result<()> {
        let data = serde_json::to_value(data)?;
        self.report(error.into(), Some(data), true)
    }

    fn report(&self, report: ErrorReport, data: Option<Value>, alert: bool) -> Result<()> {
        let mut extra = Vec::with_capacity(2);
        if alert {
            extra.push(("alert", Value::Bool(true)));
        }
        if let Some(stack) = report.stack() {
            extra.push(("stack", Value::from(stack)));
        }
        self.write(LogLevel::Error, report.message(), data, &extra)
    }

    // ------------------------------------------------------------------
    // Bridges
    // ------------------------------------------------------------------

    /// Log every event named in `table` that `source` emits
    pub fn log_event<S: EventSource + ?Sized>(&self, source: &mut S, table: &EventBindingTable) {
        event_bridge::bind(source, table, self);
    }

    /// Wrap `target` so the methods named in `spec` are logged before they run
    pub fn wrap_object<T: Invoke>(
        &self,
        target: T,
        spec: MethodWrapSpec,
        label: impl Into<String>,
    ) -> Instrumented<T> {
        Instrumented::new(target, spec, label, self.clone())
    }

    pub fn flush(&self) -> Result<()> {
        self.dispatcher.flush()
    }
}

/// Call-site data as a map; null means no data
fn call_site_fields(data: Option<Value>) -> Result<Map<String, Value>> {
    match data {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(fields)) => Ok(fields),
        Some(other) => Err(LoggerError::invalid_data(kind_name(&other))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn setup(hide_keys: &[&str]) -> (ContextLogger, MemoryAppender) {
        let memory = MemoryAppender::new();
        let dispatcher = Dispatcher::builder()
            .min_level(LogLevel::Debug)
            .appender(memory.clone())
            .build();
        let policy = RedactionPolicy::new(hide_keys.iter().copied(), Vec::<String>::new()).unwrap();
        let logger = ContextLogger::new(
            Arc::new(dispatcher),
            Arc::new(policy),
            LogContext::new().with_field("service", "api"),
        );
        (logger, memory)
    }

    #[test]
    fn test_call_site_data_wins_over_context() {
        let (logger, memory) = setup(&[]);
        logger.add_to_context(LogContext::new().with_field("user", "ctx"));
        logger.info_with("hello", &json!({"user": "call"})).unwrap();

        let record = memory.last().unwrap();
        assert_eq!(record.level, LogLevel::Info);
        assert_eq!(record.message, "hello");
        assert_eq!(record.data["user"], json!("call"));
        assert_eq!(record.data["service"], json!("api"));
    }

    #[test]
    fn test_redacts_then_bounds() {
        let (logger, memory) = setup(&["password"]);
        logger
            .warn_with(
                "login",
                &json!({"auth": {"password": "pw", "meta": {"deep": {"x": 1}}}}),
            )
            .unwrap();

        let record = memory.last().unwrap();
        assert_eq!(record.data["auth"]["password"], json!("**********string**********"));
        assert_eq!(record.data["auth"]["meta"], json!(r#"{"deep":{"x":1}}"#));
    }

    #[test]
    fn test_alert_injects_flag_at_error_level() {
        let (logger, memory) = setup(&[]);
        logger.alert_with("disk", &json!({"alert": false, "free": 0})).unwrap();

        let record = memory.last().unwrap();
        assert_eq!(record.level, LogLevel::Error);
        assert_eq!(record.data["alert"], json!(true));
        assert_eq!(record.data["free"], json!(0));
    }

    #[test]
    fn test_send_error_coerces_strings() {
        let (logger, memory) = setup(&[]);
        logger.send_error("boom").unwrap();

        let record = memory.last().unwrap();
        assert_eq!(record.level, LogLevel::Error);
        assert_eq!(record.message, "boom");
        assert!(record.data["stack"].is_array());
    }

    #[test]
    fn test_alert_error_with_data() {
        let (logger, memory) = setup(&[]);
        let err = LoggerError::writer("socket closed");
        logger.alert_error_with(err, &json!({"peer": "10.0.0.1"})).unwrap();

        let record = memory.last().unwrap();
        assert_eq!(record.message, "Writer error: socket closed");
        assert_eq!(record.data["alert"], json!(true));
        assert_eq!(record.data["peer"], json!("10.0.0.1"));
        assert_eq!(record.data["stack"], json!([]));
    }

    #[test]
    fn test_message_only_report_has_no_stack_key() {
        let (logger, memory) = setup(&[]);
        logger.send_error(ErrorReport::message_only("plain")).unwrap();
        assert!(!memory.last().unwrap().data.contains_key("stack"));
    }

    #[test]
    fn test_non_map_data_rejected() {
        let (logger, memory) = setup(&[]);
        let err = logger.info_with("bad", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidData { kind: "array" }));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_unserializable_data_fails_the_call() {
        let (logger, _memory) = setup(&[]);
        let mut data = BTreeMap::new();
        data.insert((1, 2), "tuple keys cannot be JSON object keys");
        let err = logger.info_with("bad", &data).unwrap_err();
        assert!(matches!(err, LoggerError::Serialization(_)));
    }

    #[test]
    fn test_null_data_is_no_data() {
        let (logger, memory) = setup(&[]);
        logger.debug_with("nothing", &()).unwrap();
        assert_eq!(memory.last().unwrap().data.len(), 1);
    }

    #[test]
    fn test_filtered_levels_skip_dispatch() {
        let (logger, memory) = setup(&[]);
        logger.trace_with("hidden", &json!({"k": 1})).unwrap();
        logger.trace("hidden too").unwrap();
        assert!(memory.is_empty());
        assert_eq!(logger.dispatcher().metrics().total_logged(), 0);
    }

    #[test]
    fn test_filtered_levels_still_validate_data() {
        let (logger, memory) = setup(&[]);
        logger.dispatcher().set_min_level(LogLevel::Info);

        let mut data = BTreeMap::new();
        data.insert((1, 2), "x");
        let err = logger.debug_with("m", &data).unwrap_err();
        assert!(matches!(err, LoggerError::Serialization(_)));

        let err = logger.trace_with("m", &json!([1])).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidData { kind: "array" }));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_error_entry_points_reject_bad_data() {
        let (logger, memory) = setup(&[]);

        let mut data = BTreeMap::new();
        data.insert((1, 2), "x");
        assert!(matches!(logger.alert_with("a", &data), Err(LoggerError::Serialization(_))));
        assert!(matches!(
            logger.send_error_with("e", &json!("text")),
            Err(LoggerError::InvalidData { kind: "string" })
        ));
        assert!(matches!(
            logger.alert_error_with("e", &json!(7)),
            Err(LoggerError::InvalidData { kind: "number" })
        ));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_child_shares_sink_not_context() {
        let (logger, memory) = setup(&[]);
        let child = logger.get_logger_with_context(LogContext::new().with_field("x", 1));
        child.add_to_context(LogContext::new().with_field("y", 2));

        child.info("from child").unwrap();
        logger.info("from parent").unwrap();

        let records = memory.records();
        assert_eq!(records[0].data["x"], json!(1));
        assert_eq!(records[0].data["y"], json!(2));
        assert!(!records[1].data.contains_key("x"));
        assert!(!records[1].data.contains_key("y"));
    }

    #[test]
    fn test_keys_normalized() {
        let (logger, memory) = setup(&[]);
        logger.info_with("k", &json!({"1": "one", "a.b$c": true})).unwrap();

        let record = memory.last().unwrap();
        assert_eq!(record.data["__1"], json!("one"));
        assert_eq!(record.data["a_b_c"], json!(true));
    }
}
