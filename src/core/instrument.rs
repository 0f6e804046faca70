//! Call-level instrumentation of existing objects
//!
//! A target exposes its callable surface through [`Invoke`]. Wrapping it in
//! [`Instrumented`] logs `Call <label>.<method>` with the arguments before
//! each listed method runs; every other method and every field is reached
//! unchanged through `Deref`.

use super::{
    error::{LoggerError, Result},
    facade::ContextLogger,
    log_level::LogLevel,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Dynamic call surface of an object
pub trait Invoke {
    /// Call `method` with positional arguments.
    ///
    /// Unknown methods return [`LoggerError::MethodNotFound`].
    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value>;

    fn has_method(&self, method: &str) -> bool;
}

/// Method body stored in a [`MethodTable`]
pub type Method = Box<dyn FnMut(&[Value]) -> Result<Value> + Send>;

/// An [`Invoke`] implementation assembled from closures.
///
/// # Example
///
/// ```
/// use context_logger::core::{Invoke, MethodTable};
/// use serde_json::{json, Value};
///
/// let mut math = MethodTable::new("math").method("add", |args| {
///     let sum: i64 = args.iter().filter_map(Value::as_i64).sum();
///     Ok(json!(sum))
/// });
/// assert_eq!(math.invoke("add", vec![json!(1), json!(2)])?, json!(3));
/// # Ok::<(), context_logger::LoggerError>(())
/// ```
pub struct MethodTable {
    name: String,
    methods: HashMap<String, Method>,
}

impl MethodTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: HashMap::new(),
        }
    }

    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: FnMut(&[Value]) -> Result<Value> + Send + 'static,
    {
        self.methods.insert(name.into(), Box::new(body));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Invoke for MethodTable {
    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value> {
        match self.methods.get_mut(method) {
            Some(body) => body(&args),
            None => Err(LoggerError::method_not_found(&self.name, method)),
        }
    }

    fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<_> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("MethodTable")
            .field("name", &self.name)
            .field("methods", &methods)
            .finish()
    }
}

/// Methods to instrument and the level each call is logged at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodWrapSpec {
    methods: HashMap<String, LogLevel>,
}

impl MethodWrapSpec {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn wrap(mut self, method: impl Into<String>, level: LogLevel) -> Self {
        self.methods.insert(method.into(), level);
        self
    }

    pub fn level_for(&self, method: &str) -> Option<LogLevel> {
        self.methods.get(method).copied()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, LogLevel)> for MethodWrapSpec {
    fn from_iter<I: IntoIterator<Item = (K, LogLevel)>>(iter: I) -> Self {
        Self {
            methods: iter.into_iter().map(|(k, level)| (k.into(), level)).collect(),
        }
    }
}

/// Decorator that logs listed calls, then forwards them to the target.
///
/// The return value of the target is passed back untouched; if it stands for
/// deferred work, only the call itself is logged.
pub struct Instrumented<T> {
    target: T,
    spec: MethodWrapSpec,
    label: String,
    logger: ContextLogger,
}

impl<T: Invoke> Instrumented<T> {
    pub fn new(target: T, spec: MethodWrapSpec, label: impl Into<String>, logger: ContextLogger) -> Self {
        Self {
            target,
            spec,
            label: label.into(),
            logger,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn spec(&self) -> &MethodWrapSpec {
        &self.spec
    }

    pub fn into_inner(self) -> T {
        self.target
    }
}

impl<T: Invoke> Invoke for Instrumented<T> {
    fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value> {
        if let Some(level) = self.spec.level_for(method) {
            self.logger.log_with(
                level,
                format!("Call {}.{}", self.label, method),
                &json!({ "args": &args }),
            )?;
        }
        self.target.invoke(method, args)
    }

    fn has_method(&self, method: &str) -> bool {
        self.target.has_method(method)
    }
}

impl<T> Deref for Instrumented<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.target
    }
}

impl<T> DerefMut for Instrumented<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.target
    }
}

impl<T: fmt::Debug> fmt::Debug for Instrumented<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumented")
            .field("target", &self.target)
            .field("spec", &self.spec)
            .field("label", &self.label)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::{Dispatcher, LogContext, RedactionPolicy};
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

    fn adder() -> MethodTable {
        MethodTable::new("calc")
            .method("foo", |args| {
                let sum: i64 = args.iter().filter_map(Value::as_i64).sum();
                Ok(json!(sum))
            })
            .method("ping", |_| Ok(json!("pong")))
    }

    /// Typed target with state outside the dynamic surface
    struct Counter {
        hits: u32,
    }

    impl Invoke for Counter {
        fn invoke(&mut self, method: &str, _args: Vec<Value>) -> Result<Value> {
            match method {
                "hit" => {
                    self.hits += 1;
                    Ok(json!(self.hits))
                }
                _ => Err(LoggerError::method_not_found("counter", method)),
            }
        }

        fn has_method(&self, method: &str) -> bool {
            method == "hit"
        }
    }

    #[test]
    fn test_wrapped_call_logs_and_returns_result() {
        let (logger, memory) = logger();
        let mut wrapped = logger.wrap_object(
            adder(),
            MethodWrapSpec::new().wrap("foo", LogLevel::Debug),
            "calc",
        );

        let result = wrapped.invoke("foo", vec![json!(1), json!(2)]).unwrap();
        assert_eq!(result, json!(3));

        let record = memory.last().unwrap();
        assert_eq!(record.level, LogLevel::Debug);
        assert_eq!(record.message, "Call calc.foo");
        assert_eq!(record.data["args"], json!([1, 2]));
    }

    #[test]
    fn test_unlisted_methods_pass_through_silently() {
        let (logger, memory) = logger();
        let mut wrapped = logger.wrap_object(
            adder(),
            MethodWrapSpec::new().wrap("foo", LogLevel::Info),
            "calc",
        );

        assert_eq!(wrapped.invoke("ping", vec![]).unwrap(), json!("pong"));
        assert!(memory.is_empty());
        assert!(wrapped.has_method("ping"));
        assert_eq!(wrapped.name(), "calc");
    }

    #[test]
    fn test_missing_method_logs_then_fails() {
        let (logger, memory) = logger();
        let mut wrapped = logger.wrap_object(
            adder(),
            MethodWrapSpec::new().wrap("missing", LogLevel::Warn),
            "calc",
        );

        let err = wrapped.invoke("missing", vec![]).unwrap_err();
        assert!(matches!(err, LoggerError::MethodNotFound { .. }));
        assert_eq!(memory.messages(), vec!["Call calc.missing".to_string()]);
    }

    #[test]
    fn test_typed_target_state_reachable() {
        let (logger, memory) = logger();
        let spec: MethodWrapSpec = vec![("hit", LogLevel::Trace)].into_iter().collect();
        let mut wrapped = logger.wrap_object(Counter { hits: 0 }, spec, "counter");

        wrapped.invoke("hit", vec![]).unwrap();
        wrapped.invoke("hit", vec![]).unwrap();
        wrapped.hits += 10;

        assert_eq!(wrapped.hits, 12);
        assert_eq!(memory.len(), 2);
        assert_eq!(wrapped.into_inner().hits, 12);
    }
}
