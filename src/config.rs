//! Logger initialization from configuration
//!
//! A [`LoggerConfig`] names the threshold, the transports to write to, the
//! default context and the redaction rules. [`init_logger`] turns it into a
//! root [`ContextLogger`]; every handle derived from that root shares the same
//! transports.
//!
//! ```
//! use context_logger::config::{init_logger, LoggerConfig};
//!
//! let config = LoggerConfig::from_json(r#"{
//!     "level": "info",
//!     "transports": [{ "type": "Console", "params": { "timestamp": true } }],
//!     "addToContext": { "service": "billing" },
//!     "hideKeys": ["password"],
//!     "hideRegex": ["^secret_"]
//! }"#)?;
//!
//! let logger = init_logger(&config)?;
//! assert_eq!(logger.context().get("service"), Some(&serde_json::json!("billing")));
//! # Ok::<(), context_logger::LoggerError>(())
//! ```

use crate::core::{
    Appender, ContextLogger, Dispatcher, LogContext, LogLevel, LoggerError, RedactionPolicy,
    Result, DEFAULT_MAX_DEPTH,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a sink from the `params` of a [`TransportConfig`]
pub type TransportFactory = Arc<dyn Fn(&Value) -> Result<Box<dyn Appender>> + Send + Sync>;

/// Initialization settings of a root logger
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub transports: Vec<TransportConfig>,
    pub add_to_context: Map<String, Value>,
    pub hide_keys: Vec<String>,
    pub hide_regex: Vec<String>,
    pub max_depth: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            transports: vec![TransportConfig::new("Console", json!({ "timestamp": true }))],
            add_to_context: Map::new(),
            hide_keys: Vec::new(),
            hide_regex: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LoggerConfig {
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Replace the transport list with `transports`
    #[must_use]
    pub fn with_transports(mut self, transports: Vec<TransportConfig>) -> Self {
        self.transports = transports;
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_to_context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn hide_key(mut self, key: impl Into<String>) -> Self {
        self.hide_keys.push(key.into());
        self
    }

    #[must_use]
    pub fn hide_regex(mut self, pattern: impl Into<String>) -> Self {
        self.hide_regex.push(pattern.into());
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Compile the key and regex lists into a policy
    pub fn redaction_policy(&self) -> Result<RedactionPolicy> {
        RedactionPolicy::new(self.hide_keys.iter().cloned(), &self.hide_regex)
    }
}

/// One transport entry: a registered type name and its parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransportConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: Value,
}

impl TransportConfig {
    pub fn new(kind: impl Into<String>, params: Value) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }
}

/// Transport type names mapped to the factories that build them
#[derive(Clone)]
pub struct TransportRegistry {
    factories: HashMap<String, TransportFactory>,
}

impl TransportRegistry {
    /// Registry without any transport types
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the built-in transports enabled by crate features
    pub fn new() -> Self {
        let mut registry = Self::empty();
        #[cfg(feature = "console")]
        registry.register("Console", builtin::console);
        #[cfg(feature = "file")]
        {
            registry.register("File", builtin::file);
            registry.register("Json", builtin::json);
        }
        #[cfg(feature = "network")]
        registry.register("Network", builtin::network);
        registry
    }

    /// Register a factory, replacing any previous one of the same name
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<Box<dyn Appender>> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn create(&self, transport: &TransportConfig) -> Result<Box<dyn Appender>> {
        let factory = self
            .factories
            .get(&transport.kind)
            .ok_or_else(|| LoggerError::unknown_transport(&transport.kind))?;
        factory(&transport.params)
    }
}

impl Default for TransportRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransportRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("TransportRegistry").field("kinds", &kinds).finish()
    }
}

/// Build a root logger with the built-in transports
pub fn init_logger(config: &LoggerConfig) -> Result<ContextLogger> {
    init_logger_with(config, &TransportRegistry::new())
}

/// Build a root logger, resolving transport types through `registry`.
///
/// Each call returns an independent root with its own sinks.
pub fn init_logger_with(config: &LoggerConfig, registry: &TransportRegistry) -> Result<ContextLogger> {
    let policy = config.redaction_policy()?;

    let mut builder = Dispatcher::builder().min_level(config.level);
    for transport in &config.transports {
        builder = builder.boxed_appender(registry.create(transport)?);
    }

    let logger = ContextLogger::new(
        Arc::new(builder.build()),
        Arc::new(policy),
        LogContext::from(config.add_to_context.clone()),
    )
    .with_max_depth(config.max_depth);
    Ok(logger)
}

/// Decode transport params, treating absent params as an empty map
#[cfg(any(feature = "console", feature = "file", feature = "network"))]
fn params<T: for<'de> Deserialize<'de>>(kind: &str, params: &Value) -> Result<T> {
    let value = if params.is_null() {
        Value::Object(Map::new())
    } else {
        params.clone()
    };
    serde_json::from_value(value)
        .map_err(|e| LoggerError::config(format!("transport {}", kind), e.to_string()))
}

#[cfg(any(feature = "console", feature = "file", feature = "network"))]
mod builtin {
    use super::params;
    #[cfg(feature = "console")]
    use crate::core::LogLevel;
    use crate::core::{Appender, Result};
    use serde::Deserialize;
    use serde_json::Value;

    #[cfg(feature = "console")]
    #[derive(Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct ConsoleParams {
        timestamp: bool,
        colors: bool,
        stderr_levels: Vec<LogLevel>,
    }

    #[cfg(feature = "console")]
    impl Default for ConsoleParams {
        fn default() -> Self {
            Self {
                timestamp: false,
                colors: true,
                stderr_levels: vec![LogLevel::Error],
            }
        }
    }

    #[cfg(feature = "file")]
    #[derive(Deserialize)]
    struct FileParams {
        filename: String,
    }

    #[cfg(feature = "file")]
    #[derive(Deserialize)]
    struct JsonParams {
        filename: String,
        #[serde(default)]
        pretty: bool,
    }

    #[cfg(feature = "network")]
    #[derive(Deserialize)]
    #[serde(default)]
    struct NetworkParams {
        host: String,
        port: u16,
        tag: Option<String>,
    }

    #[cfg(feature = "network")]
    impl Default for NetworkParams {
        fn default() -> Self {
            Self {
                host: "localhost".to_string(),
                port: 24224,
                tag: None,
            }
        }
    }

    #[cfg(feature = "console")]
    pub(super) fn console(value: &Value) -> Result<Box<dyn Appender>> {
        use crate::appenders::ConsoleAppender;
        use crate::core::TimestampFormat;

        let p: ConsoleParams = params("Console", value)?;
        let appender = ConsoleAppender::with_colors(p.colors)
            .with_timestamp_format(p.timestamp.then(TimestampFormat::default))
            .with_stderr_levels(p.stderr_levels);
        Ok(Box::new(appender))
    }

    #[cfg(feature = "file")]
    pub(super) fn file(value: &Value) -> Result<Box<dyn Appender>> {
        let p: FileParams = params("File", value)?;
        Ok(Box::new(crate::appenders::FileAppender::new(p.filename)?))
    }

    #[cfg(feature = "file")]
    pub(super) fn json(value: &Value) -> Result<Box<dyn Appender>> {
        use crate::appenders::JsonAppender;

        let p: JsonParams = params("Json", value)?;
        let appender = if p.pretty {
            JsonAppender::new_pretty(p.filename)?
        } else {
            JsonAppender::new(p.filename)?
        };
        Ok(Box::new(appender))
    }

    #[cfg(feature = "network")]
    pub(super) fn network(value: &Value) -> Result<Box<dyn Appender>> {
        use crate::appenders::NetworkAppender;

        let p: NetworkParams = params("Network", value)?;
        let mut appender = NetworkAppender::new(&p.host, p.port);
        if let Some(tag) = p.tag {
            appender = appender.with_tag(tag);
        }
        Ok(Box::new(appender))
    }
}
