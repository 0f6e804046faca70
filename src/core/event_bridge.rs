//! Bridge from event-emitting objects into the log stream
//!
//! Each emission of a bound event becomes one log call whose message is
//! `(<event>: <encoded args>`. The missing closing parenthesis is part of the
//! established output format; downstream parsers match on it.

use super::{
    error::{LoggerError, Result},
    facade::ContextLogger,
    log_level::LogLevel,
};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Callback run for every emission of an event
pub type Listener = Box<dyn Fn(&[Value]) -> Result<()> + Send + Sync>;

/// Turns the positional arguments of an emission into the payload text
pub type ArgEncoder = Arc<dyn Fn(&[Value]) -> Result<String> + Send + Sync>;

/// Anything listeners can subscribe to by event name
pub trait EventSource {
    fn on(&mut self, event: &str, listener: Listener);
}

/// Default encoder: drops object-like arguments (maps, arrays, null) and
/// JSON-encodes the remaining ones as an array.
pub fn encode_args(args: &[Value]) -> Result<String> {
    let kept: Vec<&Value> = args
        .iter()
        .filter(|v| !matches!(v, Value::Object(_) | Value::Array(_) | Value::Null))
        .collect();
    Ok(serde_json::to_string(&kept)?)
}

/// Message logged for one emission
pub fn event_message(event: &str, payload: &str) -> String {
    format!("({}: {}", event, payload)
}

/// One event-to-level binding with an optional encoder override
#[derive(Clone)]
pub struct EventBinding {
    event: String,
    level: LogLevel,
    encoder: Option<ArgEncoder>,
}

impl EventBinding {
    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn encode(&self, args: &[Value]) -> Result<String> {
        match &self.encoder {
            Some(encoder) => encoder(args),
            None => encode_args(args),
        }
    }
}

impl fmt::Debug for EventBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBinding")
            .field("event", &self.event)
            .field("level", &self.level)
            .field("custom_encoder", &self.encoder.is_some())
            .finish()
    }
}

/// Which events of one source to log, and at which level
///
/// # Example
///
/// ```
/// use context_logger::core::{EventBindingTable, LogLevel};
///
/// let table = EventBindingTable::new()
///     .bind("open", LogLevel::Info)
///     .bind("error", LogLevel::Error);
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventBindingTable {
    bindings: Vec<EventBinding>,
}

impl EventBindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `event` at `level` with the default encoder
    #[must_use]
    pub fn bind(mut self, event: impl Into<String>, level: LogLevel) -> Self {
        self.insert(event.into(), level, None);
        self
    }

    /// Bind `event` at `level` with a custom argument encoder
    #[must_use]
    pub fn bind_with(mut self, event: impl Into<String>, level: LogLevel, encoder: ArgEncoder) -> Self {
        self.insert(event.into(), level, Some(encoder));
        self
    }

    // Re-binding an event replaces the earlier entry, like a map key.
    fn insert(&mut self, event: String, level: LogLevel, encoder: Option<ArgEncoder>) {
        let binding = EventBinding { event, level, encoder };
        match self.bindings.iter_mut().find(|b| b.event == binding.event) {
            Some(existing) => *existing = binding,
            None => self.bindings.push(binding),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, LogLevel)> for EventBindingTable {
    fn from_iter<I: IntoIterator<Item = (K, LogLevel)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |table, (event, level)| table.bind(event, level))
    }
}

/// Subscribe every binding of `table` on `source`, logging through `logger`.
///
/// Listeners hold a clone of the handle, so context added to `logger` later
/// shows up in event records. Events that `source` never emits are not an
/// error; their listeners simply never run.
pub fn bind<S: EventSource + ?Sized>(source: &mut S, table: &EventBindingTable, logger: &ContextLogger) {
    for binding in table.iter() {
        let event = binding.event.clone();
        let binding = binding.clone();
        let logger = logger.clone();
        source.on(
            &event,
            Box::new(move |args| {
                let payload = binding.encode(args).map_err(|e| match e {
                    LoggerError::Encoding { .. } => e,
                    other => LoggerError::encoding(binding.event.as_str(), other.to_string()),
                })?;
                logger.log(binding.level, event_message(&binding.event, &payload))
            }),
        );
    }
}

/// Minimal in-process event source.
///
/// # Example
///
/// ```
/// use context_logger::core::{EventEmitter, EventSource};
/// use serde_json::json;
///
/// let mut emitter = EventEmitter::new();
/// emitter.on("tick", Box::new(|_args| Ok(())));
/// assert_eq!(emitter.emit("tick", &[json!(1)])?, 1);
/// assert_eq!(emitter.emit("unknown", &[])?, 0);
/// # Ok::<(), context_logger::LoggerError>(())
/// ```
#[derive(Default)]
pub struct EventEmitter {
    listeners: HashMap<String, Vec<Listener>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every listener of `event` in subscription order.
    ///
    /// Returns how many listeners ran; stops at the first listener error.
    pub fn emit(&self, event: &str, args: &[Value]) -> Result<usize> {
        let Some(listeners) = self.listeners.get(event) else {
            return Ok(0);
        };
        for listener in listeners {
            listener(args)?;
        }
        Ok(listeners.len())
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }
}

impl EventSource for EventEmitter {
    fn on(&mut self, event: &str, listener: Listener) {
        self.listeners.entry(event.to_string()).or_default().push(listener);
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<_> = self.listeners.keys().collect();
        events.sort();
        f.debug_struct("EventEmitter").field("events", &events).finish()
    }
}
