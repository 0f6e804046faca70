//! Structured logging context
//!
//! This module provides:
//! - `LogContext`: an ordered set of key/value fields
//! - `ContextStore`: the two-layer (default + instance) context of a logger handle
//! - `ContextGuard`: RAII guard for a scoped instance field

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Ordered key/value fields attached to log records.
///
/// The mapping is flat: structured values are stored as single values, they
/// are never merged key by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogContext {
    fields: Map<String, Value>,
}

impl LogContext {
    /// Create a new empty log context
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Add a field to the context
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field to the context (mutable version)
    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
    }

    /// Overlay `other` on top of this context; `other` wins on collision
    pub fn extend(&mut self, other: &LogContext) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    /// Get all fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// Check if context has any fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Format fields as key=value pairs
    pub fn format_fields(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}={}", k, s),
                other => format!("{}={}", k, other),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl From<Map<String, Value>> for LogContext {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for LogContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Default and instance context of one logger handle.
///
/// The default layer is fixed when the root handle is created and shared by
/// everything derived from it. The instance layer grows through [`add`] and
/// wins over the default layer on key collision.
///
/// Cloning a store yields another view of the *same* instance layer; use
/// [`derive_child`] for an independent copy.
///
/// [`add`]: ContextStore::add
/// [`derive_child`]: ContextStore::derive_child
#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    defaults: Arc<LogContext>,
    instance: Arc<RwLock<LogContext>>,
}

impl ContextStore {
    /// Create a store whose default layer is `defaults`
    pub fn new(defaults: LogContext) -> Self {
        Self {
            defaults: Arc::new(defaults),
            instance: Arc::new(RwLock::new(LogContext::new())),
        }
    }

    /// Add entries to the instance layer, overwriting existing keys.
    ///
    /// Children derived earlier are unaffected.
    pub fn add(&self, entries: &LogContext) {
        self.instance.write().extend(entries);
    }

    /// Default layer overlaid by the instance layer
    pub fn effective(&self) -> LogContext {
        let mut merged = (*self.defaults).clone();
        merged.extend(&self.instance.read());
        merged
    }

    pub fn defaults(&self) -> &LogContext {
        &self.defaults
    }

    /// Derive a store whose instance layer starts as this store's effective
    /// context with `overlay` applied on top.
    pub fn derive_child(&self, overlay: &LogContext) -> ContextStore {
        let mut instance = self.effective();
        instance.extend(overlay);
        ContextStore {
            defaults: Arc::clone(&self.defaults),
            instance: Arc::new(RwLock::new(instance)),
        }
    }

    /// Set an instance field until the returned guard is dropped.
    ///
    /// On drop the previous instance value of the key, if any, is restored.
    pub fn scoped<K, V>(&self, key: K, value: V) -> ContextGuard
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        let previous = {
            let mut instance = self.instance.write();
            let previous = instance.remove(&key);
            instance.add_field(key.clone(), value);
            previous
        };
        ContextGuard {
            instance: Arc::clone(&self.instance),
            key,
            previous,
        }
    }
}

/// RAII guard for scoped context fields
///
/// # Example
///
/// ```
/// use context_logger::core::{ContextStore, LogContext};
///
/// let store = ContextStore::new(LogContext::new());
/// {
///     let _guard = store.scoped("request_id", "abc-123");
///     assert!(store.effective().contains_key("request_id"));
/// }
/// assert!(!store.effective().contains_key("request_id"));
/// ```
pub struct ContextGuard {
    instance: Arc<RwLock<LogContext>>,
    key: String,
    previous: Option<Value>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let mut instance = self.instance.write();
        match self.previous.take() {
            Some(value) => instance.add_field(self.key.clone(), value),
            None => {
                instance.remove(&self.key);
            }
        }
    }
}
