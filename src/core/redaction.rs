//! Sensitive field redaction
//!
//! A [`RedactionPolicy`] names the keys whose values must never leave the
//! process, either by exact match or by regular expression. [`redact`] walks a
//! data tree and replaces every matching value with a placeholder that only
//! keeps the value's type tag, e.g. `**********string**********`.

use super::error::{LoggerError, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;

const MASK: &str = "**********";

/// Exact keys and key patterns to hide. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RedactionPolicy {
    keys: HashSet<String>,
    patterns: Vec<Regex>,
}

impl RedactionPolicy {
    /// A policy that hides nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a policy from exact keys and regex sources.
    ///
    /// Fails on the first pattern that does not compile.
    pub fn new<K, P>(keys: K, patterns: P) -> Result<Self>
    where
        K: IntoIterator,
        K::Item: Into<String>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let source = p.as_ref();
                Regex::new(source)
                    .map_err(|e| LoggerError::invalid_pattern(source, e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_parts(keys, patterns))
    }

    /// Build a policy from already compiled patterns
    pub fn from_parts<K>(keys: K, patterns: Vec<Regex>) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            patterns,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.patterns.is_empty()
    }

    /// Check if a key should be hidden
    pub fn matches(&self, key: &str) -> bool {
        self.keys.contains(key) || self.patterns.iter().any(|r| r.is_match(key))
    }
}

/// Type tag of a value as reported in the placeholder.
///
/// Mappings, sequences and null all report `object`, so consumers cannot tell
/// them apart from the mask alone.
pub fn type_tag(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
    }
}

/// Placeholder that replaces a hidden value
pub fn placeholder(value: &Value) -> String {
    format!("{MASK}{}{MASK}", type_tag(value))
}

/// Return a copy of `tree` with every matching key masked, at any depth.
pub fn redact(tree: &Value, policy: &RedactionPolicy) -> Value {
    match tree {
        Value::Object(map) => Value::Object(redact_map(map, policy)),
        Value::Array(items) => Value::Array(items.iter().map(|v| redact(v, policy)).collect()),
        scalar => scalar.clone(),
    }
}

/// [`redact`] for a top-level mapping
pub fn redact_map(map: &Map<String, Value>, policy: &RedactionPolicy) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| {
            let value = if policy.matches(key) {
                Value::String(placeholder(value))
            } else {
                redact(value, policy)
            };
            (key.clone(), value)
        })
        .collect()
}
