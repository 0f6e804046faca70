//! Log record handed to the sinks

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// A prepared log line: message, severity and the redacted, depth-bounded data.
///
/// Records are created per call and live only until every sink has seen them.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub data: Map<String, Value>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            data: Map::new(),
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Message for line-oriented output, safe against log injection
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so a message cannot forge additional log lines.
    pub fn escaped_message(&self) -> String {
        self.message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// Data rendered as a compact JSON object, empty when there are no fields
    pub fn data_json(&self) -> String {
        if self.data.is_empty() {
            return String::new();
        }
        // A Map of Values always serializes.
        serde_json::to_string(&self.data).unwrap_or_default()
    }
}
