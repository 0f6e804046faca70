//! Output format configuration for log records
//!
//! Provides different output formats for log records:
//! - Text: Human-readable format (default)
//! - Json: Machine-readable JSON format
//! - Logfmt: Key-value format compatible with log aggregation tools

use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;
use serde_json::{Map, Value};

/// Output format for log records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO ] Request processed {"user":"ann"}`
    #[default]
    Text,

    /// JSON format for machine processing, data fields flattened
    ///
    /// Example: `{"timestamp":"2025-01-08T10:30:45.123Z","level":"info","message":"Request processed","user":"ann"}`
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `timestamp=2025-01-08T10:30:45.123Z level=INFO message="Request processed" user="ann"`
    Logfmt,
}

impl OutputFormat {
    /// Format a log record according to this output format.
    ///
    /// `timestamp_format` of `None` leaves the timestamp out.
    pub fn format(&self, record: &LogRecord, timestamp_format: Option<&TimestampFormat>) -> String {
        match self {
            OutputFormat::Text => self.format_text(record, timestamp_format),
            OutputFormat::Json => {
                Value::Object(self.json_object(record, timestamp_format)).to_string()
            }
            OutputFormat::Logfmt => self.format_logfmt(record, timestamp_format),
        }
    }

    /// Format as human-readable text
    fn format_text(&self, record: &LogRecord, timestamp_format: Option<&TimestampFormat>) -> String {
        let mut line = String::new();
        if let Some(format) = timestamp_format {
            line.push_str(&format!("[{}] ", format.format(&record.timestamp)));
        }
        line.push_str(&format!("[{:5}] {}", record.level.to_str(), record.escaped_message()));

        if !record.data.is_empty() {
            line.push(' ');
            line.push_str(&record.data_json());
        }
        line
    }

    /// Record as a flat JSON object; data fields never override the
    /// `timestamp`, `level` and `message` keys.
    pub fn json_object(
        &self,
        record: &LogRecord,
        timestamp_format: Option<&TimestampFormat>,
    ) -> Map<String, Value> {
        let mut json_obj = Map::new();

        if let Some(format) = timestamp_format {
            json_obj.insert("timestamp".to_string(), format.format_json(&record.timestamp));
        }
        json_obj.insert("level".to_string(), Value::String(record.level.as_lower().to_string()));
        json_obj.insert("message".to_string(), Value::String(record.message.clone()));

        for (key, value) in &record.data {
            if !json_obj.contains_key(key) {
                json_obj.insert(key.clone(), value.clone());
            }
        }

        json_obj
    }

    /// Format as logfmt (key=value pairs)
    fn format_logfmt(&self, record: &LogRecord, timestamp_format: Option<&TimestampFormat>) -> String {
        let mut parts = Vec::new();

        if let Some(format) = timestamp_format {
            parts.push(format!(
                "timestamp={}",
                self.escape_logfmt_value(&format.format(&record.timestamp))
            ));
        }
        parts.push(format!("level={}", record.level.to_str()));

        // Message is always quoted for safety
        parts.push(format!("message={}", self.quote_logfmt_value(&record.escaped_message())));

        for (key, value) in &record.data {
            let formatted_value = match value {
                Value::String(s) => self.quote_logfmt_value(s),
                Value::Object(_) | Value::Array(_) => self.quote_logfmt_value(&value.to_string()),
                other => other.to_string(),
            };
            parts.push(format!("{}={}", self.escape_logfmt_key(key), formatted_value));
        }

        parts.join(" ")
    }

    /// Escape a logfmt key (remove spaces and special chars)
    fn escape_logfmt_key(&self, key: &str) -> String {
        key.chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
            .collect()
    }

    /// Escape a logfmt value (quote if contains spaces)
    fn escape_logfmt_value(&self, value: &str) -> String {
        if value.contains(' ') || value.contains('"') || value.contains('=') {
            self.quote_logfmt_value(value)
        } else {
            value.to_string()
        }
    }

    /// Quote a logfmt value
    fn quote_logfmt_value(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
