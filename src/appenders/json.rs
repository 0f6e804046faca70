//! JSON appender for structured logging

use crate::core::{Appender, LogRecord, OutputFormat, Result, TimestampFormat};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON file appender for structured logging
///
/// Writes each record as a single-line JSON object (JSONL format) with the
/// data fields flattened next to `timestamp`, `level` and `message`.
pub struct JsonAppender {
    writer: BufWriter<File>,
    pretty: bool,
}

impl JsonAppender {
    /// Create a new JSON appender
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            pretty: false,
        })
    }

    /// Create a new JSON appender with pretty printing
    pub fn new_pretty<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut appender = Self::new(path)?;
        appender.pretty = true;
        Ok(appender)
    }
}

impl Appender for JsonAppender {
    fn name(&self) -> &str {
        "json"
    }

    fn append(&mut self, record: &LogRecord) -> Result<()> {
        let object = Value::Object(
            OutputFormat::Json.json_object(record, Some(&TimestampFormat::Iso8601)),
        );

        let json = if self.pretty {
            serde_json::to_string_pretty(&object)?
        } else {
            serde_json::to_string(&object)?
        };

        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
