//! Network appender for remote logging
//!
//! Forwards records to a collector over TCP as JSON lines, each tagged with a
//! fixed `tag` field.

use crate::core::{Appender, LogRecord, LoggerError, OutputFormat, Result, TimestampFormat};
use serde_json::Value;
use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Network appender that sends logs to a remote TCP collector
///
/// # Example
///
/// ```no_run
/// use context_logger::appenders::NetworkAppender;
/// use context_logger::prelude::*;
/// use std::sync::Arc;
///
/// let appender = NetworkAppender::connect("127.0.0.1", 24224)
///     .expect("Failed to connect to log server")
///     .with_tag("billing");
///
/// let dispatcher = Dispatcher::builder().appender(appender).build();
/// let logger = ContextLogger::new(
///     Arc::new(dispatcher),
///     Arc::new(RedactionPolicy::empty()),
///     LogContext::new(),
/// );
/// logger.info("This log will be sent to 127.0.0.1:24224")?;
/// # Ok::<(), context_logger::LoggerError>(())
/// ```
pub struct NetworkAppender {
    stream: Option<TcpStream>,
    address: String,
    tag: Option<String>,
}

impl NetworkAppender {
    /// Create an appender that connects on the first record
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            stream: None,
            address: format!("{}:{}", host, port),
            tag: None,
        }
    }

    /// Create an appender and connect immediately
    ///
    /// # Errors
    ///
    /// Returns error if connection fails
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let mut appender = Self::new(host, port);
        appender.reconnect()?;
        Ok(appender)
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn reconnect(&mut self) -> Result<()> {
        let stream = TcpStream::connect(&self.address).map_err(|e| {
            LoggerError::io_operation("connecting to log collector", self.address.clone(), e)
        })?;
        stream.set_write_timeout(Some(IO_TIMEOUT))?;
        stream.set_read_timeout(Some(IO_TIMEOUT))?;
        // Enable TCP_NODELAY for low-latency logging
        stream.set_nodelay(true)?;

        self.stream = Some(stream);
        Ok(())
    }

    fn encode(&self, record: &LogRecord) -> Result<String> {
        let mut object = OutputFormat::Json.json_object(record, Some(&TimestampFormat::Iso8601));
        if let Some(ref tag) = self.tag {
            object.insert("tag".to_string(), Value::String(tag.clone()));
        }
        let mut line = serde_json::to_string(&Value::Object(object))?;
        line.push('\n');
        Ok(line)
    }
}

impl Appender for NetworkAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.encode(record)?;

        if self.stream.is_none() {
            self.reconnect()?;
        }
        let Some(ref mut stream) = self.stream else {
            return Err(LoggerError::writer("Network stream not connected"));
        };

        // A failed write drops the connection; the record is not resent and
        // the next record opens a fresh connection.
        if let Err(e) = stream.write_all(line.as_bytes()) {
            self.stream = None;
            return Err(LoggerError::writer(format!(
                "Failed to send log to {}: {}",
                self.address, e
            )));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut stream) = self.stream {
            stream.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "network"
    }
}

impl Drop for NetworkAppender {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use serde_json::json;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;

    #[test]
    fn test_connect_fails_without_server() {
        // Bind then drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        assert!(NetworkAppender::connect("127.0.0.1", port).is_err());
    }

    #[test]
    fn test_lazy_appender_reports_failure_and_stays_disconnected() {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let mut appender = NetworkAppender::new("127.0.0.1", port);
        assert!(!appender.is_connected());

        let result = appender.append(&LogRecord::new(LogLevel::Info, "test"));
        assert!(result.is_err());
        assert!(!appender.is_connected());
    }

    #[test]
    fn test_sends_tagged_json_line() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut appender = NetworkAppender::connect("127.0.0.1", port)
            .unwrap()
            .with_tag("svc");
        let (socket, _) = listener.accept().unwrap();

        let mut data = serde_json::Map::new();
        data.insert("user".to_string(), json!("ann"));
        appender
            .append(&LogRecord::new(LogLevel::Warn, "remote").with_data(data))
            .unwrap();
        appender.flush().unwrap();

        let mut line = String::new();
        BufReader::new(socket).read_line(&mut line).unwrap();
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["tag"], "svc");
        assert_eq!(parsed["level"], "warn");
        assert_eq!(parsed["message"], "remote");
        assert_eq!(parsed["user"], "ann");
    }
}
