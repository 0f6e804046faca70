//! Console appender implementation

use crate::core::{Appender, LogLevel, LogRecord, OutputFormat, Result, TimestampFormat};
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
    timestamp_format: Option<TimestampFormat>,
    output_format: OutputFormat,
    stderr_levels: Vec<LogLevel>,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            timestamp_format: Some(TimestampFormat::default()),
            output_format: OutputFormat::default(),
            stderr_levels: vec![LogLevel::Error],
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Set the output format for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use context_logger::appenders::ConsoleAppender;
    /// use context_logger::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the timestamp format, or `None` to print no timestamp
    #[must_use]
    pub fn with_timestamp_format(mut self, format: Option<TimestampFormat>) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Levels written to stderr instead of stdout
    #[must_use]
    pub fn with_stderr_levels(mut self, levels: Vec<LogLevel>) -> Self {
        self.stderr_levels = levels;
        self
    }

    /// Format as text with optional colors
    fn format_text(&self, record: &LogRecord) -> String {
        let level_str = if self.use_colors {
            format!("{:5}", record.level.to_str())
                .color(record.level.color_code())
                .to_string()
        } else {
            format!("{:5}", record.level.to_str())
        };

        let mut line = String::new();
        if let Some(ref format) = self.timestamp_format {
            line.push_str(&format!("[{}] ", format.format(&record.timestamp)));
        }
        line.push_str(&format!("[{}] {}", level_str, record.escaped_message()));

        if !record.data.is_empty() {
            line.push(' ');
            line.push_str(&record.data_json());
        }
        line
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        let output = match self.output_format {
            OutputFormat::Text => self.format_text(record),
            OutputFormat::Json | OutputFormat::Logfmt => self
                .output_format
                .format(record, self.timestamp_format.as_ref()),
        };

        if self.stderr_levels.contains(&record.level) {
            eprintln!("{}", output);
        } else {
            println!("{}", output);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
