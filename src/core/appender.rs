//! Appender trait for log output destinations

use super::{error::Result, log_record::LogRecord};

/// A sink accepting finished records.
///
/// Errors returned here never reach the code that issued the log call; the
/// dispatcher reports them to its diagnostic callback instead.
pub trait Appender: Send + Sync {
    fn append(&mut self, record: &LogRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
