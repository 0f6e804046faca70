//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Log data could not be converted into a JSON tree
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Call-site data was not a mapping
    #[error("Log data must be a map, got {kind}")]
    InvalidData { kind: &'static str },

    /// Redaction pattern failed to compile
    #[error("Invalid redaction pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Transport type not present in the registry
    #[error("Unknown transport type '{0}'")]
    UnknownTransport(String),

    /// Instrumented call forwarded to a method the target does not have
    #[error("Method '{method}' not found on '{target}'")]
    MethodNotFound { target: String, method: String },

    /// Event argument encoder failure
    #[error("Failed to encode arguments of event '{event}': {message}")]
    Encoding { event: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid data error for a non-map payload
    pub fn invalid_data(kind: &'static str) -> Self {
        LoggerError::InvalidData { kind }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn unknown_transport(kind: impl Into<String>) -> Self {
        LoggerError::UnknownTransport(kind.into())
    }

    /// Create a method-not-found error
    pub fn method_not_found(target: impl Into<String>, method: impl Into<String>) -> Self {
        LoggerError::MethodNotFound {
            target: target.into(),
            method: method.into(),
        }
    }

    /// Create an event argument encoding error
    pub fn encoding(event: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Encoding {
            event: event.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
