//! Error types for the environment logging facade
//!
//! Only the sink and configuration layers return errors. The logging entry
//! points never do: a closed handle degrades to a diagnostic write and a
//! thread-ownership violation is fatal.

pub type Result<T> = std::result::Result<T, EnvLogError>;

#[derive(Debug, thiserror::Error)]
pub enum EnvLogError {
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

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A sink rejected a record
    #[error("Sink '{sink}' failed: {message}")]
    SinkError { sink: String, message: String },

    /// The sink no longer accepts records
    #[error("Sink '{sink}' already stopped")]
    SinkStopped { sink: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File lock error
    #[error("Failed to acquire file lock on '{path}'")]
    FileLockError { path: String },

    /// Channel send error
    #[error("Failed to hand log record to sink worker")]
    ChannelSendError,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl EnvLogError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        EnvLogError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a sink failure error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        EnvLogError::SinkError {
            sink: sink.into(),
            message: message.into(),
        }
    }

    pub fn sink_stopped(sink: impl Into<String>) -> Self {
        EnvLogError::SinkStopped { sink: sink.into() }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        EnvLogError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>) -> Self {
        EnvLogError::FileLockError { path: path.into() }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        EnvLogError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = EnvLogError::sink("console", "stderr closed");
        assert!(matches!(err, EnvLogError::SinkError { .. }));

        let err = EnvLogError::config("LogConfig", "queue capacity must be positive");
        assert!(matches!(err, EnvLogError::InvalidConfiguration { .. }));

        let err = EnvLogError::sink_stopped("queued");
        assert!(matches!(err, EnvLogError::SinkStopped { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = EnvLogError::sink("json", "disk full");
        assert_eq!(err.to_string(), "Sink 'json' failed: disk full");

        let err = EnvLogError::file_lock("/var/log/app.log");
        assert_eq!(
            err.to_string(),
            "Failed to acquire file lock on '/var/log/app.log'"
        );

        let err = EnvLogError::sink_stopped("queued");
        assert_eq!(err.to_string(), "Sink 'queued' already stopped");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = EnvLogError::io_operation("reopening log file", "cannot open file", io_err);

        assert!(matches!(err, EnvLogError::IoOperation { .. }));
        assert!(err.to_string().contains("reopening log file"));
        assert!(err.to_string().contains("cannot open file"));
    }
}
