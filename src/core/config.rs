//! Declarative sink configuration
//!
//! A `LogConfig` describes which bundled sink to build. Installing the result
//! as the process-wide sink stays with the host application.

use super::{
    error::{EnvLogError, Result},
    format::FormatterConfig,
    log_level::LogLevel,
    sink::GlobalSink,
};
use crate::sinks::{ConsoleSink, JsonSink, QueuedSink};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Where records go
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogOutput {
    #[default]
    Stderr,
    File { path: PathBuf },
    Json { path: PathBuf },
}

/// # Example
///
/// ```
/// use runtime_env_log::{LogConfig, LogLevel};
///
/// let config: LogConfig = serde_json::from_str(
///     r#"{"level": "Info", "output": {"type": "stderr"}, "queue_capacity": 256}"#,
/// ).unwrap();
/// assert_eq!(config.level, LogLevel::Info);
///
/// let sink = config.build_sink().unwrap();
/// assert_eq!(sink.name(), "queued");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub output: LogOutput,
    pub formatter: FormatterConfig,
    pub colors: bool,
    /// Route records through a worker thread with this channel capacity
    pub queue_capacity: Option<usize>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            output: LogOutput::Stderr,
            formatter: FormatterConfig::default(),
            colors: false,
            queue_capacity: None,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: FormatterConfig) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    pub fn build_sink(&self) -> Result<Arc<dyn GlobalSink>> {
        self.validate()?;

        let sink: Arc<dyn GlobalSink> = match &self.output {
            LogOutput::Stderr => Arc::new(
                ConsoleSink::new()
                    .with_min_level(self.level)
                    .with_colors(self.colors)
                    .with_formatter(self.formatter.clone()),
            ),
            LogOutput::File { path } => self.build_file_sink(path)?,
            LogOutput::Json { path } => Arc::new(
                JsonSink::new(path)?
                    .with_min_level(self.level)
                    .with_timestamp_format(self.formatter.timestamp_format.clone()),
            ),
        };

        match self.queue_capacity {
            Some(capacity) => Ok(Arc::new(QueuedSink::new(sink, capacity)?)),
            None => Ok(sink),
        }
    }

    #[cfg(feature = "file")]
    fn build_file_sink(&self, path: &std::path::Path) -> Result<Arc<dyn GlobalSink>> {
        Ok(Arc::new(
            crate::sinks::FileSink::new(path)?
                .with_min_level(self.level)
                .with_formatter(self.formatter.clone()),
        ))
    }

    #[cfg(not(feature = "file"))]
    fn build_file_sink(&self, _path: &std::path::Path) -> Result<Arc<dyn GlobalSink>> {
        Err(EnvLogError::config(
            "LogConfig",
            "file output requires the `file` feature",
        ))
    }

    /// Reject values that `build_sink` would only fail on later
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == Some(0) {
            return Err(EnvLogError::config("LogConfig", "queue_capacity must be at least 1"));
        }
        match &self.output {
            LogOutput::File { path } | LogOutput::Json { path } if path.as_os_str().is_empty() => {
                Err(EnvLogError::config("LogConfig", "output path must not be empty"))
            }
            _ => Ok(()),
        }
    }
}
