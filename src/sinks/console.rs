//! Standard error sink

use crate::core::{EnvLogError, FormatterConfig, GlobalSink, LogLevel, LogRecord, Result};
use chrono::Utc;
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::{self, Write};

/// Writes one text line per record to standard error.
///
/// Records below `min_level` are skipped. Each line goes out in a single
/// `write_all` on the locked handle, so concurrent submitters never
/// interleave within a line.
pub struct ConsoleSink {
    min_level: LogLevel,
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
    formatter: FormatterConfig,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            use_colors: cfg!(feature = "console"),
            formatter: FormatterConfig::default(),
        }
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Colors only take effect with the `console` feature
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: FormatterConfig) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn level_tag(&self, level: LogLevel) -> String {
        #[cfg(feature = "console")]
        if self.use_colors {
            return level.as_char().to_string().color(level.color_code()).to_string();
        }

        level.as_char().to_string()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalSink for ConsoleSink {
    fn submit(&self, record: &LogRecord<'_>) -> Result<()> {
        if record.level < self.min_level {
            return Ok(());
        }

        let mut line = self
            .formatter
            .format_text(record, &Utc::now(), &self.level_tag(record.level));
        line.push('\n');

        io::stderr()
            .lock()
            .write_all(line.as_bytes())
            .map_err(|e| EnvLogError::io_operation("writing to stderr", "console sink", e))
    }

    fn flush(&self) -> Result<()> {
        io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
