//! File sink with reopen support for external rotation

use crate::core::{EnvLogError, FormatterConfig, GlobalSink, LogLevel, LogRecord, Result};
use chrono::Utc;
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends text lines to a file.
///
/// Each record is written under an advisory exclusive lock so several
/// processes can share one file. [`reopen`](FileSink::reopen) closes and
/// reopens the path, for use after logrotate moved the file away.
pub struct FileSink {
    path: PathBuf,
    min_level: LogLevel,
    formatter: FormatterConfig,
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let writer = Mutex::new(BufWriter::new(Self::open(&path)?));

        Ok(Self {
            path,
            min_level: LogLevel::Trace,
            formatter: FormatterConfig::default(),
            writer,
        })
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: FormatterConfig) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush the current file and continue in a freshly opened one at the
    /// same path
    pub fn reopen(&self) -> Result<()> {
        let mut writer = self.writer.lock();
        writer.flush()?;
        *writer = BufWriter::new(Self::open(&self.path)?);
        Ok(())
    }

    fn open(path: &Path) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                EnvLogError::io_operation("opening log file", path.display().to_string(), e)
            })
    }
}

impl GlobalSink for FileSink {
    fn submit(&self, record: &LogRecord<'_>) -> Result<()> {
        if record.level < self.min_level {
            return Ok(());
        }

        let mut line = self
            .formatter
            .format_text(record, &Utc::now(), record.level.to_str());
        line.push('\n');

        let mut writer = self.writer.lock();
        FileExt::lock_exclusive(writer.get_ref())
            .map_err(|_| EnvLogError::file_lock(self.path.display().to_string()))?;
        // Flush while still holding the lock so no other process interleaves.
        let result = writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush());
        let _ = FileExt::unlock(writer.get_ref());
        result?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Location;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_sink_writes_lines() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("env.log");
        let sink = FileSink::new(&path)?;

        for i in 0..3 {
            let message = format!("[ext] line {}", i);
            let record =
                LogRecord::new(LogLevel::Info, Location::new("f", "a.rs", 1), message.into());
            sink.submit(&record)?;
        }

        let content = fs::read_to_string(&path)?;
        assert_eq!(content.lines().count(), 3);
        assert!(content.contains("INFO f@a.rs:1 [ext] line 2"));
        Ok(())
    }

    #[test]
    fn test_reopen_after_rotation() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("env.log");
        let rotated = dir.path().join("env.log.1");
        let sink = FileSink::new(&path)?;
        let location = Location::new("f", "a.rs", 1);

        sink.submit(&LogRecord::new(LogLevel::Info, location.clone(), "before".into()))?;
        fs::rename(&path, &rotated)?;
        sink.reopen()?;
        sink.submit(&LogRecord::new(LogLevel::Info, location, "after".into()))?;

        assert!(fs::read_to_string(&rotated)?.contains("before"));
        let current = fs::read_to_string(&path)?;
        assert!(current.contains("after"));
        assert!(!current.contains("before"));
        Ok(())
    }

    #[test]
    fn test_min_level_filters() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("env.log");
        let sink = FileSink::new(&path)?.with_min_level(LogLevel::Warn);

        sink.submit(&LogRecord::new(LogLevel::Info, Location::new("f", "a.rs", 1), "skip".into()))?;
        sink.submit(&LogRecord::new(
            LogLevel::Error,
            Location::new("f", "a.rs", 2),
            "keep".into(),
        ))?;

        let content = fs::read_to_string(&path)?;
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("keep"));
        Ok(())
    }
}
