//! JSON lines sink for structured output

use crate::core::{GlobalSink, LogLevel, LogRecord, Result, TimestampFormat};
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct JsonLine<'r, 'a> {
    timestamp: String,
    pid: u32,
    thread: String,
    #[serde(flatten)]
    record: &'r LogRecord<'a>,
}

/// Writes each record as one JSON object per line (JSONL).
///
/// Category and fields are emitted as given by the caller.
pub struct JsonSink<W: Write + Send = BufWriter<File>> {
    writer: Mutex<W>,
    min_level: LogLevel,
    timestamp_format: TimestampFormat,
}

impl JsonSink<BufWriter<File>> {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write + Send> JsonSink<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            min_level: LogLevel::Trace,
            timestamp_format: TimestampFormat::Iso8601Micros,
        }
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> GlobalSink for JsonSink<W> {
    fn submit(&self, record: &LogRecord<'_>) -> Result<()> {
        if record.level < self.min_level {
            return Ok(());
        }

        let line = JsonLine {
            timestamp: self.timestamp_format.format(&Utc::now()),
            pid: std::process::id(),
            thread: format!("{:?}", record.origin_thread),
            record,
        };
        let mut json = serde_json::to_vec(&line)?;
        json.push(b'\n');

        self.writer.lock().write_all(&json)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fields, Location};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_json_line_contents() -> Result<()> {
        let sink = JsonSink::from_writer(Vec::new());
        let fields = Fields::new().with_field("user_id", 123).with_field("action", "login");
        let location = Location::new("on_cmd", "src/ext.rs", 8);
        let record = LogRecord::new(LogLevel::Info, location, "[ext] hi".into())
            .with_category(Some("auth".into()))
            .with_fields(Some(&fields));

        sink.submit(&record)?;

        let output = String::from_utf8(sink.into_inner()).expect("utf8");
        let parsed: serde_json::Value = serde_json::from_str(output.trim_end())?;
        assert_eq!(parsed["message"], "[ext] hi");
        assert_eq!(parsed["level"], "Info");
        assert_eq!(parsed["function"], "on_cmd");
        assert_eq!(parsed["line"], 8);
        assert_eq!(parsed["category"], "auth");
        assert_eq!(parsed["fields"]["user_id"], 123);
        assert!(parsed["timestamp"].is_string());
        Ok(())
    }

    #[test]
    fn test_json_sink_file_multiple_records() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("env.jsonl");
        let sink = JsonSink::new(&path)?;

        for i in 0..5 {
            let message = format!("iteration {}", i);
            let location = Location::new("f", "a.rs", i);
            sink.submit(&LogRecord::new(LogLevel::Debug, location, message.into()))?;
        }
        sink.flush()?;

        let content = fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line)?;
            assert!(parsed["message"].is_string());
            assert!(parsed.get("category").is_none());
        }
        Ok(())
    }
}
