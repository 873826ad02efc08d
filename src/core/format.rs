//! Text layout and timestamp formats used by the bundled sinks
//!
//! The facade itself never formats output; timestamps and layout belong to
//! the sink, which stamps each record when it receives it.

use super::log_record::LogRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::process;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use runtime_env_log::TimestampFormat;
/// use chrono::Utc;
///
/// let timestamp = TimestampFormat::Iso8601.format(&Utc::now());
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// `1736332245123`
    UnixMillis,

    /// Any strftime-compatible format string
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

/// Layout options for text sinks
///
/// # Examples
///
/// ```
/// use runtime_env_log::{FormatterConfig, TimestampFormat};
///
/// let config = FormatterConfig::new()
///     .with_timestamp_format(TimestampFormat::Iso8601Micros)
///     .with_include_location(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub timestamp_format: TimestampFormat,
    /// Process and thread identifiers
    pub include_ids: bool,
    /// `function@file:line`
    pub include_location: bool,
    /// Category and structured fields
    pub include_fields: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::default(),
            include_ids: true,
            include_location: true,
            include_fields: true,
        }
    }
}

impl FormatterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_include_ids(mut self, include: bool) -> Self {
        self.include_ids = include;
        self
    }

    #[must_use]
    pub fn with_include_location(mut self, include: bool) -> Self {
        self.include_location = include;
        self
    }

    #[must_use]
    pub fn with_include_fields(mut self, include: bool) -> Self {
        self.include_fields = include;
        self
    }

    /// One line of plain text, without the trailing newline:
    ///
    /// `<time> <pid>(<thread>) <L> <function>@<file>:<line> <message> [<category>] <k=v ...>`
    ///
    /// Line breaks and tabs in every caller-supplied part (function, file,
    /// message, category, fields) are escaped so one record always occupies
    /// one line.
    pub fn format_text(
        &self,
        record: &LogRecord<'_>,
        now: &DateTime<Utc>,
        level_tag: &str,
    ) -> String {
        let mut line = String::with_capacity(96 + record.message.len());
        line.push_str(&self.timestamp_format.format(now));

        if self.include_ids {
            let _ = write!(line, " {}({:?})", process::id(), record.origin_thread);
        }

        line.push(' ');
        line.push_str(level_tag);

        if self.include_location {
            line.push(' ');
            push_escaped(&mut line, &record.location.function);
            line.push('@');
            push_escaped(&mut line, record.location.file_name());
            let _ = write!(line, ":{}", record.location.line);
        }

        line.push(' ');
        push_escaped(&mut line, &record.message);

        if self.include_fields {
            if let Some(category) = record.category() {
                line.push_str(" [");
                push_escaped(&mut line, category);
                line.push(']');
            }
            if let Some(fields) = record.fields().filter(|f| !f.is_empty()) {
                line.push(' ');
                push_escaped(&mut line, &fields.format_fields());
            }
        }

        line
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fields::Fields;
    use crate::core::log_level::LogLevel;
    use crate::core::log_record::Location;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_timestamp_formats() {
        let now = fixed_datetime();
        assert_eq!(TimestampFormat::Iso8601.format(&now), "2025-01-08T10:30:45.123Z");
        assert_eq!(TimestampFormat::Iso8601Micros.format(&now), "2025-01-08T10:30:45.123456Z");
        assert!(TimestampFormat::Rfc3339.format(&now).starts_with("2025-01-08T10:30:45"));
        assert_eq!(TimestampFormat::UnixMillis.format(&now), "1736332245123");
        assert_eq!(
            TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string()).format(&now),
            "2025/01/08 10:30"
        );
    }

    #[test]
    fn test_format_text_layout() {
        let fields = Fields::new().with_field("cmd", "start");
        let record = LogRecord::new(
            LogLevel::Info,
            Location::new("on_cmd", "src/ext/main.rs", 21),
            "[ext] got\ncmd".into(),
        )
        .with_category(Some("rpc".into()))
        .with_fields(Some(&fields));

        let config = FormatterConfig::new().with_include_ids(false);
        let line = config.format_text(&record, &fixed_datetime(), "I");

        assert_eq!(
            line,
            "2025-01-08T10:30:45.123Z I on_cmd@main.rs:21 [ext] got\\ncmd [rpc] cmd=start"
        );
    }

    #[test]
    fn test_format_text_minimal() {
        let record = LogRecord::new(LogLevel::Warn, Location::new("f", "a.rs", 1), "m".into());
        let config = FormatterConfig::new()
            .with_timestamp_format(TimestampFormat::UnixMillis)
            .with_include_ids(false)
            .with_include_location(false);

        assert_eq!(config.format_text(&record, &fixed_datetime(), "W"), "1736332245123 W m");
    }

    #[test]
    fn test_category_and_location_cannot_forge_lines() {
        let record = LogRecord::new(
            LogLevel::Info,
            Location::new("on_cmd\nERROR fake", "src/bad\rname.rs", 4),
            "[app] ok".into(),
        )
        .with_category(Some("net\nERROR forged line".into()));

        let config = FormatterConfig::new().with_include_ids(false);
        let line = config.format_text(&record, &fixed_datetime(), "I");

        assert_eq!(line.lines().count(), 1);
        assert!(!line.contains('\r'));
        assert_eq!(
            line,
            "2025-01-08T10:30:45.123Z I on_cmd\\nERROR fake@bad\\rname.rs:4 [app] ok \
             [net\\nERROR forged line]"
        );
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: FormatterConfig =
            serde_json::from_str(r#"{"include_ids": false}"#).expect("deserialize");
        assert!(!config.include_ids);
        assert!(config.include_location);
        assert_eq!(config.timestamp_format, TimestampFormat::Iso8601);
    }
}
