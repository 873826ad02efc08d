//! Log record handed to the global sink

use super::fields::Fields;
use super::log_level::LogLevel;
use serde::Serialize;
use std::borrow::Cow;
use std::ffi::CStr;
use std::thread::{self, ThreadId};

/// Source location of a log call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location<'a> {
    pub function: Cow<'a, str>,
    pub file: Cow<'a, str>,
    pub line: u32,
}

impl<'a> Location<'a> {
    /// Location from explicit-length spans
    pub fn new(function: &'a str, file: &'a str, line: u32) -> Self {
        Self {
            function: Cow::Borrowed(function),
            file: Cow::Borrowed(file),
            line,
        }
    }

    /// Location from NUL-terminated strings; lengths come from the terminator.
    ///
    /// Invalid UTF-8 is replaced, valid input is borrowed as-is.
    pub fn from_c(function: &'a CStr, file: &'a CStr, line: u32) -> Self {
        Self {
            function: function.to_string_lossy(),
            file: file.to_string_lossy(),
            line,
        }
    }

    /// Trailing path component of `file`, split on either separator
    pub fn file_name(&self) -> &str {
        match self.file.rfind(['/', '\\']) {
            Some(pos) => &self.file[pos + 1..],
            None => &self.file,
        }
    }

    /// Borrowing copy, so a record can point at the caller's location
    pub fn reborrow(&self) -> Location<'_> {
        Location {
            function: Cow::Borrowed(&*self.function),
            file: Cow::Borrowed(&*self.file),
            line: self.line,
        }
    }

    pub fn into_owned(self) -> Location<'static> {
        Location {
            function: Cow::Owned(self.function.into_owned()),
            file: Cow::Owned(self.file.into_owned()),
            line: self.line,
        }
    }
}

/// A composed record. Built per call and never retained by the facade.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord<'a> {
    pub level: LogLevel,
    #[serde(flatten)]
    pub location: Location<'a>,
    pub message: Cow<'a, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Cow<'a, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Cow<'a, Fields>>,
    #[serde(skip)]
    pub origin_thread: ThreadId,
}

impl<'a> LogRecord<'a> {
    pub fn new(level: LogLevel, location: Location<'a>, message: Cow<'a, str>) -> Self {
        Self {
            level,
            location,
            message,
            category: None,
            fields: None,
            origin_thread: thread::current().id(),
        }
    }

    pub fn with_category(mut self, category: Option<Cow<'a, str>>) -> Self {
        self.category = category;
        self
    }

    /// Attach fields by reference; the sink sees the caller's value itself.
    pub fn with_fields(mut self, fields: Option<&'a Fields>) -> Self {
        self.fields = fields.map(Cow::Borrowed);
        self
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn fields(&self) -> Option<&Fields> {
        self.fields.as_deref()
    }

    /// Detach from caller-owned data, for sinks that keep records around
    pub fn into_owned(self) -> LogRecord<'static> {
        LogRecord {
            level: self.level,
            location: self.location.into_owned(),
            message: Cow::Owned(self.message.into_owned()),
            category: self.category.map(|c| Cow::Owned(c.into_owned())),
            fields: self.fields.map(|f| Cow::Owned(f.into_owned())),
            origin_thread: self.origin_thread,
        }
    }
}
