//! Single funnel from composed messages to the global sink

use super::{
    error::Result,
    fields::Fields,
    log_level::LogLevel,
    log_record::{Location, LogRecord},
    metrics::dispatch_metrics,
    sink::GlobalSink,
};
use crate::sinks::ConsoleSink;
use parking_lot::RwLock;
use std::any::Any;
use std::borrow::Cow;
use std::ffi::CStr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

static GLOBAL_SINK: RwLock<Option<Arc<dyn GlobalSink>>> = parking_lot::const_rwlock(None);
static DEFAULT_SINK: OnceLock<Arc<dyn GlobalSink>> = OnceLock::new();

/// Install the process-wide sink, returning the previous one
pub fn set_global_sink(sink: Arc<dyn GlobalSink>) -> Option<Arc<dyn GlobalSink>> {
    GLOBAL_SINK.write().replace(sink)
}

/// Remove the installed sink; later records go to the default stderr sink
pub fn take_global_sink() -> Option<Arc<dyn GlobalSink>> {
    GLOBAL_SINK.write().take()
}

/// The installed sink, or a stderr sink at debug level when none is
pub fn global_sink() -> Arc<dyn GlobalSink> {
    if let Some(sink) = GLOBAL_SINK.read().as_ref() {
        return Arc::clone(sink);
    }

    Arc::clone(DEFAULT_SINK.get_or_init(|| {
        let sink: Arc<dyn GlobalSink> =
            Arc::new(ConsoleSink::new().with_min_level(LogLevel::Debug));
        sink
    }))
}

pub fn flush_global_sink() -> Result<()> {
    global_sink().flush()
}

/// Hands one record to a sink per call.
///
/// No buffering, retry, or filtering happens here. A sink error or panic is
/// reported on stderr and counted; it never reaches the log call site.
#[derive(Clone, Default)]
pub struct SinkDispatcher {
    sink: Option<Arc<dyn GlobalSink>>,
}

impl SinkDispatcher {
    /// Dispatcher that resolves the process-wide sink on every record
    pub fn global() -> Self {
        Self { sink: None }
    }

    /// Dispatcher bound to one sink regardless of what is installed globally
    pub fn to_sink(sink: Arc<dyn GlobalSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Plain form: message and category lengths come from their terminators
    pub fn dispatch(
        &self,
        level: LogLevel,
        location: &Location<'_>,
        message: &CStr,
        category: Option<&CStr>,
        fields: Option<&Fields>,
    ) {
        let record = LogRecord::new(level, location.reborrow(), message.to_string_lossy())
            .with_category(category.map(CStr::to_string_lossy))
            .with_fields(fields);
        self.deliver(&record);
    }

    /// Length-qualified form, for messages whose length is already known
    pub fn dispatch_with_size(
        &self,
        level: LogLevel,
        location: &Location<'_>,
        message: &str,
        category: Option<&str>,
        fields: Option<&Fields>,
    ) {
        let record = LogRecord::new(level, location.reborrow(), Cow::Borrowed(message))
            .with_category(category.map(Cow::Borrowed))
            .with_fields(fields);
        self.deliver(&record);
    }

    fn target(&self) -> Arc<dyn GlobalSink> {
        match &self.sink {
            Some(sink) => Arc::clone(sink),
            None => global_sink(),
        }
    }

    fn deliver(&self, record: &LogRecord<'_>) {
        let sink = self.target();
        let metrics = dispatch_metrics();
        metrics.record_dispatched();

        match panic::catch_unwind(AssertUnwindSafe(|| sink.submit(record))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[ENV LOG ERROR] Sink '{}' failed: {}", sink.name(), e);
                metrics.record_sink_failure();
            }
            Err(panic_info) => {
                eprintln!(
                    "[ENV LOG CRITICAL] Sink '{}' panicked: {}. The record was dropped.",
                    sink.name(),
                    panic_message(panic_info.as_ref())
                );
                metrics.record_sink_failure();
            }
        }
    }
}

/// Payload text of a caught sink panic
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
