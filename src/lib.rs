//! # Runtime Environment Log
//!
//! Logging facade for per-instance runtime environment handles.
//!
//! Every component of a runtime (application, extensions, add-ons) holds its
//! own handle. Logging through a handle prefixes the message with the
//! instance name and hands the record to one process-wide sink, while
//! enforcing two rules:
//!
//! - **Thread ownership**: only the handle's owning thread may log through
//!   it. Violations are fatal.
//! - **Closed handles**: once a handle starts closing, log calls write a
//!   short diagnostic to stderr and touch nothing else.
//!
//! ```
//! use runtime_env_log::prelude::*;
//! use runtime_env_log::env_info;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let env = EnvHandle::new("my_extension");
//! let log = EnvLog::with_dispatcher(&env, SinkDispatcher::to_sink(sink.clone()));
//!
//! env_info!(log, "processed {} items", 5);
//! assert_eq!(sink.messages(), vec!["[my_extension] processed 5 items"]);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        AddonBootstrapLog, EnvHandle, EnvLog, EnvLogError, FieldValue, Fields, FormatterConfig,
        GlobalSink, Location, LogConfig, LogLevel, LogOutput, LogRecord, Result, RuntimeEnv,
        SinkDispatcher, ThreadCheck, TimestampFormat,
    };
    pub use crate::sinks::{ConsoleSink, JsonSink, MemorySink, QueuedSink};
}

pub use crate::core::{
    dispatch_metrics, flush_global_sink, global_sink, set_global_sink, take_global_sink,
    AddonBootstrapLog, ClosedStateGuard, DispatchMetrics, EnvHandle, EnvLog, EnvLogError,
    FieldValue, Fields, FormatterConfig, GlobalSink, GuardOutcome, Location, LogConfig, LogLevel,
    LogOutput, LogRecord, MessageComposer, Result, RuntimeEnv, SinkDispatcher, ThreadCheck,
    ThreadIntegrityGate, TimestampFormat, CLOSED_DIAGNOSTIC_TAG,
};
pub use sinks::{ConsoleSink, JsonSink, MemorySink, QueuedSink, DEFAULT_SHUTDOWN_TIMEOUT};
#[cfg(feature = "file")]
pub use sinks::FileSink;
