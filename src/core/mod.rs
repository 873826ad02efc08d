//! Core facade types: handle capabilities, guards, composition and dispatch

pub mod closed_guard;
pub mod composer;
pub mod config;
pub mod dispatcher;
pub mod env_log;
pub mod error;
pub mod fields;
pub mod format;
pub mod handle;
pub mod log_level;
pub mod log_record;
pub mod metrics;
pub mod sink;
pub mod thread_gate;

pub use closed_guard::{ClosedStateGuard, GuardOutcome, CLOSED_DIAGNOSTIC_TAG};
pub use composer::MessageComposer;
pub use config::{LogConfig, LogOutput};
pub use dispatcher::{
    flush_global_sink, global_sink, set_global_sink, take_global_sink, SinkDispatcher,
};
pub use env_log::{AddonBootstrapLog, EnvLog};
pub use error::{EnvLogError, Result};
pub use fields::{FieldValue, Fields};
pub use format::{FormatterConfig, TimestampFormat};
pub use handle::{EnvHandle, RuntimeEnv, ThreadCheck};
pub use log_level::LogLevel;
pub use log_record::{Location, LogRecord};
pub use metrics::{dispatch_metrics, DispatchMetrics};
pub use sink::GlobalSink;
pub use thread_gate::ThreadIntegrityGate;
