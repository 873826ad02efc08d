//! Bundled global sink implementations

pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod json;
pub mod memory;
pub mod queued;

pub use console::ConsoleSink;
#[cfg(feature = "file")]
pub use file::FileSink;
pub use json::JsonSink;
pub use memory::MemorySink;
pub use queued::{QueuedSink, DEFAULT_SHUTDOWN_TIMEOUT};

pub use crate::core::GlobalSink;
