//! Sink trait for the process-wide log destination

use super::{error::Result, log_record::LogRecord};

/// Destination for composed records.
///
/// One sink receives submissions from every handle in the process, so
/// implementations synchronize internally; callers never lock around
/// `submit`.
pub trait GlobalSink: Send + Sync {
    fn submit(&self, record: &LogRecord<'_>) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
