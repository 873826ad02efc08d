//! In-memory sink that keeps every record

use crate::core::{GlobalSink, LogRecord, Result};
use parking_lot::Mutex;

/// Captures owned copies of submitted records in submission order
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord<'static>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything captured so far
    pub fn records(&self) -> Vec<LogRecord<'static>> {
        self.records.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| r.message.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl GlobalSink for MemorySink {
    fn submit(&self, record: &LogRecord<'_>) -> Result<()> {
        let owned = record.clone().into_owned();
        self.records.lock().push(owned);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
