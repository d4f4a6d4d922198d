use std::sync::{Mutex, MutexGuard};

use log::Level;

use super::logger::{LogRecord, LogSink};

/// In-memory sink for asserting on what was logged.
#[derive(Debug, Default)]
pub struct CaptureSink {
    records: Mutex<Vec<LogRecord>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.lock().iter().filter(|r| r.level == level).count()
    }

    /// Records carrying `key=value` in their context.
    pub fn tagged(&self, key: &str, value: &str) -> Vec<LogRecord> {
        self.lock()
            .iter()
            .filter(|r| r.context_value(key) == Some(value))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LogSink for CaptureSink {
    fn write(&self, record: LogRecord) {
        self.lock().push(record);
    }
}
