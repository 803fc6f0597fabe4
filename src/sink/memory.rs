//! In-memory sink that records every appended line, for test inspection.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{LogSink, SinkError};

#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl LogSink for MemorySink {
    async fn append(&self, line: &str) -> Result<(), SinkError> {
        self.lines
            .lock()
            .expect("sink mutex poisoned")
            .push(line.to_string());
        Ok(())
    }
}
