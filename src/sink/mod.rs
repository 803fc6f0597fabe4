//! Durable log sink abstraction.
//!
//! The engine only requires "append this line somewhere durable"; the
//! backends decide what durable means. A failed append is reported by the
//! caller and never terminates the process.

use async_trait::async_trait;
use thiserror::Error;

mod file;
mod memory;
mod noop;

pub use file::FileSink;
pub use memory::MemorySink;
pub use noop::NoOpSink;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only sink for formatted message lines.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Append one line. The line carries its own trailing newline.
    async fn append(&self, line: &str) -> Result<(), SinkError>;
}
