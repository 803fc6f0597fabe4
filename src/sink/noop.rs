//! No-op sink used when durable logging is disabled.
//!
//! All appends succeed and store nothing.

use async_trait::async_trait;

use super::{LogSink, SinkError};

pub struct NoOpSink;

#[async_trait]
impl LogSink for NoOpSink {
    async fn append(&self, _line: &str) -> Result<(), SinkError> {
        Ok(())
    }
}
