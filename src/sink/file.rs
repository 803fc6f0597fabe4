//! File-backed log sink.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{LogSink, SinkError};

/// Appends each line to a plain-text file, one write per message.
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Open the log file in append mode, creating it if needed.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

#[async_trait]
impl LogSink for FileSink {
    async fn append(&self, line: &str) -> Result<(), SinkError> {
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_lines_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("messages.log");

        let sink = FileSink::open(&path).await.expect("open sink");
        sink.append("first\n").await.expect("append");
        sink.append("second\n").await.expect("append");

        let contents = tokio::fs::read_to_string(&path).await.expect("read log");
        assert_eq!(contents, "first\nsecond\n");
    }

    #[tokio::test]
    async fn reopening_appends_instead_of_truncating() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("messages.log");

        let sink = FileSink::open(&path).await.expect("open sink");
        sink.append("kept\n").await.expect("append");
        drop(sink);

        let sink = FileSink::open(&path).await.expect("reopen sink");
        sink.append("added\n").await.expect("append");

        let contents = tokio::fs::read_to_string(&path).await.expect("read log");
        assert_eq!(contents, "kept\nadded\n");
    }
}
