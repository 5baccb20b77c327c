//! Implements ChatLogPort. Plain-text channel transcripts.
//! One file per channel and calendar day: `<logdir>/<channel>.log.<ddMMMyyyy>`.
//! Each append opens, writes one `[HH:mm] <text>\n` record, and closes the file.

use crate::domain::{DomainError, LogLine};
use crate::ports::ChatLogPort;
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Daily transcript files for one channel.
pub struct FileChatLog {
    base_dir: PathBuf,
    channel: String,
    /// Serializes appends so concurrent writers never interleave a record.
    write_lock: Mutex<()>,
}

impl FileChatLog {
    pub fn new(base_dir: impl AsRef<Path>, channel: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            channel: channel.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Transcript path for the day of `at`.
    pub fn log_path(&self, at: NaiveDateTime) -> PathBuf {
        self.base_dir
            .join(format!("{}.log.{}", self.channel, at.format("%d%b%Y")))
    }

    /// Append `line` stamped with `at`. `append` calls this with the local clock.
    pub async fn append_at(&self, line: &LogLine, at: NaiveDateTime) -> Result<(), DomainError> {
        let record = format!("[{}] {}\n", at.format("%H:%M"), line);
        let path = self.log_path(at);

        let _guard = self.write_lock.lock().await;
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| DomainError::ChatLog(format!("open {}: {}", path.display(), e)))?;
        f.write_all(record.as_bytes())
            .await
            .map_err(|e| DomainError::ChatLog(format!("write {}: {}", path.display(), e)))?;
        f.flush()
            .await
            .map_err(|e| DomainError::ChatLog(format!("flush {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), bytes = record.len(), "appended transcript line");
        Ok(())
    }
}

#[async_trait::async_trait]
impl ChatLogPort for FileChatLog {
    async fn append(&self, line: &LogLine) -> Result<(), DomainError> {
        self.append_at(line, Local::now().naive_local()).await
    }
}
