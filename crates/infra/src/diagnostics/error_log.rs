//! Append-only diagnostic log of upstream API failures
//!
//! One line per failure: `status|message|endpoint`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tunewire_core::ErrorSink;
use tunewire_domain::Result;

use crate::errors::InfraError;

/// [`ErrorSink`] writing to a local file (`apierrors.log` by default).
#[derive(Debug)]
pub struct ErrorLogFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ErrorLogFile {
    /// Log appending to `path`; the file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render one log line. Newlines and the field separator inside the message
/// and endpoint are replaced so each entry stays on one line with three
/// fields.
pub fn format_entry(status: u16, message: &str, endpoint: &str) -> String {
    format!("{status}|{}|{}\n", sanitize_field(message), sanitize_field(endpoint))
}

fn sanitize_field(field: &str) -> String {
    field.replace(['\n', '\r'], " ").replace('|', "/")
}

#[async_trait]
impl ErrorSink for ErrorLogFile {
    async fn record(&self, status: u16, message: &str, endpoint: &str) -> Result<()> {
        let line = format_entry(status, message, endpoint);
        let _guard = self.write_lock.lock().await;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(InfraError::from)?;
        file.write_all(line.as_bytes()).await.map_err(InfraError::from)?;
        file.flush().await.map_err(InfraError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn entry_is_pipe_delimited() {
        assert_eq!(format_entry(404, "Not found", "tracks/x"), "404|Not found|tracks/x\n");
    }

    #[test]
    fn entry_sanitizes_message() {
        assert_eq!(format_entry(500, "a|b\nc", "e"), "500|a/b c|e\n");
    }

    #[test]
    fn entry_sanitizes_endpoint() {
        assert_eq!(
            format_entry(400, "Bad request", "search?q=a|b\nc"),
            "400|Bad request|search?q=a/b c\n"
        );
    }

    #[tokio::test]
    async fn records_are_appended() {
        let dir = TempDir::new().unwrap();
        let log = ErrorLogFile::new(dir.path().join("apierrors.log"));

        log.record(429, "API rate limit exceeded", "me/top/tracks").await.unwrap();
        log.record(404, "Non existing id", "tracks/abc").await.unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            contents,
            "429|API rate limit exceeded|me/top/tracks\n404|Non existing id|tracks/abc\n"
        );
    }
}
