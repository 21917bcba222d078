//! Diagnostic error log port.

use async_trait::async_trait;
use tunewire_domain::Result;

/// Append-only record of upstream API failures.
///
/// Each entry is one `status|message|endpoint` line.
#[async_trait]
pub trait ErrorSink: Send + Sync {
    /// Record one classified HTTP failure.
    async fn record(&self, status: u16, message: &str, endpoint: &str) -> Result<()>;
}
