//! Notification sink implementations.

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::NotificationSink;

/// Sink that records dispatches in the process log.
///
/// The real outbound email channel belongs to the host product; this default
/// keeps the orchestration subsystem runnable (and observable) without it.
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        log::info!("[Notify] to={to} subject={subject:?} ({} bytes)", body.len());
        Ok(())
    }
}
