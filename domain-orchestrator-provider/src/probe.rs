//! HTTP uptime probe client.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::traits::ProbeClient;
use crate::types::ProbeOutcome;

/// Probe client backed by a shared `reqwest` client.
///
/// One GET per probe, wall-clock timed. Redirects are followed by the
/// underlying client, so `is_up` reflects the final status.
pub struct HttpProbeClient {
    client: reqwest::Client,
}

impl HttpProbeClient {
    /// Create a probe client.
    ///
    /// Fails only on TLS backend misconfiguration, which is a deployment
    /// problem worth surfacing at startup rather than papering over.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("domain-orchestrator-uptime/0.1")
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ProbeClient for HttpProbeClient {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        let started = Instant::now();
        match self.client.get(url).timeout(timeout).send().await {
            Ok(response) => {
                let elapsed = started.elapsed();
                let status = response.status();
                if status.is_success() || status.is_redirection() {
                    ProbeOutcome::up(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
                } else {
                    log::debug!("[Probe] {url} answered with status {status}");
                    ProbeOutcome::down()
                }
            }
            Err(e) => {
                // DNS failure, refused connection, timeout - all collapse to down.
                log::debug!("[Probe] {url} unreachable: {e}");
                ProbeOutcome::down()
            }
        }
    }
}
