use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{CertificateInspection, IssuedCertificate, MaskedContact, ProbeOutcome};

/// Certificate authority seam.
///
/// The lifecycle manager drives its state machine through this trait; the
/// shipped implementation simulates issuance, a real ACME integration can be
/// substituted without touching the state machine.
#[async_trait]
pub trait CertificateAuthority: Send + Sync {
    /// Inspect the certificate currently served for `domain`.
    async fn inspect(&self, domain: &str) -> Result<CertificateInspection>;

    /// Issue (or renew) a certificate for `domain`.
    async fn issue(&self, domain: &str) -> Result<IssuedCertificate>;
}

/// Registrar seam for domain transfers.
///
/// The transfer state machine tracks declared state only; no EPP traffic.
#[async_trait]
pub trait RegistrarClient: Send + Sync {
    /// Ask the losing registrar to start processing the transfer of `domain`.
    async fn process_transfer(&self, domain: &str) -> Result<()>;

    /// Confirm the transfer of `domain` at the gaining registrar.
    async fn approve_transfer(&self, domain: &str) -> Result<()>;
}

/// WHOIS privacy provider seam.
#[async_trait]
pub trait PrivacyProvider: Send + Sync {
    /// Provider identifier recorded on the privacy entity.
    fn name(&self) -> &'static str;

    /// Activate privacy protection for `domain`, returning the masked
    /// contact identity the provider allocated.
    async fn activate(&self, domain: &str) -> Result<MaskedContact>;

    /// Renew privacy protection for `domain`, returning the new expiry.
    async fn renew(&self, domain: &str) -> Result<DateTime<Utc>>;
}

/// Outbound uptime probe seam.
///
/// The target URL is tenant-supplied and untrusted; implementations must
/// never fail, every transport error is a `down` outcome.
#[async_trait]
pub trait ProbeClient: Send + Sync {
    /// Probe `url` with the given request timeout.
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome;
}

/// Outbound notification channel (email or similar).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one message. Callers catch and record failures; delivery
    /// problems must never crash a state machine.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}
