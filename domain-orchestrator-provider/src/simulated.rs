//! Deterministic in-process providers.
//!
//! Real certificate-authority, registrar, and privacy integrations are out of
//! scope for this subsystem; these implementations reproduce their observable
//! behavior (latency, success, scripted failure) so the state machines can be
//! exercised end to end. Each simulator can be scripted to fail via
//! [`fail_with`](SimulatedCertificateAuthority::fail_with).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::{ProviderError, Result};
use crate::traits::{CertificateAuthority, PrivacyProvider, RegistrarClient};
use crate::types::{CertificateInspection, IssuedCertificate, MaskedContact};

/// Validity period of a freshly issued certificate.
const CERT_VALIDITY_DAYS: i64 = 90;

/// Validity period of a privacy activation/renewal.
const PRIVACY_VALIDITY_DAYS: i64 = 365;

/// Simulated certificate authority.
///
/// `inspect` answers from a scripted per-domain expiry table, defaulting to a
/// fresh 90-day certificate; `issue` always returns a 90-day certificate
/// unless a failure has been scripted.
pub struct SimulatedCertificateAuthority {
    latency: Duration,
    expiries: RwLock<HashMap<String, DateTime<Utc>>>,
    failure: RwLock<Option<String>>,
}

impl SimulatedCertificateAuthority {
    #[must_use]
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            expiries: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
        }
    }

    /// Simulate provisioning latency on every call.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Script the expiry that `inspect` reports for `domain`.
    pub async fn set_expiry(&self, domain: &str, expires_at: DateTime<Utc>) {
        self.expiries
            .write()
            .await
            .insert(domain.to_string(), expires_at);
    }

    /// Script every subsequent call to fail with `message`.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    /// Clear a scripted failure.
    pub async fn recover(&self) {
        *self.failure.write().await = None;
    }

    async fn check_failure(&self, domain: &str) -> Result<()> {
        if let Some(message) = self.failure.read().await.clone() {
            return Err(ProviderError::CertificateAuthority {
                domain: domain.to_string(),
                message,
            });
        }
        Ok(())
    }
}

impl Default for SimulatedCertificateAuthority {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CertificateAuthority for SimulatedCertificateAuthority {
    async fn inspect(&self, domain: &str) -> Result<CertificateInspection> {
        tokio::time::sleep(self.latency).await;
        self.check_failure(domain).await?;
        let expires_at = self
            .expiries
            .read()
            .await
            .get(domain)
            .copied()
            .unwrap_or_else(|| Utc::now() + chrono::Duration::days(CERT_VALIDITY_DAYS));
        Ok(CertificateInspection {
            issuer: "Simulated CA".to_string(),
            expires_at,
        })
    }

    async fn issue(&self, domain: &str) -> Result<IssuedCertificate> {
        tokio::time::sleep(self.latency).await;
        self.check_failure(domain).await?;
        let now = Utc::now();
        log::debug!("[CA] Issued simulated certificate for {domain}");
        Ok(IssuedCertificate {
            issuer: "Simulated CA".to_string(),
            issued_at: now,
            expires_at: now + chrono::Duration::days(CERT_VALIDITY_DAYS),
        })
    }
}

/// Simulated registrar. Always accepts unless scripted to fail.
pub struct SimulatedRegistrar {
    latency: Duration,
    failure: RwLock<Option<String>>,
}

impl SimulatedRegistrar {
    #[must_use]
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            failure: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Script every subsequent call to fail with `message`.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    async fn check_failure(&self, domain: &str) -> Result<()> {
        if let Some(message) = self.failure.read().await.clone() {
            return Err(ProviderError::Registrar {
                domain: domain.to_string(),
                message,
            });
        }
        Ok(())
    }
}

impl Default for SimulatedRegistrar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistrarClient for SimulatedRegistrar {
    async fn process_transfer(&self, domain: &str) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        self.check_failure(domain).await?;
        log::debug!("[Registrar] Processing transfer for {domain}");
        Ok(())
    }

    async fn approve_transfer(&self, domain: &str) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        self.check_failure(domain).await?;
        log::debug!("[Registrar] Approved transfer for {domain}");
        Ok(())
    }
}

/// Simulated WHOIS privacy provider.
///
/// Allocates a deterministic masked identity derived from the domain.
pub struct SimulatedPrivacyProvider {
    latency: Duration,
    failure: RwLock<Option<String>>,
}

impl SimulatedPrivacyProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            failure: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Script every subsequent call to fail with `message`.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    async fn check_failure(&self, domain: &str) -> Result<()> {
        if let Some(message) = self.failure.read().await.clone() {
            return Err(ProviderError::Privacy {
                domain: domain.to_string(),
                message,
            });
        }
        Ok(())
    }
}

impl Default for SimulatedPrivacyProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrivacyProvider for SimulatedPrivacyProvider {
    fn name(&self) -> &'static str {
        "simulated-privacy"
    }

    async fn activate(&self, domain: &str) -> Result<MaskedContact> {
        tokio::time::sleep(self.latency).await;
        self.check_failure(domain).await?;
        log::debug!("[Privacy] Activated protection for {domain}");
        Ok(MaskedContact {
            provider: self.name().to_string(),
            email: format!("privacy@{domain}"),
            phone: "+1.0000000000".to_string(),
            address: "Privacy Proxy, PO Box 0000".to_string(),
        })
    }

    async fn renew(&self, domain: &str) -> Result<DateTime<Utc>> {
        tokio::time::sleep(self.latency).await;
        self.check_failure(domain).await?;
        log::debug!("[Privacy] Renewed protection for {domain}");
        Ok(Utc::now() + chrono::Duration::days(PRIVACY_VALIDITY_DAYS))
    }
}
