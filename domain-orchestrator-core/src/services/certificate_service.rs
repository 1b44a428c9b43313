//! SSL certificate lifecycle service

use std::sync::Arc;

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{CertificateStatus, SslCertificate};
use crate::utils::datetime;

/// Owns the certificate state machine: verification maps the live expiry
/// onto a status, renewal runs as a detached follow-up so failures are
/// observable only on the entity itself.
pub struct CertificateService {
    ctx: Arc<ServiceContext>,
}

impl CertificateService {
    /// Create a certificate service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Track a certificate for a freshly registered domain (starts `Pending`).
    pub async fn create(&self, school_id: &str, domain: String) -> CoreResult<SslCertificate> {
        let certificate = SslCertificate::new(school_id.to_string(), domain);
        self.ctx.certificates.save(&certificate).await?;
        Ok(certificate)
    }

    /// Fetch one certificate.
    pub async fn get(&self, school_id: &str, certificate_id: &str) -> CoreResult<SslCertificate> {
        self.ctx
            .certificates
            .find_by_id(school_id, certificate_id)
            .await?
            .ok_or_else(|| CoreError::CertificateNotFound(certificate_id.to_string()))
    }

    /// List a tenant's certificates.
    pub async fn list_for_school(&self, school_id: &str) -> CoreResult<Vec<SslCertificate>> {
        self.ctx.certificates.find_by_school(school_id).await
    }

    /// Inspect the domain's live certificate and map the expiry onto a
    /// status: more than 30 days out is `Active`, within 30 days `Expiring`,
    /// at/past expiry or a failed inspection `Expired`.
    ///
    /// Single field update, no retries; callers may simply re-invoke.
    pub async fn request_verification(
        &self,
        school_id: &str,
        certificate_id: &str,
    ) -> CoreResult<SslCertificate> {
        let mut certificate = self.get(school_id, certificate_id).await?;

        match self
            .ctx
            .certificate_authority
            .inspect(&certificate.domain)
            .await
        {
            Ok(inspection) => {
                let days = datetime::days_until(inspection.expires_at, Utc::now());
                certificate.status = CertificateStatus::from_days_until_expiry(days);
                certificate.issuer = Some(inspection.issuer);
                certificate.expires_at = Some(inspection.expires_at);
                log::debug!(
                    "Certificate {certificate_id} verified: {days} days left, status {}",
                    certificate.status
                );
            }
            Err(e) => {
                log::warn!("Certificate inspection failed for {}: {e}", certificate.domain);
                certificate.status = CertificateStatus::Expired;
            }
        }

        certificate.touch();
        self.ctx.certificates.save(&certificate).await?;
        Ok(certificate)
    }

    /// Request a renewal. The status moves to `Pending` synchronously; the
    /// issuance itself runs detached and records its outcome on the entity
    /// (`Active` + fresh dates, or `Error` + `renewal_error`). The detached
    /// leg never throws back to the caller.
    pub async fn request_renewal(
        &self,
        school_id: &str,
        certificate_id: &str,
    ) -> CoreResult<SslCertificate> {
        let mut certificate = self.get(school_id, certificate_id).await?;

        // Persist the in-progress state before spawning so a crash leaves
        // the entity recoverable rather than silently un-renewed.
        certificate.status = CertificateStatus::Pending;
        certificate.touch();
        self.ctx.certificates.save(&certificate).await?;

        let ctx = Arc::clone(&self.ctx);
        let pending = certificate.clone();
        tokio::spawn(async move {
            Self::complete_renewal(ctx, pending).await;
        });

        Ok(certificate)
    }

    /// Detached completion handler for a renewal: exactly one state
    /// transition, persisted at the end.
    async fn complete_renewal(ctx: Arc<ServiceContext>, mut certificate: SslCertificate) {
        match ctx.certificate_authority.issue(&certificate.domain).await {
            Ok(issued) => {
                certificate.issuer = Some(issued.issuer);
                certificate.issued_at = Some(issued.issued_at);
                certificate.expires_at = Some(issued.expires_at);
                certificate.last_renewed_at = Some(Utc::now());
                certificate.status = CertificateStatus::Active;
                certificate.renewal_error = None;
                log::info!("Certificate renewed for {}", certificate.domain);
            }
            Err(e) => {
                certificate.status = CertificateStatus::Error;
                certificate.renewal_error = Some(e.to_string());
                if e.is_expected() {
                    log::warn!("Certificate renewal failed for {}: {e}", certificate.domain);
                } else {
                    log::error!("Certificate renewal failed for {}: {e}", certificate.domain);
                }
            }
        }
        certificate.touch();
        if let Err(e) = ctx.certificates.save(&certificate).await {
            log::error!(
                "Failed to persist renewal outcome for certificate {}: {e}",
                certificate.id
            );
        }
    }
}
