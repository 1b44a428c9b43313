//! WHOIS privacy protection service

use std::sync::Arc;

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{MaskedContactUpdate, PrivacyStatus, WhoisPrivacy};

/// Owns the privacy-protection state machine. Activation and renewal run as
/// detached follow-ups: the in-progress status is persisted synchronously,
/// the provider outcome lands on the entity later (`Active` or `Error`).
pub struct PrivacyService {
    ctx: Arc<ServiceContext>,
}

impl PrivacyService {
    /// Create a privacy service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Track privacy protection for a domain (starts `Disabled`).
    pub async fn create(&self, school_id: &str, domain: String) -> CoreResult<WhoisPrivacy> {
        let privacy = WhoisPrivacy::new(school_id.to_string(), domain);
        self.ctx.privacy.save(&privacy).await?;
        Ok(privacy)
    }

    /// Fetch one privacy setting.
    pub async fn get(&self, school_id: &str, privacy_id: &str) -> CoreResult<WhoisPrivacy> {
        self.ctx
            .privacy
            .find_by_id(school_id, privacy_id)
            .await?
            .ok_or_else(|| CoreError::PrivacyNotFound(privacy_id.to_string()))
    }

    /// List a tenant's privacy settings.
    pub async fn list_for_school(&self, school_id: &str) -> CoreResult<Vec<WhoisPrivacy>> {
        self.ctx.privacy.find_by_school(school_id).await
    }

    /// Enable protection: `Activating` synchronously, provider activation
    /// detached. Completion sets `Active`, a one-year expiry, and the masked
    /// contact identity; failure sets `Error`.
    pub async fn enable(&self, school_id: &str, privacy_id: &str) -> CoreResult<WhoisPrivacy> {
        let mut privacy = self.get(school_id, privacy_id).await?;

        privacy.is_enabled = true;
        privacy.status = PrivacyStatus::Activating;
        privacy.touch();
        self.ctx.privacy.save(&privacy).await?;

        let ctx = Arc::clone(&self.ctx);
        let activating = privacy.clone();
        tokio::spawn(async move {
            Self::complete_activation(ctx, activating).await;
        });

        Ok(privacy)
    }

    /// Disable protection. Synchronous; there is no provider leg to wait on.
    pub async fn disable(&self, school_id: &str, privacy_id: &str) -> CoreResult<WhoisPrivacy> {
        let mut privacy = self.get(school_id, privacy_id).await?;
        privacy.is_enabled = false;
        privacy.status = PrivacyStatus::Disabled;
        privacy.touch();
        self.ctx.privacy.save(&privacy).await?;
        Ok(privacy)
    }

    /// Renew protection. Only an `Active` protection can be renewed — you
    /// cannot renew what was never activated.
    pub async fn renew(&self, school_id: &str, privacy_id: &str) -> CoreResult<WhoisPrivacy> {
        let mut privacy = self.get(school_id, privacy_id).await?;

        if privacy.status != PrivacyStatus::Active {
            return Err(CoreError::PreconditionFailed(format!(
                "Privacy protection in state {} cannot be renewed",
                privacy.status
            )));
        }

        privacy.status = PrivacyStatus::Renewing;
        privacy.touch();
        self.ctx.privacy.save(&privacy).await?;

        let ctx = Arc::clone(&self.ctx);
        let renewing = privacy.clone();
        tokio::spawn(async move {
            Self::complete_renewal(ctx, renewing).await;
        });

        Ok(privacy)
    }

    /// Replace the provided masked contact fields.
    pub async fn update_masked_info(
        &self,
        school_id: &str,
        privacy_id: &str,
        update: MaskedContactUpdate,
    ) -> CoreResult<WhoisPrivacy> {
        let mut privacy = self.get(school_id, privacy_id).await?;
        update.apply_to(&mut privacy);
        self.ctx.privacy.save(&privacy).await?;
        Ok(privacy)
    }

    /// Flip or set auto-renewal.
    pub async fn toggle_auto_renew(
        &self,
        school_id: &str,
        privacy_id: &str,
        auto_renew: Option<bool>,
    ) -> CoreResult<WhoisPrivacy> {
        let mut privacy = self.get(school_id, privacy_id).await?;
        privacy.auto_renew = auto_renew.unwrap_or(!privacy.auto_renew);
        privacy.touch();
        self.ctx.privacy.save(&privacy).await?;
        Ok(privacy)
    }

    /// Delete a privacy setting. Requires protection to be disabled first.
    pub async fn delete(&self, school_id: &str, privacy_id: &str) -> CoreResult<()> {
        let privacy = self.get(school_id, privacy_id).await?;
        if privacy.is_enabled {
            return Err(CoreError::PreconditionFailed(
                "Privacy protection must be disabled before deletion".to_string(),
            ));
        }
        self.ctx.privacy.delete(school_id, privacy_id).await
    }

    async fn complete_activation(ctx: Arc<ServiceContext>, mut privacy: WhoisPrivacy) {
        match ctx.privacy_provider.activate(&privacy.domain).await {
            Ok(masked) => {
                privacy.status = PrivacyStatus::Active;
                privacy.expiry_date = Some(Utc::now() + chrono::Duration::days(365));
                privacy.privacy_provider = Some(masked.provider);
                privacy.masked_email = Some(masked.email);
                privacy.masked_phone = Some(masked.phone);
                privacy.masked_address = Some(masked.address);
                log::info!("Privacy protection activated for {}", privacy.domain);
            }
            Err(e) => {
                privacy.status = PrivacyStatus::Error;
                log::warn!("Privacy activation failed for {}: {e}", privacy.domain);
            }
        }
        privacy.touch();
        if let Err(e) = ctx.privacy.save(&privacy).await {
            log::error!(
                "Failed to persist activation outcome for privacy {}: {e}",
                privacy.id
            );
        }
    }

    async fn complete_renewal(ctx: Arc<ServiceContext>, mut privacy: WhoisPrivacy) {
        match ctx.privacy_provider.renew(&privacy.domain).await {
            Ok(expires_at) => {
                privacy.status = PrivacyStatus::Active;
                privacy.expiry_date = Some(expires_at);
                log::info!("Privacy protection renewed for {}", privacy.domain);
            }
            Err(e) => {
                privacy.status = PrivacyStatus::Error;
                log::warn!("Privacy renewal failed for {}: {e}", privacy.domain);
            }
        }
        privacy.touch();
        if let Err(e) = ctx.privacy.save(&privacy).await {
            log::error!(
                "Failed to persist renewal outcome for privacy {}: {e}",
                privacy.id
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TestContext;

    #[tokio::test]
    async fn enable_activates_and_masks() {
        let t = TestContext::new();
        let service = PrivacyService::new(t.ctx());
        let privacy = service
            .create("school-1", "example.com".to_string())
            .await
            .unwrap();

        let enabled = service.enable("school-1", &privacy.id).await.unwrap();
        assert!(enabled.is_enabled);
        assert_eq!(enabled.status, PrivacyStatus::Activating);

        let active = t
            .wait_for_privacy("school-1", &privacy.id, |p| {
                p.status != PrivacyStatus::Activating
            })
            .await;
        assert_eq!(active.status, PrivacyStatus::Active);
        assert!(active.expiry_date.is_some());
        assert_eq!(active.masked_email.as_deref(), Some("privacy@example.com"));
        assert_eq!(active.privacy_provider.as_deref(), Some("simulated-privacy"));
    }

    #[tokio::test]
    async fn failed_activation_lands_in_error() {
        let t = TestContext::new();
        let service = PrivacyService::new(t.ctx());
        let privacy = service
            .create("school-1", "example.com".to_string())
            .await
            .unwrap();

        t.privacy_provider.fail_with("provider outage").await;
        service.enable("school-1", &privacy.id).await.unwrap();

        let failed = t
            .wait_for_privacy("school-1", &privacy.id, |p| {
                p.status != PrivacyStatus::Activating
            })
            .await;
        assert_eq!(failed.status, PrivacyStatus::Error);
    }

    #[tokio::test]
    async fn renew_rejected_unless_active() {
        let t = TestContext::new();
        let service = PrivacyService::new(t.ctx());
        let privacy = service
            .create("school-1", "example.com".to_string())
            .await
            .unwrap();

        // Disabled: never activated, nothing to renew.
        let err = service.renew("school-1", &privacy.id).await.unwrap_err();
        assert!(matches!(err, CoreError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn renew_extends_active_protection() {
        let t = TestContext::new();
        let service = PrivacyService::new(t.ctx());
        let privacy = service
            .create("school-1", "example.com".to_string())
            .await
            .unwrap();

        service.enable("school-1", &privacy.id).await.unwrap();
        t.wait_for_privacy("school-1", &privacy.id, |p| {
            p.status == PrivacyStatus::Active
        })
        .await;

        let renewing = service.renew("school-1", &privacy.id).await.unwrap();
        assert_eq!(renewing.status, PrivacyStatus::Renewing);

        let renewed = t
            .wait_for_privacy("school-1", &privacy.id, |p| {
                p.status != PrivacyStatus::Renewing
            })
            .await;
        assert_eq!(renewed.status, PrivacyStatus::Active);
        assert!(renewed.expiry_date.is_some());
    }

    #[tokio::test]
    async fn delete_requires_disabled() {
        let t = TestContext::new();
        let service = PrivacyService::new(t.ctx());
        let privacy = service
            .create("school-1", "example.com".to_string())
            .await
            .unwrap();

        service.enable("school-1", &privacy.id).await.unwrap();
        t.wait_for_privacy("school-1", &privacy.id, |p| {
            p.status == PrivacyStatus::Active
        })
        .await;

        let err = service.delete("school-1", &privacy.id).await.unwrap_err();
        assert!(matches!(err, CoreError::PreconditionFailed(_)));

        service.disable("school-1", &privacy.id).await.unwrap();
        service.delete("school-1", &privacy.id).await.unwrap();
    }

    #[tokio::test]
    async fn toggle_auto_renew_flips_without_value() {
        let t = TestContext::new();
        let service = PrivacyService::new(t.ctx());
        let privacy = service
            .create("school-1", "example.com".to_string())
            .await
            .unwrap();
        assert!(!privacy.auto_renew);

        let toggled = service
            .toggle_auto_renew("school-1", &privacy.id, None)
            .await
            .unwrap();
        assert!(toggled.auto_renew);

        let explicit = service
            .toggle_auto_renew("school-1", &privacy.id, Some(false))
            .await
            .unwrap();
        assert!(!explicit.auto_renew);
    }

    #[tokio::test]
    async fn update_masked_info_touches_timestamp() {
        let t = TestContext::new();
        let service = PrivacyService::new(t.ctx());
        let privacy = service
            .create("school-1", "example.com".to_string())
            .await
            .unwrap();
        let before = privacy.last_updated;

        let updated = service
            .update_masked_info(
                "school-1",
                &privacy.id,
                MaskedContactUpdate {
                    masked_email: Some("proxy@privacy.example".to_string()),
                    masked_phone: None,
                    masked_address: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.masked_email.as_deref(), Some("proxy@privacy.example"));
        assert!(updated.last_updated >= before);
    }
}
