//! WHOIS privacy persistence abstraction.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::WhoisPrivacy;

/// Privacy setting store. Tenant-scoped; cross-tenant ids come back as `None`.
#[async_trait]
pub trait PrivacyRepository: Send + Sync {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<WhoisPrivacy>>;

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<WhoisPrivacy>>;

    /// Insert or replace one privacy setting (entity-granular atomic write).
    async fn save(&self, privacy: &WhoisPrivacy) -> CoreResult<()>;

    /// Remove one privacy setting. The enabled check lives in the service.
    async fn delete(&self, school_id: &str, id: &str) -> CoreResult<()>;
}
