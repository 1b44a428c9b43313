//! DNS record persistence abstraction.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::DnsRecord;

/// DNS record store. Tenant-scoped; cross-tenant ids come back as `None`.
#[async_trait]
pub trait DnsRecordRepository: Send + Sync {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<DnsRecord>>;

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<DnsRecord>>;

    /// Records associated with one transfer at completion time.
    async fn find_by_transfer(
        &self,
        school_id: &str,
        transfer_id: &str,
    ) -> CoreResult<Vec<DnsRecord>>;

    /// Insert or replace one record (entity-granular atomic write).
    async fn save(&self, record: &DnsRecord) -> CoreResult<()>;

    /// Remove one record. Root-NS protection is enforced by the service layer.
    async fn delete(&self, school_id: &str, id: &str) -> CoreResult<()>;
}
