//! Domain transfer persistence abstraction.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::DomainTransfer;

/// Transfer store. Tenant-scoped; cross-tenant ids come back as `None`.
#[async_trait]
pub trait TransferRepository: Send + Sync {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<DomainTransfer>>;

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<DomainTransfer>>;

    /// Insert or replace one transfer (entity-granular atomic write).
    async fn save(&self, transfer: &DomainTransfer) -> CoreResult<()>;

    /// Remove one transfer. Deletability is enforced by the service layer.
    async fn delete(&self, school_id: &str, id: &str) -> CoreResult<()>;
}
