//! Certificate persistence abstraction.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::SslCertificate;

/// Certificate store. All lookups are tenant-scoped: an id owned by another
/// tenant must come back as `None`, never as data.
#[async_trait]
pub trait CertificateRepository: Send + Sync {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<SslCertificate>>;

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<SslCertificate>>;

    /// Insert or replace one certificate (entity-granular atomic write).
    async fn save(&self, certificate: &SslCertificate) -> CoreResult<()>;
}
