//! Subscription read abstraction.
//!
//! Subscriptions are owned by the surrounding product; the orchestrator only
//! reads them for the expiry scan, so this trait is read-only.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Subscription;

/// Read-only view of a tenant's subscriptions.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Active subscriptions for one tenant.
    async fn find_active_by_school(&self, school_id: &str) -> CoreResult<Vec<Subscription>>;
}
