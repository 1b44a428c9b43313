//! Renewal reminder persistence abstraction.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{ReminderStatus, ReminderType, RenewalReminder};

/// Reminder store. Tenant-scoped; cross-tenant ids come back as `None`.
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<RenewalReminder>>;

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<RenewalReminder>>;

    /// Reminders of one type in one status for the dedup check — generation
    /// creates nothing while a `Pending` reminder of the same type exists.
    async fn find_by_type_and_status(
        &self,
        school_id: &str,
        reminder_type: ReminderType,
        status: ReminderStatus,
    ) -> CoreResult<Vec<RenewalReminder>>;

    /// Insert or replace one reminder (entity-granular atomic write).
    async fn save(&self, reminder: &RenewalReminder) -> CoreResult<()>;
}
