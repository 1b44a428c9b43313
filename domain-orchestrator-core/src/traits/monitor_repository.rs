//! Uptime monitor and alert persistence abstraction.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{UptimeAlert, UptimeMonitor};

/// Monitor store. A monitor owns its alerts; both live here so a monitor and
/// its freshly created default alerts form one creation unit.
///
/// Tenant-scoped except [`find_active`](MonitorRepository::find_active),
/// which the in-process supervisor uses to bootstrap probe tasks across all
/// tenants. It is not reachable from any tenant-facing operation.
#[async_trait]
pub trait MonitorRepository: Send + Sync {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<UptimeMonitor>>;

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<UptimeMonitor>>;

    /// All `Active` monitors across tenants (supervisor bootstrap only).
    async fn find_active(&self) -> CoreResult<Vec<UptimeMonitor>>;

    /// Insert or replace one monitor (entity-granular atomic write).
    async fn save(&self, monitor: &UptimeMonitor) -> CoreResult<()>;

    /// Remove one monitor and its alerts.
    async fn delete(&self, school_id: &str, id: &str) -> CoreResult<()>;

    /// Alerts attached to one monitor.
    async fn find_alerts(&self, school_id: &str, monitor_id: &str)
        -> CoreResult<Vec<UptimeAlert>>;

    /// Insert or replace one alert (entity-granular atomic write).
    async fn save_alert(&self, alert: &UptimeAlert) -> CoreResult<()>;
}
