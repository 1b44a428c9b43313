//! Uptime monitor and alert types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default probe period in seconds.
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;

/// Default probe request timeout in seconds. Must stay below the check
/// interval so a timed-out probe can never overlap its own reschedule.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default consecutive-failure threshold for DOWN alerts.
pub const DEFAULT_DOWN_THRESHOLD: u64 = 5;

/// Default response-time threshold in milliseconds for SLOW_RESPONSE alerts.
pub const DEFAULT_SLOW_RESPONSE_THRESHOLD_MS: u64 = 5000;

/// Monitor scheduling status. Probing happens only while `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MonitorStatus {
    Active,
    Paused,
}

/// A per-tenant uptime monitor with rolling statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeMonitor {
    pub id: String,
    /// Owning tenant.
    pub school_id: String,
    pub url: String,
    pub status: MonitorStatus,
    /// Probe period in seconds.
    pub check_interval: u64,
    /// Probe request timeout in seconds.
    pub timeout: u64,
    /// Recipient for alert notifications.
    pub notify_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_up: Option<bool>,
    /// Elapsed milliseconds of the last answered probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    /// `successful_checks / total_checks * 100`, `0` before the first check.
    pub uptime: f64,
    pub total_checks: u64,
    pub successful_checks: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UptimeMonitor {
    /// Apply one probe result to the rolling statistics.
    pub fn record_check(&mut self, is_up: bool, response_time_ms: Option<u64>) {
        self.total_checks += 1;
        if is_up {
            self.successful_checks += 1;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.uptime = self.successful_checks as f64 / self.total_checks as f64 * 100.0;
        }
        self.is_up = Some(is_up);
        self.response_time = response_time_ms;
        let now = Utc::now();
        self.last_checked = Some(now);
        self.updated_at = now;
    }
}

/// Request to create an uptime monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMonitorRequest {
    pub url: String,
    pub notify_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl UptimeMonitor {
    /// Create an active monitor; defaults applied for interval and timeout.
    #[must_use]
    pub fn new(school_id: String, request: CreateMonitorRequest) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            school_id,
            url: request.url,
            status: MonitorStatus::Active,
            check_interval: request
                .check_interval
                .unwrap_or(DEFAULT_CHECK_INTERVAL_SECS),
            timeout: request.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
            notify_email: request.notify_email,
            last_checked: None,
            is_up: None,
            response_time: None,
            uptime: 0.0,
            total_checks: 0,
            successful_checks: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Alert condition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    Down,
    SlowResponse,
}

/// Threshold alert attached to a monitor.
///
/// `email_sent` gates re-notification: once a trigger episode has dispatched,
/// no further notification goes out until a recovery resets the gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeAlert {
    pub id: String,
    /// Owning tenant.
    pub school_id: String,
    pub monitor_id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Consecutive failures for `Down`, milliseconds for `SlowResponse`.
    pub threshold: u64,
    pub consecutive_fails: u64,
    pub is_triggered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_triggered_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub email_sent: bool,
    pub created_at: DateTime<Utc>,
}

impl UptimeAlert {
    fn new(school_id: &str, monitor_id: &str, alert_type: AlertType, threshold: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            school_id: school_id.to_string(),
            monitor_id: monitor_id.to_string(),
            alert_type,
            threshold,
            consecutive_fails: 0,
            is_triggered: false,
            last_triggered_at: None,
            resolved_at: None,
            email_sent: false,
            created_at: Utc::now(),
        }
    }

    /// Default DOWN alert for a freshly created monitor.
    #[must_use]
    pub fn down_default(school_id: &str, monitor_id: &str) -> Self {
        Self::new(school_id, monitor_id, AlertType::Down, DEFAULT_DOWN_THRESHOLD)
    }

    /// Default SLOW_RESPONSE alert for a freshly created monitor.
    #[must_use]
    pub fn slow_response_default(school_id: &str, monitor_id: &str) -> Self {
        Self::new(
            school_id,
            monitor_id,
            AlertType::SlowResponse,
            DEFAULT_SLOW_RESPONSE_THRESHOLD_MS,
        )
    }
}
