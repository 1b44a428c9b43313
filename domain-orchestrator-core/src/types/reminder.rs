//! Renewal reminder and subscription types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the reminder is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderType {
    SubscriptionExpiring,
    SslExpiring,
    DomainExpiring,
}

impl std::fmt::Display for ReminderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SubscriptionExpiring => "SUBSCRIPTION_EXPIRING",
            Self::SslExpiring => "SSL_EXPIRING",
            Self::DomainExpiring => "DOMAIN_EXPIRING",
        };
        write!(f, "{s}")
    }
}

/// Reminder delivery status.
///
/// `Pending` moves to `Sent` or `Failed`; a failed reminder is retryable by
/// re-invoking dispatch. `Cancelled` is terminal and skips send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Failed,
    Cancelled,
}

/// A scheduled expiry reminder for one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalReminder {
    pub id: String,
    /// Owning tenant.
    pub school_id: String,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub scheduled_for: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    pub email: String,
    pub subject: String,
    pub content: String,
    pub status: ReminderStatus,
    pub send_attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_attempt_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RenewalReminder {
    /// Create a pending reminder scheduled for immediate dispatch.
    #[must_use]
    pub fn new(
        school_id: String,
        reminder_type: ReminderType,
        email: String,
        subject: String,
        content: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            school_id,
            reminder_type,
            scheduled_for: now,
            sent_at: None,
            email,
            subject,
            content,
            status: ReminderStatus::Pending,
            send_attempts: 0,
            last_attempt_at: None,
            error_message: None,
            created_at: now,
        }
    }
}

/// Minimal subscription surface consumed by the reminder scan.
///
/// The subscription itself (billing, plans, upgrades) is owned by the
/// surrounding product; the orchestrator only reads expiry and contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    /// Owning tenant.
    pub school_id: String,
    pub plan_name: String,
    pub contact_email: String,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}
