//! Renewal reminder generation and dispatch.

use std::sync::Arc;

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{ReminderStatus, ReminderType, RenewalReminder, Subscription};
use crate::utils::datetime::days_until;

/// Expiries within this many days (exclusive of already-expired) produce a
/// reminder.
pub const REMINDER_WINDOW_DAYS: i64 = 30;

/// Scans tenant expiries into pending reminders and dispatches them.
pub struct ReminderService {
    ctx: Arc<ServiceContext>,
}

impl ReminderService {
    /// Create a reminder service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Fetch one reminder.
    pub async fn get(&self, school_id: &str, reminder_id: &str) -> CoreResult<RenewalReminder> {
        self.ctx
            .reminders
            .find_by_id(school_id, reminder_id)
            .await?
            .ok_or_else(|| CoreError::ReminderNotFound(reminder_id.to_string()))
    }

    /// List a tenant's reminders.
    pub async fn list_for_school(&self, school_id: &str) -> CoreResult<Vec<RenewalReminder>> {
        self.ctx.reminders.find_by_school(school_id).await
    }

    /// Scan a tenant's subscription and certificates for expiries inside the
    /// reminder window and create pending reminders for them.
    ///
    /// Generation is idempotent: at most one pending reminder per type and
    /// tenant, so while one exists a re-scan creates nothing for that type.
    /// Returns the reminders created by this call.
    pub async fn generate_for_school(&self, school_id: &str) -> CoreResult<Vec<RenewalReminder>> {
        let now = Utc::now();
        let mut created = Vec::new();
        let subscription = self
            .ctx
            .subscriptions
            .find_active_by_school(school_id)
            .await?
            .into_iter()
            .next();

        if let Some(sub) = &subscription {
            let days = days_until(sub.end_date, now);
            if days > 0 && days <= REMINDER_WINDOW_DAYS {
                let pending = self
                    .ctx
                    .reminders
                    .find_by_type_and_status(
                        school_id,
                        ReminderType::SubscriptionExpiring,
                        ReminderStatus::Pending,
                    )
                    .await?;
                if pending.is_empty() {
                    let reminder = RenewalReminder::new(
                        school_id.to_string(),
                        ReminderType::SubscriptionExpiring,
                        sub.contact_email.clone(),
                        format!("Subscription expires in {days} day(s)"),
                        format!(
                            "Your {} subscription expires on {}. Renew to keep your site online.",
                            sub.plan_name,
                            sub.end_date.format("%Y-%m-%d")
                        ),
                    );
                    self.ctx.reminders.save(&reminder).await?;
                    created.push(reminder);
                }
            }
        }

        // Certificate reminders go to the subscription contact; without an
        // active subscription there is no recipient, so skip the scan.
        let Some(sub) = subscription else {
            log::debug!("No active subscription for school {school_id}, skipping SSL reminders");
            return Ok(created);
        };
        created.extend(self.generate_certificate_reminders(school_id, &sub, now).await?);
        Ok(created)
    }

    async fn generate_certificate_reminders(
        &self,
        school_id: &str,
        sub: &Subscription,
        now: chrono::DateTime<Utc>,
    ) -> CoreResult<Option<RenewalReminder>> {
        let pending = self
            .ctx
            .reminders
            .find_by_type_and_status(school_id, ReminderType::SslExpiring, ReminderStatus::Pending)
            .await?;
        if !pending.is_empty() {
            return Ok(None);
        }

        // At most one pending reminder per type and tenant; with several
        // certificates inside the window, the nearest expiry wins.
        let mut nearest: Option<(i64, chrono::DateTime<Utc>, String)> = None;
        for cert in self.ctx.certificates.find_by_school(school_id).await? {
            let Some(expires_at) = cert.expires_at else {
                continue;
            };
            let days = days_until(expires_at, now);
            if days <= 0 || days > REMINDER_WINDOW_DAYS {
                continue;
            }
            if nearest.as_ref().is_none_or(|(d, _, _)| days < *d) {
                nearest = Some((days, expires_at, cert.domain.clone()));
            }
        }

        let Some((days, expires_at, domain)) = nearest else {
            return Ok(None);
        };
        let reminder = RenewalReminder::new(
            school_id.to_string(),
            ReminderType::SslExpiring,
            sub.contact_email.clone(),
            format!("SSL certificate expires in {days} day(s)"),
            format!(
                "The SSL certificate for {domain} expires on {}.",
                expires_at.format("%Y-%m-%d")
            ),
        );
        self.ctx.reminders.save(&reminder).await?;
        Ok(Some(reminder))
    }

    /// Dispatch one reminder, waiting out `scheduled_for` if it lies in the
    /// future. Each call is one attempt: `Sent` on success, `Failed` with
    /// the error recorded otherwise; a failed reminder is retried only by
    /// calling dispatch again.
    pub async fn dispatch(&self, school_id: &str, reminder_id: &str) -> CoreResult<RenewalReminder> {
        let reminder = self.get(school_id, reminder_id).await?;
        match reminder.status {
            ReminderStatus::Pending | ReminderStatus::Failed => {}
            ReminderStatus::Sent | ReminderStatus::Cancelled => {
                return Err(CoreError::PreconditionFailed(format!(
                    "Reminder {reminder_id} is not dispatchable"
                )));
            }
        }

        let now = Utc::now();
        if reminder.scheduled_for > now {
            if let Ok(wait) = (reminder.scheduled_for - now).to_std() {
                tokio::time::sleep(wait).await;
            }
        }

        // Re-read after the wait; a cancel may have landed in between.
        let mut reminder = self.get(school_id, reminder_id).await?;
        if reminder.status == ReminderStatus::Cancelled {
            return Err(CoreError::PreconditionFailed(format!(
                "Reminder {reminder_id} was cancelled"
            )));
        }

        reminder.send_attempts += 1;
        reminder.last_attempt_at = Some(Utc::now());
        match self
            .ctx
            .notifier
            .send(&reminder.email, &reminder.subject, &reminder.content)
            .await
        {
            Ok(()) => {
                reminder.status = ReminderStatus::Sent;
                reminder.sent_at = Some(Utc::now());
                reminder.error_message = None;
                log::info!("Reminder {} sent to {}", reminder.id, reminder.email);
            }
            Err(e) => {
                reminder.status = ReminderStatus::Failed;
                reminder.error_message = Some(e.to_string());
                log::warn!("Reminder {} failed: {e}", reminder.id);
            }
        }
        self.ctx.reminders.save(&reminder).await?;
        Ok(reminder)
    }

    /// Cancel a reminder that has not been sent.
    pub async fn cancel(&self, school_id: &str, reminder_id: &str) -> CoreResult<RenewalReminder> {
        let mut reminder = self.get(school_id, reminder_id).await?;
        if reminder.status == ReminderStatus::Sent {
            return Err(CoreError::PreconditionFailed(
                "A sent reminder cannot be cancelled".to_string(),
            ));
        }
        reminder.status = ReminderStatus::Cancelled;
        self.ctx.reminders.save(&reminder).await?;
        Ok(reminder)
    }
}
