//! Uptime monitoring: prober, alert engine, and per-monitor supervisor.
//!
//! One recurring task per `Active` monitor. Each cycle probes, applies the
//! rolling statistics, evaluates the monitor's alerts, and only then
//! reschedules — probe N+1 never starts before probe N's result is fully
//! applied, so alert state needs no locking within a monitor. Distinct
//! monitors run fully concurrently and share no mutable state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use domain_orchestrator_provider::ProbeOutcome;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    AlertType, CreateMonitorRequest, MonitorStatus, UptimeAlert, UptimeMonitor,
};

/// What one probe result did to one alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTransition {
    /// The alert crossed its threshold on this result.
    Triggered,
    /// A previously triggered alert recovered on this result.
    Resolved,
    /// No edge; counters may still have moved.
    Unchanged,
}

/// Stateless threshold evaluator. All alert-state mutation flows through
/// [`AlertEngine::evaluate`], which is pure over the alert and the probe
/// outcome; dispatch stays with the caller.
pub struct AlertEngine;

impl AlertEngine {
    /// Apply one probe outcome to one alert, returning the edge (if any).
    ///
    /// DOWN: failures accumulate in `consecutive_fails`; the alert triggers
    /// on reaching `threshold`. The first success resets everything,
    /// including the `email_sent` gate — recovery has no debounce.
    ///
    /// SLOW_RESPONSE: triggers when an answered probe exceeds `threshold`
    /// milliseconds; an unanswered or fast probe clears it.
    pub fn evaluate(alert: &mut UptimeAlert, outcome: &ProbeOutcome) -> AlertTransition {
        match alert.alert_type {
            AlertType::Down => Self::evaluate_down(alert, outcome),
            AlertType::SlowResponse => Self::evaluate_slow_response(alert, outcome),
        }
    }

    fn evaluate_down(alert: &mut UptimeAlert, outcome: &ProbeOutcome) -> AlertTransition {
        if outcome.is_up {
            let was_triggered = alert.is_triggered;
            alert.consecutive_fails = 0;
            alert.is_triggered = false;
            alert.resolved_at = Some(Utc::now());
            alert.email_sent = false;
            if was_triggered {
                AlertTransition::Resolved
            } else {
                AlertTransition::Unchanged
            }
        } else {
            alert.consecutive_fails += 1;
            if !alert.is_triggered && alert.consecutive_fails >= alert.threshold {
                alert.is_triggered = true;
                alert.last_triggered_at = Some(Utc::now());
                AlertTransition::Triggered
            } else {
                AlertTransition::Unchanged
            }
        }
    }

    fn evaluate_slow_response(alert: &mut UptimeAlert, outcome: &ProbeOutcome) -> AlertTransition {
        match outcome.response_time_ms {
            Some(elapsed) if elapsed > alert.threshold => {
                if alert.is_triggered {
                    AlertTransition::Unchanged
                } else {
                    alert.is_triggered = true;
                    alert.last_triggered_at = Some(Utc::now());
                    AlertTransition::Triggered
                }
            }
            // Fast answer, or no answer at all (DOWN territory): clear.
            _ => {
                if alert.is_triggered {
                    alert.is_triggered = false;
                    alert.resolved_at = Some(Utc::now());
                    alert.email_sent = false;
                    AlertTransition::Resolved
                } else {
                    AlertTransition::Unchanged
                }
            }
        }
    }
}

/// Monitor CRUD plus the single-probe cycle the supervisor loops over.
pub struct UptimeService {
    ctx: Arc<ServiceContext>,
}

impl UptimeService {
    /// Create an uptime service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Create a monitor together with its default DOWN and SLOW_RESPONSE
    /// alerts (one creation unit).
    pub async fn create_monitor(
        &self,
        school_id: &str,
        request: CreateMonitorRequest,
    ) -> CoreResult<UptimeMonitor> {
        if request.url.is_empty() {
            return Err(CoreError::ValidationError("URL is required".to_string()));
        }
        let monitor = UptimeMonitor::new(school_id.to_string(), request);
        self.ctx.monitors.save(&monitor).await?;
        self.ctx
            .monitors
            .save_alert(&UptimeAlert::down_default(school_id, &monitor.id))
            .await?;
        self.ctx
            .monitors
            .save_alert(&UptimeAlert::slow_response_default(school_id, &monitor.id))
            .await?;
        log::info!("Monitor created for {} ({})", monitor.url, monitor.id);
        Ok(monitor)
    }

    /// Fetch one monitor.
    pub async fn get(&self, school_id: &str, monitor_id: &str) -> CoreResult<UptimeMonitor> {
        self.ctx
            .monitors
            .find_by_id(school_id, monitor_id)
            .await?
            .ok_or_else(|| CoreError::MonitorNotFound(monitor_id.to_string()))
    }

    /// List a tenant's monitors.
    pub async fn list_for_school(&self, school_id: &str) -> CoreResult<Vec<UptimeMonitor>> {
        self.ctx.monitors.find_by_school(school_id).await
    }

    /// Pause probing. The probe task observes this at its next wake.
    pub async fn pause(&self, school_id: &str, monitor_id: &str) -> CoreResult<UptimeMonitor> {
        self.set_status(school_id, monitor_id, MonitorStatus::Paused).await
    }

    /// Resume probing. The supervisor must be asked to start the task again.
    pub async fn resume(&self, school_id: &str, monitor_id: &str) -> CoreResult<UptimeMonitor> {
        self.set_status(school_id, monitor_id, MonitorStatus::Active).await
    }

    /// Delete a monitor and its alerts.
    pub async fn delete(&self, school_id: &str, monitor_id: &str) -> CoreResult<()> {
        // Existence check first so cross-tenant deletes answer not-found.
        self.get(school_id, monitor_id).await?;
        self.ctx.monitors.delete(school_id, monitor_id).await
    }

    /// One probe cycle: timed GET, rolling counters, alert evaluation, and
    /// any notification dispatch. Strictly sequential per monitor — the
    /// supervisor never starts the next cycle before this one returns.
    pub async fn probe_once(&self, school_id: &str, monitor_id: &str) -> CoreResult<UptimeMonitor> {
        let mut monitor = self.get(school_id, monitor_id).await?;
        if monitor.status != MonitorStatus::Active {
            return Err(CoreError::PreconditionFailed(
                "Only active monitors are probed".to_string(),
            ));
        }

        let outcome = self
            .ctx
            .probe_client
            .probe(&monitor.url, Duration::from_secs(monitor.timeout))
            .await;

        monitor.record_check(outcome.is_up, outcome.response_time_ms);
        self.ctx.monitors.save(&monitor).await?;

        let alerts = self.ctx.monitors.find_alerts(school_id, monitor_id).await?;
        for mut alert in alerts {
            let transition = AlertEngine::evaluate(&mut alert, &outcome);
            if transition == AlertTransition::Triggered && !alert.email_sent {
                self.notify(&monitor, &alert).await;
                // The gate records the attempt; repeated failures while
                // triggered must not re-notify until recovery resets it.
                alert.email_sent = true;
            }
            self.ctx.monitors.save_alert(&alert).await?;
        }

        Ok(monitor)
    }

    async fn notify(&self, monitor: &UptimeMonitor, alert: &UptimeAlert) {
        let (subject, body) = match alert.alert_type {
            AlertType::Down => (
                format!("Monitor DOWN: {}", monitor.url),
                format!(
                    "{} has failed {} consecutive checks (threshold {}).",
                    monitor.url, alert.consecutive_fails, alert.threshold
                ),
            ),
            AlertType::SlowResponse => (
                format!("Slow response: {}", monitor.url),
                format!(
                    "{} answered in {} ms (threshold {} ms).",
                    monitor.url,
                    monitor.response_time.unwrap_or_default(),
                    alert.threshold
                ),
            ),
        };
        if let Err(e) = self
            .ctx
            .notifier
            .send(&monitor.notify_email, &subject, &body)
            .await
        {
            log::warn!("Alert notification failed for monitor {}: {e}", monitor.id);
        }
    }

    async fn set_status(
        &self,
        school_id: &str,
        monitor_id: &str,
        status: MonitorStatus,
    ) -> CoreResult<UptimeMonitor> {
        let mut monitor = self.get(school_id, monitor_id).await?;
        monitor.status = status;
        monitor.updated_at = Utc::now();
        self.ctx.monitors.save(&monitor).await?;
        Ok(monitor)
    }
}

struct MonitorTask {
    handle: JoinHandle<()>,
    cancel: watch::Sender<bool>,
}

/// Owns one cancellable probe task per monitor, keyed by monitor id.
///
/// Cancellation is cooperative: the flag is observed at the next scheduling
/// boundary, an in-flight probe is allowed to complete.
pub struct MonitorSupervisor {
    ctx: Arc<ServiceContext>,
    tasks: Mutex<HashMap<String, MonitorTask>>,
}

impl MonitorSupervisor {
    /// Create a supervisor instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Start the recurring probe task for one monitor. Replaces (after
    /// cancelling) any existing task for the same monitor.
    pub async fn start(&self, school_id: &str, monitor_id: &str) -> CoreResult<()> {
        let monitor = self
            .ctx
            .monitors
            .find_by_id(school_id, monitor_id)
            .await?
            .ok_or_else(|| CoreError::MonitorNotFound(monitor_id.to_string()))?;
        if monitor.status != MonitorStatus::Active {
            return Err(CoreError::PreconditionFailed(
                "Only active monitors can be scheduled".to_string(),
            ));
        }

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let service = UptimeService::new(Arc::clone(&self.ctx));
        let school = school_id.to_string();
        let id = monitor_id.to_string();
        let handle = tokio::spawn(async move {
            run_probe_loop(service, school, id, cancel_rx).await;
        });

        let mut tasks = self.tasks.lock().await;
        if let Some(previous) = tasks.insert(
            monitor_id.to_string(),
            MonitorTask {
                handle,
                cancel: cancel_tx,
            },
        ) {
            let _ = previous.cancel.send(true);
        }
        Ok(())
    }

    /// Start tasks for every active monitor (process bootstrap). A monitor
    /// whose start fails costs only its own task; the rest still come up.
    pub async fn start_all(&self) -> CoreResult<usize> {
        let monitors = self.ctx.monitors.find_active().await?;
        let mut started = 0;
        for monitor in monitors {
            match self.start(&monitor.school_id, &monitor.id).await {
                Ok(()) => started += 1,
                Err(e) => {
                    log::warn!("Skipping monitor {} at bootstrap: {e}", monitor.id);
                }
            }
        }
        log::info!("Supervisor started {started} monitor task(s)");
        Ok(started)
    }

    /// Signal one probe task to stop at its next scheduling boundary.
    pub async fn stop(&self, monitor_id: &str) {
        if let Some(task) = self.tasks.lock().await.remove(monitor_id) {
            let _ = task.cancel.send(true);
        }
    }

    /// Whether a (non-finished) task is registered for the monitor.
    pub async fn is_running(&self, monitor_id: &str) -> bool {
        self.tasks
            .lock()
            .await
            .get(monitor_id)
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Cancel every task and wait for the loops to wind down.
    pub async fn shutdown(&self) {
        let tasks: Vec<MonitorTask> = {
            let mut map = self.tasks.lock().await;
            map.drain().map(|(_, task)| task).collect()
        };
        let mut handles = Vec::with_capacity(tasks.len());
        for task in tasks {
            let _ = task.cancel.send(true);
            handles.push(task.handle);
        }
        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                log::error!("Probe task panicked during shutdown: {e}");
            }
        }
    }
}

/// Recurring probe loop for one monitor. Checks the cancellation flag and
/// the monitor's status at every wake; any status other than `Active` ends
/// the loop.
async fn run_probe_loop(
    service: UptimeService,
    school_id: String,
    monitor_id: String,
    mut cancel: watch::Receiver<bool>,
) {
    log::debug!("Probe loop started for monitor {monitor_id}");
    loop {
        if *cancel.borrow() {
            break;
        }

        let interval = match service.ctx.monitors.find_by_id(&school_id, &monitor_id).await {
            Ok(Some(monitor)) if monitor.status == MonitorStatus::Active => monitor.check_interval,
            Ok(_) => break,
            Err(e) => {
                log::error!("Probe loop lost monitor {monitor_id}: {e}");
                break;
            }
        };

        if let Err(e) = service.probe_once(&school_id, &monitor_id).await {
            // A failed cycle is recorded state, never an escalation; the
            // loop keeps rescheduling regardless of outcome.
            if e.is_expected() {
                log::warn!("Probe cycle failed for monitor {monitor_id}: {e}");
            } else {
                log::error!("Probe cycle failed for monitor {monitor_id}: {e}");
            }
        }

        tokio::select! {
            _ = cancel.changed() => break,
            () = tokio::time::sleep(Duration::from_secs(interval)) => {}
        }
    }
    log::debug!("Probe loop stopped for monitor {monitor_id}");
}
