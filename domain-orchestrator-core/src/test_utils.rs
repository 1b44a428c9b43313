//! In-memory mocks shared by the service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain_orchestrator_provider::{
    NotificationSink, ProbeClient, ProbeOutcome, ProviderError, SimulatedCertificateAuthority,
    SimulatedPrivacyProvider, SimulatedRegistrar,
};
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::{
    CertificateRepository, DnsRecordRepository, MonitorRepository, PrivacyRepository,
    ReminderRepository, SubscriptionRepository, TransferRepository,
};
use crate::types::{
    AlertType, DnsRecord, DomainTransfer, ReminderStatus, ReminderType, RenewalReminder,
    SslCertificate, Subscription, UptimeAlert, UptimeMonitor, WhoisPrivacy,
};

/// In-memory certificate store.
#[derive(Default)]
pub struct MockCertificateRepository {
    items: RwLock<HashMap<String, SslCertificate>>,
}

#[async_trait]
impl CertificateRepository for MockCertificateRepository {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<SslCertificate>> {
        Ok(self
            .items
            .read()
            .await
            .get(id)
            .filter(|c| c.school_id == school_id)
            .cloned())
    }

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<SslCertificate>> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|c| c.school_id == school_id)
            .cloned()
            .collect())
    }

    async fn save(&self, certificate: &SslCertificate) -> CoreResult<()> {
        self.items
            .write()
            .await
            .insert(certificate.id.clone(), certificate.clone());
        Ok(())
    }
}

/// In-memory transfer store.
#[derive(Default)]
pub struct MockTransferRepository {
    items: RwLock<HashMap<String, DomainTransfer>>,
}

#[async_trait]
impl TransferRepository for MockTransferRepository {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<DomainTransfer>> {
        Ok(self
            .items
            .read()
            .await
            .get(id)
            .filter(|t| t.school_id == school_id)
            .cloned())
    }

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<DomainTransfer>> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|t| t.school_id == school_id)
            .cloned()
            .collect())
    }

    async fn save(&self, transfer: &DomainTransfer) -> CoreResult<()> {
        self.items
            .write()
            .await
            .insert(transfer.id.clone(), transfer.clone());
        Ok(())
    }

    async fn delete(&self, school_id: &str, id: &str) -> CoreResult<()> {
        let mut items = self.items.write().await;
        if items.get(id).is_some_and(|t| t.school_id == school_id) {
            items.remove(id);
        }
        Ok(())
    }
}

/// In-memory DNS record store.
#[derive(Default)]
pub struct MockDnsRecordRepository {
    items: RwLock<HashMap<String, DnsRecord>>,
}

#[async_trait]
impl DnsRecordRepository for MockDnsRecordRepository {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<DnsRecord>> {
        Ok(self
            .items
            .read()
            .await
            .get(id)
            .filter(|r| r.school_id == school_id)
            .cloned())
    }

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<DnsRecord>> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|r| r.school_id == school_id)
            .cloned()
            .collect())
    }

    async fn find_by_transfer(
        &self,
        school_id: &str,
        transfer_id: &str,
    ) -> CoreResult<Vec<DnsRecord>> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|r| {
                r.school_id == school_id && r.transfer_id.as_deref() == Some(transfer_id)
            })
            .cloned()
            .collect())
    }

    async fn save(&self, record: &DnsRecord) -> CoreResult<()> {
        self.items
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, school_id: &str, id: &str) -> CoreResult<()> {
        let mut items = self.items.write().await;
        if items.get(id).is_some_and(|r| r.school_id == school_id) {
            items.remove(id);
        }
        Ok(())
    }
}

/// In-memory WHOIS privacy store.
#[derive(Default)]
pub struct MockPrivacyRepository {
    items: RwLock<HashMap<String, WhoisPrivacy>>,
}

#[async_trait]
impl PrivacyRepository for MockPrivacyRepository {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<WhoisPrivacy>> {
        Ok(self
            .items
            .read()
            .await
            .get(id)
            .filter(|p| p.school_id == school_id)
            .cloned())
    }

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<WhoisPrivacy>> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|p| p.school_id == school_id)
            .cloned()
            .collect())
    }

    async fn save(&self, privacy: &WhoisPrivacy) -> CoreResult<()> {
        self.items
            .write()
            .await
            .insert(privacy.id.clone(), privacy.clone());
        Ok(())
    }

    async fn delete(&self, school_id: &str, id: &str) -> CoreResult<()> {
        let mut items = self.items.write().await;
        if items.get(id).is_some_and(|p| p.school_id == school_id) {
            items.remove(id);
        }
        Ok(())
    }
}

/// In-memory monitor + alert store.
#[derive(Default)]
pub struct MockMonitorRepository {
    monitors: RwLock<HashMap<String, UptimeMonitor>>,
    alerts: RwLock<HashMap<String, UptimeAlert>>,
}

#[async_trait]
impl MonitorRepository for MockMonitorRepository {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<UptimeMonitor>> {
        Ok(self
            .monitors
            .read()
            .await
            .get(id)
            .filter(|m| m.school_id == school_id)
            .cloned())
    }

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<UptimeMonitor>> {
        Ok(self
            .monitors
            .read()
            .await
            .values()
            .filter(|m| m.school_id == school_id)
            .cloned()
            .collect())
    }

    async fn find_active(&self) -> CoreResult<Vec<UptimeMonitor>> {
        Ok(self
            .monitors
            .read()
            .await
            .values()
            .filter(|m| m.status == crate::types::MonitorStatus::Active)
            .cloned()
            .collect())
    }

    async fn save(&self, monitor: &UptimeMonitor) -> CoreResult<()> {
        self.monitors
            .write()
            .await
            .insert(monitor.id.clone(), monitor.clone());
        Ok(())
    }

    async fn delete(&self, school_id: &str, id: &str) -> CoreResult<()> {
        let mut monitors = self.monitors.write().await;
        if monitors.get(id).is_some_and(|m| m.school_id == school_id) {
            monitors.remove(id);
            self.alerts.write().await.retain(|_, a| a.monitor_id != id);
        }
        Ok(())
    }

    async fn find_alerts(
        &self,
        school_id: &str,
        monitor_id: &str,
    ) -> CoreResult<Vec<UptimeAlert>> {
        let mut alerts: Vec<UptimeAlert> = self
            .alerts
            .read()
            .await
            .values()
            .filter(|a| a.school_id == school_id && a.monitor_id == monitor_id)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(alerts)
    }

    async fn save_alert(&self, alert: &UptimeAlert) -> CoreResult<()> {
        self.alerts
            .write()
            .await
            .insert(alert.id.clone(), alert.clone());
        Ok(())
    }
}

/// In-memory reminder store.
#[derive(Default)]
pub struct MockReminderRepository {
    items: RwLock<HashMap<String, RenewalReminder>>,
}

#[async_trait]
impl ReminderRepository for MockReminderRepository {
    async fn find_by_id(&self, school_id: &str, id: &str) -> CoreResult<Option<RenewalReminder>> {
        Ok(self
            .items
            .read()
            .await
            .get(id)
            .filter(|r| r.school_id == school_id)
            .cloned())
    }

    async fn find_by_school(&self, school_id: &str) -> CoreResult<Vec<RenewalReminder>> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|r| r.school_id == school_id)
            .cloned()
            .collect())
    }

    async fn find_by_type_and_status(
        &self,
        school_id: &str,
        reminder_type: ReminderType,
        status: ReminderStatus,
    ) -> CoreResult<Vec<RenewalReminder>> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|r| {
                r.school_id == school_id
                    && r.reminder_type == reminder_type
                    && r.status == status
            })
            .cloned()
            .collect())
    }

    async fn save(&self, reminder: &RenewalReminder) -> CoreResult<()> {
        self.items
            .write()
            .await
            .insert(reminder.id.clone(), reminder.clone());
        Ok(())
    }
}

/// In-memory subscription view, seeded per test via [`insert`](Self::insert).
#[derive(Default)]
pub struct MockSubscriptionRepository {
    items: RwLock<Vec<Subscription>>,
}

impl MockSubscriptionRepository {
    pub async fn insert(&self, subscription: Subscription) {
        self.items.write().await.push(subscription);
    }
}

#[async_trait]
impl SubscriptionRepository for MockSubscriptionRepository {
    async fn find_active_by_school(&self, school_id: &str) -> CoreResult<Vec<Subscription>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|s| s.school_id == school_id && s.is_active)
            .cloned()
            .collect())
    }
}

/// Probe client that replays scripted outcomes: a queue first, then a
/// standing outcome, then "up in 42 ms".
#[derive(Default)]
pub struct ScriptedProbeClient {
    queue: RwLock<VecDeque<ProbeOutcome>>,
    standing: RwLock<Option<ProbeOutcome>>,
}

impl ScriptedProbeClient {
    /// Queue one outcome per flag: `true` answers up in 120 ms, `false`
    /// answers down.
    pub async fn script(&self, outcomes: impl IntoIterator<Item = bool>) {
        let mut queue = self.queue.write().await;
        for up in outcomes {
            queue.push_back(if up {
                ProbeOutcome::up(120)
            } else {
                ProbeOutcome::down()
            });
        }
    }

    /// Answer every probe (after the queue drains) with the same outcome.
    pub async fn script_repeat(&self, up: bool) {
        *self.standing.write().await = Some(if up {
            ProbeOutcome::up(120)
        } else {
            ProbeOutcome::down()
        });
    }

    /// Answer every probe (after the queue drains) up with the given
    /// response time.
    pub async fn script_slow(&self, response_time_ms: u64) {
        *self.standing.write().await = Some(ProbeOutcome::up(response_time_ms));
    }
}

#[async_trait]
impl ProbeClient for ScriptedProbeClient {
    async fn probe(&self, _url: &str, _timeout: Duration) -> ProbeOutcome {
        if let Some(outcome) = self.queue.write().await.pop_front() {
            return outcome;
        }
        self.standing
            .read()
            .await
            .clone()
            .unwrap_or_else(|| ProbeOutcome::up(42))
    }
}

/// Notification sink that records every send and can be scripted to fail.
#[derive(Default)]
pub struct RecordingNotificationSink {
    sent: RwLock<Vec<(String, String, String)>>,
    failure: RwLock<Option<String>>,
}

impl RecordingNotificationSink {
    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }

    pub async fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.read().await.clone()
    }

    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    pub async fn recover(&self) {
        *self.failure.write().await = None;
    }
}

#[async_trait]
impl NotificationSink for RecordingNotificationSink {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> domain_orchestrator_provider::Result<()> {
        if let Some(message) = self.failure.read().await.clone() {
            return Err(ProviderError::NotificationFailed(message));
        }
        self.sent
            .write()
            .await
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Shared wiring for service tests: every repository mocked in memory,
/// every provider simulated with zero latency.
pub struct TestContext {
    pub certificates: Arc<MockCertificateRepository>,
    pub transfers: Arc<MockTransferRepository>,
    pub dns_records: Arc<MockDnsRecordRepository>,
    pub privacy: Arc<MockPrivacyRepository>,
    pub monitors: Arc<MockMonitorRepository>,
    pub reminders: Arc<MockReminderRepository>,
    pub subscriptions: Arc<MockSubscriptionRepository>,
    pub certificate_authority: Arc<SimulatedCertificateAuthority>,
    pub registrar: Arc<SimulatedRegistrar>,
    pub privacy_provider: Arc<SimulatedPrivacyProvider>,
    pub probe_client: Arc<ScriptedProbeClient>,
    pub notifier: Arc<RecordingNotificationSink>,
    ctx: Arc<ServiceContext>,
}

impl TestContext {
    pub fn new() -> Self {
        let certificates = Arc::new(MockCertificateRepository::default());
        let transfers = Arc::new(MockTransferRepository::default());
        let dns_records = Arc::new(MockDnsRecordRepository::default());
        let privacy = Arc::new(MockPrivacyRepository::default());
        let monitors = Arc::new(MockMonitorRepository::default());
        let reminders = Arc::new(MockReminderRepository::default());
        let subscriptions = Arc::new(MockSubscriptionRepository::default());
        let certificate_authority = Arc::new(SimulatedCertificateAuthority::new());
        let registrar = Arc::new(SimulatedRegistrar::new());
        let privacy_provider = Arc::new(SimulatedPrivacyProvider::new());
        let probe_client = Arc::new(ScriptedProbeClient::default());
        let notifier = Arc::new(RecordingNotificationSink::default());

        let ctx = Arc::new(ServiceContext::new(
            certificates.clone(),
            transfers.clone(),
            dns_records.clone(),
            privacy.clone(),
            monitors.clone(),
            reminders.clone(),
            subscriptions.clone(),
            certificate_authority.clone(),
            registrar.clone(),
            privacy_provider.clone(),
            probe_client.clone(),
            notifier.clone(),
        ));

        Self {
            certificates,
            transfers,
            dns_records,
            privacy,
            monitors,
            reminders,
            subscriptions,
            certificate_authority,
            registrar,
            privacy_provider,
            probe_client,
            notifier,
            ctx,
        }
    }

    pub fn ctx(&self) -> Arc<ServiceContext> {
        Arc::clone(&self.ctx)
    }

    /// Poll the certificate store until `predicate` holds (detached renewal
    /// legs land asynchronously). Panics after one second.
    pub async fn wait_for_certificate(
        &self,
        school_id: &str,
        id: &str,
        predicate: impl Fn(&SslCertificate) -> bool,
    ) -> SslCertificate {
        for _ in 0..100 {
            if let Ok(Some(cert)) = self.certificates.find_by_id(school_id, id).await {
                if predicate(&cert) {
                    return cert;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("certificate {id} never reached the expected state");
    }

    /// Poll the privacy store until `predicate` holds. Panics after one
    /// second.
    pub async fn wait_for_privacy(
        &self,
        school_id: &str,
        id: &str,
        predicate: impl Fn(&WhoisPrivacy) -> bool,
    ) -> WhoisPrivacy {
        for _ in 0..100 {
            if let Ok(Some(privacy)) = self.privacy.find_by_id(school_id, id).await {
                if predicate(&privacy) {
                    return privacy;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("privacy setting {id} never reached the expected state");
    }

    /// Poll the monitor store until `predicate` holds. Panics after one
    /// second.
    pub async fn wait_for_monitor(
        &self,
        school_id: &str,
        id: &str,
        predicate: impl Fn(&UptimeMonitor) -> bool,
    ) -> UptimeMonitor {
        for _ in 0..100 {
            if let Ok(Some(monitor)) = self.monitors.find_by_id(school_id, id).await {
                if predicate(&monitor) {
                    return monitor;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("monitor {id} never reached the expected state");
    }

    /// The DOWN alert attached to a monitor.
    pub async fn down_alert(&self, school_id: &str, monitor_id: &str) -> UptimeAlert {
        self.monitors
            .find_alerts(school_id, monitor_id)
            .await
            .unwrap_or_default()
            .into_iter()
            .find(|a| a.alert_type == AlertType::Down)
            .unwrap_or_else(|| panic!("monitor {monitor_id} has no DOWN alert"))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
