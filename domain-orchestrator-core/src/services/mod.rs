//! Business logic service layer

mod certificate_service;
mod dns_record_service;
mod privacy_service;
mod reminder_service;
mod transfer_service;
mod uptime_service;

pub use certificate_service::CertificateService;
pub use dns_record_service::DnsRecordService;
pub use privacy_service::PrivacyService;
pub use reminder_service::ReminderService;
pub use transfer_service::TransferService;
pub use uptime_service::{AlertEngine, AlertTransition, MonitorSupervisor, UptimeService};

use std::sync::Arc;

use domain_orchestrator_provider::{
    CertificateAuthority, NotificationSink, PrivacyProvider, ProbeClient, RegistrarClient,
};

use crate::traits::{
    CertificateRepository, DnsRecordRepository, MonitorRepository, PrivacyRepository,
    ReminderRepository, SubscriptionRepository, TransferRepository,
};

/// Service context - holds all dependencies.
///
/// The host platform creates this context and injects its storage
/// implementations (the Record Store) and provider integrations. Services
/// share it via `Arc` and hold no private state beyond in-flight handles.
pub struct ServiceContext {
    /// Certificate store
    pub certificates: Arc<dyn CertificateRepository>,
    /// Domain transfer store
    pub transfers: Arc<dyn TransferRepository>,
    /// DNS record store
    pub dns_records: Arc<dyn DnsRecordRepository>,
    /// WHOIS privacy store
    pub privacy: Arc<dyn PrivacyRepository>,
    /// Uptime monitor + alert store
    pub monitors: Arc<dyn MonitorRepository>,
    /// Renewal reminder store
    pub reminders: Arc<dyn ReminderRepository>,
    /// Subscription read view
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    /// Certificate authority seam
    pub certificate_authority: Arc<dyn CertificateAuthority>,
    /// Registrar seam
    pub registrar: Arc<dyn RegistrarClient>,
    /// WHOIS privacy provider seam
    pub privacy_provider: Arc<dyn PrivacyProvider>,
    /// Outbound probe seam
    pub probe_client: Arc<dyn ProbeClient>,
    /// Outbound notification channel
    pub notifier: Arc<dyn NotificationSink>,
}

impl ServiceContext {
    /// Create a service context from injected implementations.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        certificates: Arc<dyn CertificateRepository>,
        transfers: Arc<dyn TransferRepository>,
        dns_records: Arc<dyn DnsRecordRepository>,
        privacy: Arc<dyn PrivacyRepository>,
        monitors: Arc<dyn MonitorRepository>,
        reminders: Arc<dyn ReminderRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        certificate_authority: Arc<dyn CertificateAuthority>,
        registrar: Arc<dyn RegistrarClient>,
        privacy_provider: Arc<dyn PrivacyProvider>,
        probe_client: Arc<dyn ProbeClient>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
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
        }
    }
}
