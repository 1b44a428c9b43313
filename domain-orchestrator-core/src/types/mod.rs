//! Entity type definitions

mod certificate;
mod dns;
mod privacy;
mod reminder;
mod transfer;
mod uptime;

pub use certificate::{CertificateStatus, SslCertificate, EXPIRY_WARNING_DAYS};
pub use dns::{
    CreateDnsRecordRequest, DnsRecord, DnsRecordType, UpdateDnsRecordRequest,
};
pub use privacy::{MaskedContactUpdate, PrivacyStatus, WhoisPrivacy};
pub use reminder::{ReminderStatus, ReminderType, RenewalReminder, Subscription};
pub use transfer::{CreateTransferRequest, DomainTransfer, TransferAction, TransferStatus};
pub use uptime::{
    AlertType, CreateMonitorRequest, MonitorStatus, UptimeAlert, UptimeMonitor,
    DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_DOWN_THRESHOLD, DEFAULT_SLOW_RESPONSE_THRESHOLD_MS,
    DEFAULT_TIMEOUT_SECS,
};
