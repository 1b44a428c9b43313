//! Domain Orchestrator Core Library
//!
//! Provides the domain and hosting lifecycle logic for multi-tenant site
//! platforms, including:
//! - SSL certificate lifecycle (Certificate Service)
//! - Domain transfer state machine (Transfer Service)
//! - WHOIS privacy management (Privacy Service)
//! - DNS record validation and management (DNS Record Service)
//! - Uptime probing and alerting (Uptime Service)
//! - Renewal reminders (Reminder Service)
//!
//! This library is platform-independent: storage is abstracted through
//! repository traits, external systems (certificate authority, registrar,
//! privacy provider, notification channel) through provider seams.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{
    CertificateRepository, DnsRecordRepository, MonitorRepository, PrivacyRepository,
    ReminderRepository, SubscriptionRepository, TransferRepository,
};
