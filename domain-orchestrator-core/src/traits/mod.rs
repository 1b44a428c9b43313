//! Storage abstraction traits (the Record Store contract)
//!
//! The host platform injects implementations of these through
//! [`ServiceContext`](crate::services::ServiceContext). Every method is
//! tenant-scoped: a lookup with the wrong `school_id` answers `None`/empty,
//! so the service layer surfaces not-found and nothing ever leaks across
//! tenants. Writes are assumed atomic at single-entity granularity; no
//! cross-entity transactions are required.

mod certificate_repository;
mod dns_record_repository;
mod monitor_repository;
mod privacy_repository;
mod reminder_repository;
mod subscription_repository;
mod transfer_repository;

pub use certificate_repository::CertificateRepository;
pub use dns_record_repository::DnsRecordRepository;
pub use monitor_repository::MonitorRepository;
pub use privacy_repository::PrivacyRepository;
pub use reminder_repository::ReminderRepository;
pub use subscription_repository::SubscriptionRepository;
pub use transfer_repository::TransferRepository;
