//! # domain-orchestrator-provider
//!
//! External-effect abstraction layer for the domain & hosting lifecycle
//! orchestration subsystem. The core state machines never talk to the outside
//! world directly; they go through the seams defined here:
//!
//! - [`CertificateAuthority`] — certificate inspection and issuance
//! - [`RegistrarClient`] — domain transfer processing/approval
//! - [`PrivacyProvider`] — WHOIS privacy activation/renewal
//! - [`ProbeClient`] — outbound uptime probing
//! - [`NotificationSink`] — alert/reminder delivery
//!
//! Real CA (ACME), registrar (EPP), and WHOIS integrations are explicitly out
//! of scope; the shipped implementations are deterministic simulations plus a
//! real HTTP probe client. Substituting production integrations requires no
//! change to the core crate.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, ProviderError>`](ProviderError).
//! Probing is the exception: tenant-supplied targets are untrusted, so
//! [`ProbeClient::probe`] is infallible and collapses every failure mode into
//! a `down` [`ProbeOutcome`].

mod error;
mod notify;
mod probe;
mod simulated;
mod traits;
mod types;

pub use error::{ProviderError, Result};
pub use notify::LogNotificationSink;
pub use probe::HttpProbeClient;
pub use simulated::{SimulatedCertificateAuthority, SimulatedPrivacyProvider, SimulatedRegistrar};
pub use traits::{
    CertificateAuthority, NotificationSink, PrivacyProvider, ProbeClient, RegistrarClient,
};
pub use types::{CertificateInspection, IssuedCertificate, MaskedContact, ProbeOutcome};
