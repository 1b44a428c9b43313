//! Provider layer error type definition

use serde::Serialize;
use thiserror::Error;

/// Provider layer error type
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ProviderError {
    /// Certificate authority rejected or failed an operation
    #[error("Certificate authority error for {domain}: {message}")]
    CertificateAuthority { domain: String, message: String },

    /// Registrar rejected or failed a transfer operation
    #[error("Registrar error for {domain}: {message}")]
    Registrar { domain: String, message: String },

    /// WHOIS privacy provider rejected or failed an operation
    #[error("Privacy provider error for {domain}: {message}")]
    Privacy { domain: String, message: String },

    /// Outbound notification could not be delivered
    #[error("Notification delivery failed: {0}")]
    NotificationFailed(String),

    /// Network-level failure talking to an external service
    #[error("Network error: {0}")]
    NetworkError(String),

    /// External operation did not complete within its deadline
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl ProviderError {
    /// Whether the error is expected behavior (flaky network, provider-side
    /// rejection that is recorded on the entity) for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotificationFailed(_) | Self::NetworkError(_) | Self::Timeout { .. }
        )
    }
}

/// Provider layer Result type alias
pub type Result<T> = std::result::Result<T, ProviderError>;
