//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use domain_orchestrator_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Certificate not found (or owned by another tenant)
    #[error("Certificate not found: {0}")]
    CertificateNotFound(String),

    /// Domain transfer not found (or owned by another tenant)
    #[error("Transfer not found: {0}")]
    TransferNotFound(String),

    /// DNS record not found (or owned by another tenant)
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// WHOIS privacy setting not found (or owned by another tenant)
    #[error("Privacy setting not found: {0}")]
    PrivacyNotFound(String),

    /// Uptime monitor not found (or owned by another tenant)
    #[error("Monitor not found: {0}")]
    MonitorNotFound(String),

    /// Renewal reminder not found (or owned by another tenant)
    #[error("Reminder not found: {0}")]
    ReminderNotFound(String),

    /// Validation error (malformed record, missing required field)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// An action was applied in a state that does not permit it
    #[error("Invalid {entity} transition: {action} not allowed from {from}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        action: String,
    },

    /// A precondition on the current entity state was not met
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist,
    /// illegal request for the current state) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`. Update this method when new variants are added.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::CertificateNotFound(_)
            | Self::TransferNotFound(_)
            | Self::RecordNotFound(_)
            | Self::PrivacyNotFound(_)
            | Self::MonitorNotFound(_)
            | Self::ReminderNotFound(_)
            | Self::ValidationError(_)
            | Self::InvalidTransition { .. }
            | Self::PreconditionFailed(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::StorageError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
