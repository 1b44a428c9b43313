//! Domain transfer types and state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain transfer lifecycle status.
///
/// Initial `Pending`, terminal `Completed`/`Cancelled`. All transition
/// legality lives in [`TransferStatus::transition`]; call sites never match
/// on states themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending,
    Processing,
    AwaitingApproval,
    Completed,
    Failed,
    Cancelled,
}

/// Actions that drive the transfer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferAction {
    /// Registrar-side processing of a pending transfer begins.
    BeginProcessing,
    /// The tenant submits (or confirms intent to submit) the EPP auth code.
    SubmitAuthCode,
    /// Administrative approval of a processing transfer.
    Approve,
    /// Abandon the transfer.
    Cancel,
    /// Registrar-side failure.
    Fail,
}

impl TransferStatus {
    /// Terminal states admit no further actions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Only transfers that never progressed past declaration, or that ended
    /// without completing, may be deleted. An in-flight or completed transfer
    /// must not be silently discarded.
    #[must_use]
    pub fn is_deletable(self) -> bool {
        matches!(self, Self::Pending | Self::Failed | Self::Cancelled)
    }

    /// The single transition function. Returns the successor state, or
    /// `None` when `action` is not legal from `self`.
    #[must_use]
    pub fn transition(self, action: TransferAction) -> Option<Self> {
        match (self, action) {
            (Self::Pending, TransferAction::BeginProcessing) => Some(Self::Processing),
            (Self::Pending, TransferAction::SubmitAuthCode) => Some(Self::AwaitingApproval),
            (Self::AwaitingApproval, TransferAction::SubmitAuthCode) => Some(Self::Processing),
            (Self::Processing, TransferAction::Approve) => Some(Self::Completed),
            (s, TransferAction::Cancel) if !s.is_terminal() => Some(Self::Cancelled),
            (s, TransferAction::Fail) if !s.is_terminal() => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::AwaitingApproval => "AWAITING_APPROVAL",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

impl std::fmt::Display for TransferAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BeginProcessing => "begin_processing",
            Self::SubmitAuthCode => "submit_auth_code",
            Self::Approve => "approve",
            Self::Cancel => "cancel",
            Self::Fail => "fail",
        };
        write!(f, "{s}")
    }
}

/// An inbound domain transfer tracked for one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainTransfer {
    pub id: String,
    /// Owning tenant.
    pub school_id: String,
    pub domain: String,
    pub current_registrar: String,
    /// EPP authorization code; stored only once the transfer reaches
    /// `Processing` via auth-code submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_code: Option<String>,
    pub transfer_status: TransferStatus,
    pub initiated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    pub auto_renew: bool,
    pub privacy_protection: bool,
    /// Registrar lock; freely toggleable regardless of transfer state.
    pub lock_status: bool,
    pub admin_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Request to declare a new inbound transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    pub domain: String,
    pub current_registrar: String,
    pub admin_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_phone: Option<String>,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub privacy_protection: bool,
}

impl DomainTransfer {
    /// Create a pending transfer from a declaration request.
    #[must_use]
    pub fn new(school_id: String, request: CreateTransferRequest) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            school_id,
            domain: request.domain,
            current_registrar: request.current_registrar,
            auth_code: None,
            transfer_status: TransferStatus::Pending,
            initiated_at: now,
            completed_at: None,
            expiry_date: None,
            auto_renew: request.auto_renew,
            privacy_protection: request.privacy_protection,
            lock_status: false,
            admin_email: request.admin_email,
            admin_phone: request.admin_phone,
            transfer_notes: None,
            updated_at: now,
        }
    }

    /// Refresh the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
