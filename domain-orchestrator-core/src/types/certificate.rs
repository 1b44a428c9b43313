//! SSL certificate types and status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Certificates within this many days of expiry report `Expiring`.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// SSL certificate lifecycle status.
///
/// Created `Pending` on domain registration; verification maps it onto
/// `Active`/`Expiring`/`Expired`; a failed renewal parks it in `Error` until
/// a successful renewal re-enters `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CertificateStatus {
    Pending,
    Active,
    Expiring,
    Expired,
    Error,
}

impl CertificateStatus {
    /// Map a ceil-rounded days-until-expiry figure onto a status.
    ///
    /// `> 30` days is `Active`, `(0, 30]` is `Expiring`, everything at or
    /// past expiry is `Expired`.
    #[must_use]
    pub fn from_days_until_expiry(days: i64) -> Self {
        if days > EXPIRY_WARNING_DAYS {
            Self::Active
        } else if days > 0 {
            Self::Expiring
        } else {
            Self::Expired
        }
    }
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Expiring => "EXPIRING",
            Self::Expired => "EXPIRED",
            Self::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

/// An SSL certificate tracked for one tenant domain.
///
/// Never deleted automatically; renewal failures are recorded on the entity
/// (`renewal_error`) rather than surfaced to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslCertificate {
    pub id: String,
    /// Owning tenant.
    pub school_id: String,
    pub domain: String,
    pub status: CertificateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub auto_renew: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_renewed_at: Option<DateTime<Utc>>,
    /// Reason for the last failed renewal, cleared on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SslCertificate {
    /// Create a pending certificate for a freshly registered domain.
    #[must_use]
    pub fn new(school_id: String, domain: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            school_id,
            domain,
            status: CertificateStatus::Pending,
            issuer: None,
            issued_at: None,
            expires_at: None,
            auto_renew: true,
            last_renewed_at: None,
            renewal_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
