//! WHOIS privacy protection types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Privacy protection lifecycle status.
///
/// Activation and renewal are asynchronous legs; `Error` is reachable from
/// either and is observed on the entity, never thrown to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrivacyStatus {
    Disabled,
    Activating,
    Active,
    Renewing,
    Error,
}

impl std::fmt::Display for PrivacyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Disabled => "DISABLED",
            Self::Activating => "ACTIVATING",
            Self::Active => "ACTIVE",
            Self::Renewing => "RENEWING",
            Self::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

/// WHOIS privacy protection for one tenant domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoisPrivacy {
    pub id: String,
    /// Owning tenant.
    pub school_id: String,
    pub domain: String,
    pub is_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    pub auto_renew: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_address: Option<String>,
    pub status: PrivacyStatus,
    pub last_updated: DateTime<Utc>,
}

impl WhoisPrivacy {
    /// Create a disabled privacy setting for a domain.
    #[must_use]
    pub fn new(school_id: String, domain: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            school_id,
            domain,
            is_enabled: false,
            privacy_provider: None,
            expiry_date: None,
            auto_renew: false,
            masked_email: None,
            masked_phone: None,
            masked_address: None,
            status: PrivacyStatus::Disabled,
            last_updated: Utc::now(),
        }
    }

    /// Refresh the update timestamp.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

/// Partial update of the masked contact fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedContactUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked_address: Option<String>,
}

impl MaskedContactUpdate {
    /// Apply the provided fields, leaving the rest untouched.
    pub fn apply_to(&self, privacy: &mut WhoisPrivacy) {
        if let Some(ref email) = self.masked_email {
            privacy.masked_email = Some(email.clone());
        }
        if let Some(ref phone) = self.masked_phone {
            privacy.masked_phone = Some(phone.clone());
        }
        if let Some(ref address) = self.masked_address {
            privacy.masked_address = Some(address.clone());
        }
        privacy.touch();
    }
}
