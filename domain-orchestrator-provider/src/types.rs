//! Data carried across the provider seams.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a live certificate inspection for a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInspection {
    /// Issuing certificate authority, as reported by the endpoint.
    pub issuer: String,
    /// Not-after timestamp of the presented certificate.
    pub expires_at: DateTime<Utc>,
}

/// A certificate returned by a successful issuance/renewal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCertificate {
    /// Issuing certificate authority.
    pub issuer: String,
    /// Issuance timestamp.
    pub issued_at: DateTime<Utc>,
    /// Expiry timestamp (issuance + validity period).
    pub expires_at: DateTime<Utc>,
}

/// Privacy-proxy contact details substituted for the registrant's real
/// contact details in public WHOIS-style lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedContact {
    /// Provider that issued the masked identity.
    pub provider: String,
    /// Masked email address.
    pub email: String,
    /// Masked phone number.
    pub phone: String,
    /// Masked postal address.
    pub address: String,
}

/// Outcome of a single uptime probe.
///
/// Probing is infallible by design: DNS failures, refused connections,
/// timeouts, and non-success statuses all collapse into `is_up = false`
/// with no response time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    /// Whether the target answered with a success status in time.
    pub is_up: bool,
    /// Wall-clock elapsed milliseconds, present only for answered probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl ProbeOutcome {
    /// An answered probe with the given elapsed time.
    #[must_use]
    pub fn up(response_time_ms: u64) -> Self {
        Self {
            is_up: true,
            response_time_ms: Some(response_time_ms),
        }
    }

    /// A failed probe. Transport failures carry no response time.
    #[must_use]
    pub fn down() -> Self {
        Self {
            is_up: false,
            response_time_ms: None,
        }
    }
}
