//! DNS record validation.
//!
//! Pure, side-effect-free syntax checks run before any record is persisted.
//! Failures carry the specific reason, not a generic error. Deliberately on
//! the loose side (matching the regex-based rules the product has always
//! enforced): A-record octets are range-checked, AAAA accepts only the
//! non-compressed eight-group form, hostnames are label-shape checks rather
//! than full RFC 1035 enforcement.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{CoreError, CoreResult};
use crate::types::DnsRecordType;

// Patterns are literals; compiling them cannot fail.
#[allow(clippy::unwrap_used)]
fn ipv4_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").unwrap())
}

#[allow(clippy::unwrap_used)]
fn ipv6_full() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$").unwrap())
}

#[allow(clippy::unwrap_used)]
fn hostname() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9-]{1,63}(?:\.[A-Za-z0-9-]{1,63})*\.?$").unwrap())
}

/// Validate a record's `(type, name, value, priority)` combination.
///
/// # Errors
///
/// Returns [`CoreError::ValidationError`] with the specific reason when the
/// combination violates the per-type syntax rules.
pub fn validate_record(
    record_type: DnsRecordType,
    name: &str,
    value: &str,
    priority: Option<u16>,
) -> CoreResult<()> {
    if name.is_empty() {
        return Err(CoreError::ValidationError(
            "Record name is required".to_string(),
        ));
    }

    if record_type.requires_priority() && priority.is_none() {
        return Err(CoreError::ValidationError(format!(
            "{record_type} records require a priority between 0 and 65535"
        )));
    }

    match record_type {
        DnsRecordType::A => validate_ipv4(value),
        DnsRecordType::Aaaa => validate_ipv6(value),
        DnsRecordType::Cname | DnsRecordType::Ns | DnsRecordType::Ptr | DnsRecordType::Mx => {
            validate_hostname(record_type, value)
        }
        DnsRecordType::Srv => Ok(()),
        DnsRecordType::Txt => {
            if value.len() > 255 {
                Err(CoreError::ValidationError(
                    "TXT record value exceeds 255 characters".to_string(),
                ))
            } else {
                Ok(())
            }
        }
        DnsRecordType::Caa => {
            if value.starts_with("issue ")
                || value.starts_with("issuewild ")
                || value.starts_with("iodef ")
            {
                Ok(())
            } else {
                Err(CoreError::ValidationError(
                    "CAA record value must start with \"issue \", \"issuewild \", or \"iodef \""
                        .to_string(),
                ))
            }
        }
    }
}

fn validate_ipv4(value: &str) -> CoreResult<()> {
    let well_formed = ipv4_shape().is_match(value)
        && value.split('.').all(|octet| octet.parse::<u8>().is_ok());
    if well_formed {
        Ok(())
    } else {
        Err(CoreError::ValidationError(
            "Invalid IPv4 address format".to_string(),
        ))
    }
}

fn validate_ipv6(value: &str) -> CoreResult<()> {
    if ipv6_full().is_match(value) {
        Ok(())
    } else {
        Err(CoreError::ValidationError(
            "Invalid IPv6 address format (non-compressed form required)".to_string(),
        ))
    }
}

fn validate_hostname(record_type: DnsRecordType, value: &str) -> CoreResult<()> {
    if hostname().is_match(value) {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!(
            "Invalid hostname in {record_type} record value"
        )))
    }
}
