//! Field-level validation for the EnterInfo step.
//!
//! Failures are resolved at the field where they occur and never propagate
//! past the workflow; a failed check blocks the transition to Confirmation.

use crate::error::{ServiceError, ServiceResult};
use yoyaku_core::types::ClientInfo;

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

/// ## Summary
/// Validates the client-identification fields submitted at EnterInfo.
///
/// ## Errors
/// Returns `ServiceError::Validation` carrying the first offending field:
/// an empty name, a malformed email, or (when present) a phone number that
/// is not 7–15 digits after stripping separators.
pub fn validate_client_info(info: &ClientInfo) -> ServiceResult<()> {
    if info.name.trim().is_empty() {
        return Err(ServiceError::Validation {
            field: "name",
            message: "name must not be empty".to_string(),
        });
    }

    if !is_valid_email(&info.email) {
        return Err(ServiceError::Validation {
            field: "email",
            message: format!("{:?} is not a valid email address", info.email),
        });
    }

    if let Some(phone) = &info.phone
        && !is_valid_phone(phone)
    {
        return Err(ServiceError::Validation {
            field: "phone",
            message: format!("{phone:?} is not a valid phone number"),
        });
    }

    Ok(())
}

/// Shape check only: one `@`, a non-empty local part, and a domain with a
/// dot. Deliverability is the store's problem.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split_once('.').is_some_and(|(host, tld)| {
            !host.is_empty() && !tld.is_empty()
        })
}

fn is_valid_phone(phone: &str) -> bool {
    let stripped: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = stripped.strip_prefix('+').unwrap_or(&stripped);

    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len())
}
