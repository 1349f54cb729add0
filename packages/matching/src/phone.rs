//! Phone number handling.
//!
//! Two different normalizations live here: [`normalize_phone`] produces the
//! identity key used to spot the same person across donor populations, while
//! [`format_phone_number`] produces an E.164 number suitable for SMS delivery.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("phone number is empty")]
    Empty,
    #[error("invalid Indian mobile number {number:?}: must be 10 digits starting with 6-9")]
    InvalidIndianMobile { number: String },
    #[error("phone number too short ({length} characters, minimum 10)")]
    TooShort { length: usize },
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '(' | ')' | '.')
}

fn strip_separators(phone: &str) -> String {
    phone.chars().filter(|c| !is_separator(*c)).collect()
}

/// Identity form of a phone number, or `None` if nothing is left after cleaning.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let cleaned = strip_separators(phone).to_lowercase();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn is_indian_mobile(national: &str) -> bool {
    national.len() == 10
        && national.bytes().all(|b| b.is_ascii_digit())
        && matches!(national.as_bytes()[0], b'6'..=b'9')
}

/// Format a phone number for SMS delivery.
///
/// Indian mobile numbers are recognised with or without the `+91`/`91` prefix.
/// Other numbers of at least 10 characters are accepted and given a leading `+`.
pub fn format_phone_number(phone: &str) -> Result<String, PhoneError> {
    let cleaned = strip_separators(phone);
    if cleaned.is_empty() {
        return Err(PhoneError::Empty);
    }

    if let Some(national) = cleaned.strip_prefix("+91") {
        return if is_indian_mobile(national) {
            Ok(cleaned)
        } else {
            Err(PhoneError::InvalidIndianMobile {
                number: national.to_string(),
            })
        };
    }

    if cleaned.len() == 12
        && let Some(national) = cleaned.strip_prefix("91")
    {
        return if is_indian_mobile(national) {
            Ok(format!("+{cleaned}"))
        } else {
            Err(PhoneError::InvalidIndianMobile {
                number: national.to_string(),
            })
        };
    }

    if is_indian_mobile(&cleaned) {
        return Ok(format!("+91{cleaned}"));
    }

    let length = cleaned.chars().count();
    if length < 10 {
        return Err(PhoneError::TooShort { length });
    }

    if cleaned.starts_with('+') {
        Ok(cleaned)
    } else {
        Ok(format!("+{cleaned}"))
    }
}
