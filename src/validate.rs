//! Validation of free-text answers
//!
//! Pure functions: raw text in, canonical text or a [`ValidationError`] out.
//! A failure is local to the page that asked; it re-prompts and never reaches
//! the queue.

use crate::types::ValidationKind;
use thiserror::Error;

/// Country code prefixed to every normalized phone number.
///
/// Every digit run gets this prefix whatever its length, so an 11-digit
/// number that already starts with 1 comes out as `+1.1XXXXXXXXXX`. Callers
/// that need other countries must not rely on this.
pub const PHONE_PREFIX: &str = "+1.";

/// Why an answer was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{input}' is not a whole number, use digits only")]
    InvalidInteger { input: String },

    #[error("'{input}' is not a valid answer, type yes or no")]
    InvalidChoice { input: String },

    #[error("'{input}' does not contain a phone number")]
    InvalidPhoneNumber { input: String },
}

/// Validate and canonicalize `raw` for `kind`.
pub fn validate(kind: ValidationKind, raw: &str) -> Result<String, ValidationError> {
    let input = raw.trim();
    match kind {
        ValidationKind::Plain => Ok(input.to_string()),
        ValidationKind::Integer => input
            .parse::<i64>()
            .map(|_| input.to_string())
            .map_err(|_| ValidationError::InvalidInteger {
                input: input.to_string(),
            }),
        ValidationKind::YesOrNo => yes_or_no(input),
        ValidationKind::PhoneNumber => massage_phone_number(input),
    }
}

/// Resolve a submitted answer: empty input takes `default` without failing.
///
/// The default is canonicalized when it happens to be valid (so a phone
/// default of `215-555-5321` is stored as `+1.2155555321`), and passed through
/// untouched otherwise.
pub fn resolve(kind: ValidationKind, raw: &str, default: &str) -> Result<String, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(validate(kind, default).unwrap_or_else(|_| default.to_string()));
    }
    validate(kind, raw)
}

fn yes_or_no(input: &str) -> Result<String, ValidationError> {
    match input.to_ascii_lowercase().as_str() {
        "yes" | "y" => Ok("yes".to_string()),
        "no" | "n" => Ok("no".to_string()),
        _ => Err(ValidationError::InvalidChoice {
            input: input.to_string(),
        }),
    }
}

/// Strip everything but digits and prefix [`PHONE_PREFIX`].
pub fn massage_phone_number(raw: &str) -> Result<String, ValidationError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ValidationError::InvalidPhoneNumber {
            input: raw.to_string(),
        });
    }
    Ok(format!("{PHONE_PREFIX}{digits}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_passes_through() {
        assert_eq!(validate(ValidationKind::Plain, "  hello world ").unwrap(), "hello world");
    }

    #[test]
    fn test_integer() {
        assert_eq!(validate(ValidationKind::Integer, "30").unwrap(), "30");
        assert_eq!(validate(ValidationKind::Integer, "-4").unwrap(), "-4");
        assert_eq!(
            validate(ValidationKind::Integer, "abc"),
            Err(ValidationError::InvalidInteger {
                input: "abc".to_string()
            })
        );
        assert!(validate(ValidationKind::Integer, "3.5").is_err());
    }

    #[test]
    fn test_yes_or_no() {
        assert_eq!(validate(ValidationKind::YesOrNo, "y").unwrap(), "yes");
        assert_eq!(validate(ValidationKind::YesOrNo, "N").unwrap(), "no");
        assert_eq!(validate(ValidationKind::YesOrNo, "YES").unwrap(), "yes");
        assert_eq!(validate(ValidationKind::YesOrNo, "no").unwrap(), "no");
        assert!(matches!(
            validate(ValidationKind::YesOrNo, "maybe"),
            Err(ValidationError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn test_phone_numbers() {
        assert_eq!(massage_phone_number("800 555 1234").unwrap(), "+1.8005551234");
        assert_eq!(massage_phone_number("215-555-5321").unwrap(), "+1.2155555321");
        // Short runs are prefixed the same way as ten-digit ones.
        assert_eq!(massage_phone_number("d746fd83843").unwrap(), "+1.74683843");
        assert!(matches!(
            massage_phone_number("dghdhdfuejfhfhfhrghfhfhdhgreh"),
            Err(ValidationError::InvalidPhoneNumber { .. })
        ));
    }

    #[test]
    fn test_empty_input_uses_default() {
        assert_eq!(resolve(ValidationKind::Integer, "", "50").unwrap(), "50");
        assert_eq!(resolve(ValidationKind::Plain, "   ", "working").unwrap(), "working");
        assert_eq!(resolve(ValidationKind::YesOrNo, "", "yes").unwrap(), "yes");
        assert_eq!(
            resolve(ValidationKind::PhoneNumber, "", "215-555-5321").unwrap(),
            "+1.2155555321"
        );
    }

    #[test]
    fn test_invalid_default_is_not_rejected() {
        assert_eq!(resolve(ValidationKind::Integer, "", "lots").unwrap(), "lots");
    }

    #[test]
    fn test_typed_input_wins_over_default() {
        assert_eq!(resolve(ValidationKind::Integer, "30", "50").unwrap(), "30");
        assert!(resolve(ValidationKind::Integer, "abc", "50").is_err());
    }
}
