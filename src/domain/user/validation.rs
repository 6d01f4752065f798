//! User field validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Minimal email shape check, enough to catch obvious typos. Full RFC
/// validation is out of reach of a regex anyway.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Validation errors for user fields
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserValidationError {
    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    #[error("Password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if !EMAIL_RE.is_match(email) {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Validate a plaintext password before hashing
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong);
    }

    Ok(())
}

/// Normalize an email for storage and comparison
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("bob.smith+tag@sub.example.org").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
        assert_eq!(validate_email("   "), Err(UserValidationError::EmptyEmail));
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("spaces in@example.com").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long_enough_password").is_ok());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
