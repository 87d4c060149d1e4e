//! Signup rules for user accounts.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Canonical form of an email address: trimmed and lower-cased.
///
/// Lookups and the unique constraint both operate on this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate signup input. `email` is expected to be normalized already.
pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid("Name must not be empty"));
    }
    if !email.validate_email() {
        return Err(CoreError::invalid("A valid email address is required"));
    }
    validate_password_strength(password)
}

/// Enforce the minimum password length.
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}
