//! Field validation for untrusted auth input.
//!
//! Checks short-circuit on the first failing field in the order
//! name, email, password.

use regex::Regex;

use super::error::AuthError;

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 6;

/// Registration input after trimming and email normalization.
pub(crate) struct RegistrationInput {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

/// Login input after email normalization.
pub(crate) struct LoginInput {
    pub(crate) email: String,
    pub(crate) password: String,
}

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld` with no whitespace or `@` in any part and a final
/// label of at least two characters.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"(?i)^[^\s@]+@[^\s@]+\.[^\s@]{2,}$")
        .is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Length in UTF-16 code units, the unit browser clients measure in.
fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn check_email(email: &str) -> Result<String, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AuthError::Validation("Email is required."));
    }
    if !valid_email(&email) {
        return Err(AuthError::Validation("Enter a valid email address."));
    }
    Ok(email)
}

pub(crate) fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
) -> Result<RegistrationInput, AuthError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::Validation("Name is required."));
    }
    if utf16_len(name) < MIN_NAME_CHARS {
        return Err(AuthError::Validation("Name must be at least 2 characters."));
    }

    let email = check_email(email)?;

    if password.is_empty() {
        return Err(AuthError::Validation("Password is required."));
    }
    if utf16_len(password) < MIN_PASSWORD_CHARS {
        return Err(AuthError::Validation(
            "Password must be at least 6 characters.",
        ));
    }

    Ok(RegistrationInput {
        name: name.to_string(),
        email,
        password: password.to_string(),
    })
}

pub(crate) fn validate_login(email: &str, password: &str) -> Result<LoginInput, AuthError> {
    let email = check_email(email)?;

    if password.is_empty() {
        return Err(AuthError::Validation("Password is required."));
    }

    Ok(LoginInput {
        email,
        password: password.to_string(),
    })
}
