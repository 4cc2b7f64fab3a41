//! Short code generation and custom alias validation.

use rand::Rng;
use serde_json::json;

use crate::error::AppError;

/// Length of a generated short code.
pub const CODE_LENGTH: usize = 6;

const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const ALIAS_MIN_LENGTH: usize = 3;
pub const ALIAS_MAX_LENGTH: usize = 32;

/// Words that collide with routes served from the root path.
pub const RESERVED_ALIASES: &[&str] = &[
    "api",
    "lt",
    "health",
    "static",
    "admin",
    "dashboard",
    "login",
];

/// True if `code` collides with a route served from the root path.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_ALIASES.contains(&code)
}

/// Produces a random 6-character code from `[a-z0-9]`.
///
/// Candidates are not checked for availability here; see
/// [`crate::application::services::AliasService::generate_unique_code`].
pub fn generate_candidate() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Validates a user-chosen alias or linktree code.
///
/// # Rules
///
/// - Length: 3-32 characters
/// - Allowed characters: lowercase letters, digits, hyphens
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved route word
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the first rule violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    let len = alias.chars().count();
    if !(ALIAS_MIN_LENGTH..=ALIAS_MAX_LENGTH).contains(&len) {
        return Err(AppError::bad_request(
            format!("Custom URL must be {ALIAS_MIN_LENGTH}-{ALIAS_MAX_LENGTH} characters"),
            json!({ "provided_length": len }),
        ));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::bad_request(
            "Custom URL can only contain lowercase letters, digits, and hyphens",
            json!({ "alias": alias }),
        ));
    }

    if alias.starts_with('-') || alias.ends_with('-') {
        return Err(AppError::bad_request(
            "Custom URL cannot start or end with a hyphen",
            json!({ "alias": alias }),
        ));
    }

    if is_reserved(alias) {
        return Err(AppError::bad_request(
            "This URL is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
