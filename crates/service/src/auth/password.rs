use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;

use super::errors::AuthError;

/// Recorded next to each hash so the scheme can be rotated later.
pub const PASSWORD_ALGORITHM: &str = "argon2id";

pub const MIN_PASSWORD_LEN: usize = 9;

/// Enforce the account password policy: at least nine characters with a
/// digit, a lowercase letter, an uppercase letter and a symbol.
pub fn check_policy(password: &str) -> Result<(), AuthError> {
    let mut missing = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        missing.push(format!("at least {MIN_PASSWORD_LEN} characters"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a digit".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        missing.push("a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        missing.push("an uppercase letter".to_string());
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        missing.push("a non-alphanumeric character".to_string());
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(format!("password must contain {}", missing.join(", "))))
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}
