//! Secret hashing and verification using Argon2id.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use nova_core::models::security::SecuritySettings;
use rand::rngs::OsRng;
use tracing::info;

use crate::error::AccessError;

/// Hash `secret` into an Argon2id PHC string with a fresh salt.
pub fn hash_secret(secret: &str) -> Result<String, AccessError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccessError::Crypto(format!("hash error: {e}")))
}

/// Verify a plaintext secret against an Argon2id PHC-format hash.
///
/// Returns `Ok(true)` on match, `Ok(false)` on mismatch, or
/// `Err(AccessError::Crypto)` if the stored hash is malformed.
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, AccessError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AccessError::Crypto(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(secret.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AccessError::Crypto(format!("verify error: {e}"))),
    }
}

/// Recovery answers are compared trimmed and case-insensitively.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

pub fn hash_recovery_answer(answer: &str) -> Result<String, AccessError> {
    hash_secret(&normalize_answer(answer))
}

/// Hash any pending plaintext secrets (built-in defaults on first start,
/// or the values of an unhashed document). Returns whether anything
/// changed.
pub fn provision(settings: &mut SecuritySettings) -> Result<bool, AccessError> {
    if settings.is_provisioned() {
        return Ok(false);
    }
    if let Some(key) = settings.pending_admin_key() {
        settings.admin_key_hash = hash_secret(key)?;
    }
    if let Some(pin) = settings.pending_security_pin() {
        settings.security_pin_hash = hash_secret(pin)?;
    }
    settings.admin_key = None;
    settings.security_pin = None;
    info!("Admin secrets provisioned");
    Ok(true)
}

/// Settings with the built-in secrets already hashed.
pub fn default_settings() -> Result<SecuritySettings, AccessError> {
    let mut settings = SecuritySettings::default();
    provision(&mut settings)?;
    Ok(settings)
}
