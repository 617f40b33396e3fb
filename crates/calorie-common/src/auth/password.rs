//! Password hashing (Argon2id) and strength rules

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 5;
pub const MAX_PASSWORD_LENGTH: usize = 50;

/// Hash `password` with a fresh random salt into a PHC string
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// `Ok(false)` on a mismatch; `Err` only when the stored hash is corrupt
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Stored password hash is corrupt: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Check the signup/user-creation password policy
///
/// 5 to 50 characters drawn from letters, digits and ASCII punctuation,
/// with at least one uppercase letter and one digit. The first failing rule
/// is reported.
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let length = password.chars().count();
    let rules: [(bool, &str); 4] = [
        (
            (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length),
            "password must be between 5 and 50 characters long",
        ),
        (
            password
                .chars()
                .all(|c| c.is_alphanumeric() || c.is_ascii_punctuation()),
            "password may only contain letters, digits and punctuation",
        ),
        (
            password.chars().any(char::is_uppercase),
            "password must contain at least one uppercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "password must contain at least one digit",
        ),
    ];

    match rules.iter().find(|(ok, _)| !ok) {
        Some((_, message)) => Err(AppError::Validation((*message).to_string())),
        None => Ok(()),
    }
}
