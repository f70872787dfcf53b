//! Password encoding and token utilities
//!
//! `PasswordEncoder` produces a tagged, deterministic, non-cryptographic
//! representation of a password. It is not suitable for protecting real
//! credentials; deployments that need that must provide a salted slow hash
//! through the [`PasswordHasher`] trait instead.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Tag prepended to every encoded password
pub const ENCODED_PREFIX: &str = "{encoded}";

/// Characters that count as "special" for password strength
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()";

const MIN_STRONG_PASSWORD_LENGTH: usize = 8;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Tagged hash-code password encoder with strength and token helpers
#[derive(Debug, Clone, Default)]
pub struct PasswordEncoder;

impl PasswordEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a password as `{encoded}<hash code>`
    pub fn encode_password(&self, password: &str) -> String {
        format!("{}{}", ENCODED_PREFIX, string_hash_code(password))
    }

    /// At least 8 characters with an uppercase letter, a digit and one of
    /// `!@#$%^&*()`. Absent input is never strong.
    pub fn is_strong_password(&self, password: Option<&str>) -> bool {
        let Some(password) = password else {
            return false;
        };

        password.chars().count() >= MIN_STRONG_PASSWORD_LENGTH
            && password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_digit())
            && password.chars().any(|c| SPECIAL_CHARACTERS.contains(c))
    }

    /// Random alphanumeric token of exactly `length` characters.
    /// Uses the thread-local PRNG; do not use for secrets.
    pub fn generate_token(&self, length: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}

impl PasswordHasher for PasswordEncoder {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(self.encode_password(password))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        self.encode_password(password) == hash
    }
}

/// 32-bit polynomial string hash (`h = 31 * h + unit`) over UTF-16 code units,
/// wrapping on overflow.
fn string_hash_code(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
