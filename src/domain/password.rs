//! Password value object - Argon2 hashing and verification.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hash that verifies nothing; checked against when an email is unknown so a
/// failed login costs the same either way.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$2wTcNc0yq0rXbS5HhcmUN3oDuYBQ3q+0wY3u5l0Tn4M";

/// Hashed password. Plain text never leaves the constructor.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a new plain text password.
    ///
    /// # Errors
    /// Returns a validation error if the password is shorter than
    /// [`MIN_PASSWORD_LENGTH`].
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Placeholder used to equalize login timing for unknown emails.
    pub fn dummy() -> Self {
        Self::from_hash(DUMMY_HASH.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// A malformed stored hash never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = Password::new("SecurePassword123!").unwrap();

        assert!(password.verify("SecurePassword123!"));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn test_password_from_hash() {
        let password = Password::new("password123").unwrap();
        let restored = Password::from_hash(password.as_str().to_string());

        assert!(restored.verify("password123"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let pass1 = Password::new("SamePassword").unwrap();
        let pass2 = Password::new("SamePassword").unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify("SamePassword"));
        assert!(pass2.verify("SamePassword"));
    }

    #[test]
    fn test_password_too_short() {
        assert!(Password::new("12345").is_err());
        assert!(Password::new("123456").is_ok());
    }

    #[test]
    fn test_dummy_never_verifies() {
        assert!(!Password::dummy().verify(""));
        assert!(!Password::dummy().verify("password123"));
    }
}
