//! Password hashing with Argon2id

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use super::SecurityError;

/// Hashes and verifies company passwords
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a password into a salted PHC string
    pub fn hash(&self, password: &str) -> Result<String, SecurityError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| SecurityError::PasswordHash(e.to_string()))
    }

    /// Check a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only an unreadable stored hash is an error.
    pub fn verify(&self, password: &str, password_hash: &str) -> Result<bool, SecurityError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| SecurityError::PasswordHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(SecurityError::PasswordHash(e.to_string())),
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_async(&self, password: String) -> Result<String, SecurityError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| SecurityError::PasswordHash(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn verify_async(
        &self,
        password: String,
        password_hash: String,
    ) -> Result<bool, SecurityError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| SecurityError::PasswordHash(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("Tyler1111").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Tyler1111", &hash).unwrap());
        assert!(!hasher.verify("Toronto123", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("Tyler1111").unwrap();
        let second = hasher.hash("Tyler1111").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_corrupt_hash_is_an_error() {
        let hasher = PasswordHasher::new();
        assert!(hasher.verify("Tyler1111", "not-a-phc-string").is_err());
    }

    #[tokio::test]
    async fn test_async_hashing() {
        let hasher = PasswordHasher::new();

        let hash = hasher.hash_async("Tyler1111".to_string()).await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher
            .verify_async("Tyler1111".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!hasher
            .verify_async("Toronto123".to_string(), hash)
            .await
            .unwrap());
    }
}
