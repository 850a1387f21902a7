//! Security module
//!
//! Password hashing and bank detail encryption.

mod cipher;
mod password;

pub use cipher::BankDetailsCipher;
pub use password::PasswordHasher;

/// Errors from hashing and encryption
#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Invalid encryption key")]
    InvalidKey,

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed")]
    DecryptionFailed,
}
