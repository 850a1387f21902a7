//! Bank detail encryption
//!
//! Account numbers and sort codes must be readable again later (payments,
//! payee checks), so they are sealed with AES-256-GCM rather than hashed.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use sha2::{Digest, Sha256};

use super::SecurityError;

const NONCE_LEN: usize = 12;

/// Seals and opens bank detail fields
#[derive(Clone)]
pub struct BankDetailsCipher {
    cipher: Aes256Gcm,
}

impl BankDetailsCipher {
    /// Derive the 256-bit key from the configured secret
    pub fn from_secret(secret: &str) -> Result<Self, SecurityError> {
        let key = Sha256::digest(secret.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| SecurityError::InvalidKey)?;

        Ok(Self { cipher })
    }

    /// Encrypt a value; returns hex of nonce || ciphertext
    pub fn seal(&self, plaintext: &str) -> Result<String, SecurityError> {
        let nonce_bytes: [u8; NONCE_LEN] = rand::random();
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| SecurityError::EncryptionFailed)?;

        let mut sealed = nonce_bytes.to_vec();
        sealed.extend_from_slice(&ciphertext);

        Ok(hex::encode(sealed))
    }

    /// Decrypt a value produced by [`BankDetailsCipher::seal`]
    pub fn open(&self, sealed: &str) -> Result<String, SecurityError> {
        let bytes = hex::decode(sealed).map_err(|_| SecurityError::DecryptionFailed)?;
        if bytes.len() < NONCE_LEN {
            return Err(SecurityError::DecryptionFailed);
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| SecurityError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| SecurityError::DecryptionFailed)
    }
}

impl std::fmt::Debug for BankDetailsCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankDetailsCipher").finish_non_exhaustive()
    }
}
