//! Company and bank account records
//!
//! Plain records persisted by the account store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered company and its login credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Company {
    /// Generated on signup, never changes
    pub company_id: Uuid,

    /// Login identifier (unique, normalised)
    pub email: String,

    /// Argon2id PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Create a new company with a fresh identifier
    pub fn new(email: String, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            company_id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The single bank account linked to a company
///
/// `number` and `sort` hold sealed (encrypted) values; see
/// [`crate::security::BankDetailsCipher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInformation {
    /// Owning company (1:1)
    pub company_id: Uuid,

    /// Copy of the owning company's email
    pub email: String,

    /// Account holder name
    pub name: String,

    /// Sealed account number
    pub number: String,

    /// Sealed sort code
    pub sort: String,

    /// Bank display name
    pub bank: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plaintext bank details as submitted by a company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankDetails {
    pub account_name: String,
    pub account_number: String,
    pub sort_code: String,
    pub bank_name: String,
}

impl BankDetails {
    pub fn new(
        account_name: impl Into<String>,
        account_number: impl Into<String>,
        sort_code: impl Into<String>,
        bank_name: impl Into<String>,
    ) -> Self {
        Self {
            account_name: account_name.into().trim().to_string(),
            account_number: account_number.into().trim().to_string(),
            sort_code: sort_code.into().trim().to_string(),
            bank_name: bank_name.into().trim().to_string(),
        }
    }
}

/// Normalise an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
