//! Account Outcomes
//!
//! Every account operation ends in exactly one of these outcomes. The
//! mapping to the wire status code, HTTP status and message lives here and
//! nowhere else.

use serde::{Deserialize, Serialize};

/// Result of an account operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOutcome {
    /// No company is registered under the email
    NoAccount,
    SignedIn,
    /// Password did not match the stored hash
    WrongPassword,
    Updated,
    SignedUp,
    /// A company with this email already exists
    AlreadyExists,
    Deleted,
    /// Sort code / account number failed the modulus check
    InvalidBankInformation,
}

impl AccountOutcome {
    /// Numeric code carried in the envelope's `statusCode`
    pub fn status_code(&self) -> u8 {
        match self {
            AccountOutcome::NoAccount => 1,
            AccountOutcome::SignedIn => 2,
            AccountOutcome::WrongPassword => 3,
            AccountOutcome::Updated => 4,
            AccountOutcome::SignedUp => 5,
            AccountOutcome::AlreadyExists => 6,
            AccountOutcome::Deleted => 7,
            AccountOutcome::InvalidBankInformation => 8,
        }
    }

    /// HTTP status the envelope is sent with
    pub fn http_status(&self) -> u16 {
        match self {
            AccountOutcome::SignedIn | AccountOutcome::Updated | AccountOutcome::SignedUp => 201,
            AccountOutcome::Deleted => 200,
            AccountOutcome::NoAccount
            | AccountOutcome::WrongPassword
            | AccountOutcome::AlreadyExists
            | AccountOutcome::InvalidBankInformation => 401,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            AccountOutcome::SignedIn
                | AccountOutcome::Updated
                | AccountOutcome::SignedUp
                | AccountOutcome::Deleted
        )
    }

    pub fn message(&self) -> &'static str {
        match self {
            AccountOutcome::NoAccount => "You do not have an account yet",
            AccountOutcome::SignedIn => "Successfully signed in",
            AccountOutcome::WrongPassword => "Wrong password",
            AccountOutcome::Updated => "Successfully updated bank information",
            AccountOutcome::SignedUp => "Successfully signed up",
            AccountOutcome::AlreadyExists => "You already have an account",
            AccountOutcome::Deleted => "Successfully deleted account",
            AccountOutcome::InvalidBankInformation => "Invalid bank information",
        }
    }

    /// Build the wire envelope for this outcome
    pub fn envelope(&self) -> ResultEnvelope {
        ResultEnvelope {
            message: self.message().to_string(),
            status_code: self.status_code(),
            success: self.is_success(),
        }
    }
}

impl std::fmt::Display for AccountOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.status_code())
    }
}

/// `{message, statusCode, success}` body returned by every account endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub message: String,
    pub status_code: u8,
    pub success: bool,
}
