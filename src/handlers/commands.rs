//! Command definitions
//!
//! Commands represent a company's intent to change or access its account.

use crate::domain::{normalize_email, BankDetails};

// =========================================================================
// SignUpCommand
// =========================================================================

/// Command to register a company with its bank account
#[derive(Debug, Clone)]
pub struct SignUpCommand {
    pub email: String,
    pub password: String,
    pub bank: BankDetails,
}

impl SignUpCommand {
    pub fn new(email: &str, password: String, bank: BankDetails) -> Self {
        Self {
            email: normalize_email(email),
            password,
            bank,
        }
    }
}

// =========================================================================
// SignInCommand
// =========================================================================

/// Command to sign in with email and password
#[derive(Debug, Clone)]
pub struct SignInCommand {
    pub email: String,
    pub password: String,
}

impl SignInCommand {
    pub fn new(email: &str, password: String) -> Self {
        Self {
            email: normalize_email(email),
            password,
        }
    }
}

// =========================================================================
// UpdateBankInfoCommand
// =========================================================================

/// Command to replace the bank account linked to a company
#[derive(Debug, Clone)]
pub struct UpdateBankInfoCommand {
    pub email: String,
    pub password: String,
    pub bank: BankDetails,
}

impl UpdateBankInfoCommand {
    pub fn new(email: &str, password: String, bank: BankDetails) -> Self {
        Self {
            email: normalize_email(email),
            password,
            bank,
        }
    }
}

// =========================================================================
// DeleteAccountCommand
// =========================================================================

/// Command to delete a company and its bank account
#[derive(Debug, Clone)]
pub struct DeleteAccountCommand {
    pub email: String,
    pub password: String,
}

impl DeleteAccountCommand {
    pub fn new(email: &str, password: String) -> Self {
        Self {
            email: normalize_email(email),
            password,
        }
    }
}
