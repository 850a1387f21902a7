//! Bank Account Validation
//!
//! UK modulus checking of sort code / account number pairs.

mod checker;
mod weights;

pub use checker::{AccountDigits, ModulusChecker, TableCoverage};
pub use weights::{ModulusMethod, SubstitutionTable, WeightRow, WeightTable};

/// Validates a sort code and account number before they are persisted
pub trait BankAccountValidator: Send + Sync {
    fn is_valid(&self, sort_code: &str, account_number: &str) -> bool;
}

/// Errors loading modulus tables
#[derive(Debug, thiserror::Error)]
pub enum ModulusError {
    #[error("Malformed table row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Unknown modulus method: {0}")]
    UnknownMethod(String),

    #[error("Failed to read table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
