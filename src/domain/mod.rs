//! Domain module
//!
//! Core domain types: company records, outcomes and request context.

pub mod company;
pub mod context;
pub mod outcome;

pub use company::{normalize_email, BankDetails, BankInformation, Company};
pub use context::OperationContext;
pub use outcome::{AccountOutcome, ResultEnvelope};
