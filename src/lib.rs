//! Company Accounts Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod modulus;
pub mod notifier;
pub mod security;
pub mod store;

mod error;

pub use config::Config;
pub use domain::{AccountOutcome, BankDetails, OperationContext, ResultEnvelope};
pub use error::{AppError, AppResult};
