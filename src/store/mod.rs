//! Account Store
//!
//! Data-access interface for company credentials and bank information,
//! with a PostgreSQL implementation and an in-memory one.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{BankInformation, Company};

pub use memory::InMemoryAccountStore;
pub use postgres::PgAccountStore;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the account store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique key (company email) is already taken
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// The row to change no longer exists
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations the account service depends on
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Find a company by its (normalised) email
    async fn find_company_by_email(&self, email: &str) -> StoreResult<Option<Company>>;

    /// Find the bank information owned by a company
    async fn find_bank_information(&self, company_id: Uuid)
        -> StoreResult<Option<BankInformation>>;

    /// Create a company and its bank information atomically.
    ///
    /// Returns [`StoreError::Duplicate`] when the email is already registered.
    async fn create_account(&self, company: &Company, bank: &BankInformation) -> StoreResult<()>;

    /// Replace the stored bank information of `bank.company_id`
    ///
    /// Returns [`StoreError::NotFound`] when there is no row to replace.
    async fn update_bank_information(&self, bank: &BankInformation) -> StoreResult<()>;

    /// Delete a company's bank information and then the company, atomically
    async fn delete_account(&self, company_id: Uuid) -> StoreResult<()>;
}
