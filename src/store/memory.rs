//! In-memory account store
//!
//! Holds both tables behind one lock so multi-row operations stay atomic.
//! Used by tests and local runs without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{BankInformation, Company};

use super::{AccountStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    companies: HashMap<Uuid, Company>,
    banks: HashMap<Uuid, BankInformation>,
}

/// Account store kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    tables: RwLock<Tables>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored companies
    pub async fn company_count(&self) -> usize {
        self.tables.read().await.companies.len()
    }

    /// Number of stored bank information rows
    pub async fn bank_count(&self) -> usize {
        self.tables.read().await.banks.len()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_company_by_email(&self, email: &str) -> StoreResult<Option<Company>> {
        let tables = self.tables.read().await;

        Ok(tables
            .companies
            .values()
            .find(|company| company.email == email)
            .cloned())
    }

    async fn find_bank_information(
        &self,
        company_id: Uuid,
    ) -> StoreResult<Option<BankInformation>> {
        Ok(self.tables.read().await.banks.get(&company_id).cloned())
    }

    async fn create_account(&self, company: &Company, bank: &BankInformation) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        if tables.companies.values().any(|c| c.email == company.email) {
            return Err(StoreError::Duplicate(company.email.clone()));
        }

        tables.companies.insert(company.company_id, company.clone());
        tables.banks.insert(bank.company_id, bank.clone());

        Ok(())
    }

    async fn update_bank_information(&self, bank: &BankInformation) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        let existing = tables
            .banks
            .get_mut(&bank.company_id)
            .ok_or(StoreError::NotFound(bank.company_id))?;
        *existing = bank.clone();

        Ok(())
    }

    async fn delete_account(&self, company_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        tables.banks.remove(&company_id);
        tables.companies.remove(&company_id);

        Ok(())
    }
}
