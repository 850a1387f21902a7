//! PostgreSQL account store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{BankInformation, Company};

use super::{AccountStore, StoreError, StoreResult};

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Account store backed by the `company_information` and `bank_information` tables
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_company_by_email(&self, email: &str) -> StoreResult<Option<Company>> {
        let row: Option<(Uuid, String, String, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT company_id, email, password, created_at, updated_at
            FROM company_information
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(company_id, email, password_hash, created_at, updated_at)| Company {
                company_id,
                email,
                password_hash,
                created_at,
                updated_at,
            },
        ))
    }

    async fn find_bank_information(
        &self,
        company_id: Uuid,
    ) -> StoreResult<Option<BankInformation>> {
        let row: Option<(
            Uuid,
            String,
            String,
            String,
            String,
            String,
            DateTime<Utc>,
            DateTime<Utc>,
        )> = sqlx::query_as(
            r#"
            SELECT company_id, email, name, number, sort, bank, created_at, updated_at
            FROM bank_information
            WHERE company_id = $1
            "#,
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(company_id, email, name, number, sort, bank, created_at, updated_at)| {
                BankInformation {
                    company_id,
                    email,
                    name,
                    number,
                    sort,
                    bank,
                    created_at,
                    updated_at,
                }
            },
        ))
    }

    async fn create_account(&self, company: &Company, bank: &BankInformation) -> StoreResult<()> {
        // Both rows or neither
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO company_information (company_id, email, password, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(company.company_id)
        .bind(&company.email)
        .bind(&company.password_hash)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &company.email))?;

        sqlx::query(
            r#"
            INSERT INTO bank_information (company_id, email, name, number, sort, bank, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(bank.company_id)
        .bind(&bank.email)
        .bind(&bank.name)
        .bind(&bank.number)
        .bind(&bank.sort)
        .bind(&bank.bank)
        .bind(bank.created_at)
        .bind(bank.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn update_bank_information(&self, bank: &BankInformation) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bank_information
            SET name = $2, number = $3, sort = $4, bank = $5, updated_at = $6
            WHERE company_id = $1
            "#,
        )
        .bind(bank.company_id)
        .bind(&bank.name)
        .bind(&bank.number)
        .bind(&bank.sort)
        .bind(&bank.bank)
        .bind(bank.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(bank.company_id));
        }

        Ok(())
    }

    async fn delete_account(&self, company_id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        // Bank row first: it references the company
        sqlx::query("DELETE FROM bank_information WHERE company_id = $1")
            .bind(company_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM company_information WHERE company_id = $1")
            .bind(company_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

fn map_unique_violation(error: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Duplicate(email.to_string());
        }
    }

    StoreError::Database(error)
}
