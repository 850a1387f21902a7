//! Postgres store integration tests
//!
//! These tests require a database connection.
//! Run with: DATABASE_URL=... cargo test -- --ignored

use std::sync::Arc;

use chrono::Utc;
use company_accounts::domain::{AccountOutcome, BankDetails, BankInformation, Company, OperationContext};
use company_accounts::handlers::{DeleteAccountCommand, SignInCommand, SignUpCommand};
use company_accounts::notifier::NotificationQueue;
use company_accounts::store::{AccountStore, PgAccountStore, StoreError};

mod common;

fn account(email: &str) -> (Company, BankInformation) {
    let now = Utc::now();
    let company = Company::new(email.to_string(), "hash".to_string(), now);
    let bank = BankInformation {
        company_id: company.company_id,
        email: email.to_string(),
        name: "Tyler".to_string(),
        number: "sealed-number".to_string(),
        sort: "sealed-sort".to_string(),
        bank: "Santander".to_string(),
        created_at: now,
        updated_at: now,
    };
    (company, bank)
}

#[tokio::test]
#[ignore]
async fn test_pg_create_find_delete() {
    let pool = common::setup_test_db().await;
    let store = PgAccountStore::new(pool);
    let (company, bank) = account("store@x.com");

    store.create_account(&company, &bank).await.unwrap();

    let found = store.find_company_by_email("store@x.com").await.unwrap().unwrap();
    assert_eq!(found.company_id, company.company_id);
    assert_eq!(found.password_hash, "hash");

    let found_bank = store
        .find_bank_information(company.company_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found_bank.number, "sealed-number");
    assert_eq!(found_bank.sort, "sealed-sort");

    store.delete_account(company.company_id).await.unwrap();
    assert!(store.find_company_by_email("store@x.com").await.unwrap().is_none());
    assert!(store
        .find_bank_information(company.company_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore]
async fn test_pg_duplicate_email_is_rejected_atomically() {
    let pool = common::setup_test_db().await;
    let store = PgAccountStore::new(pool.clone());

    let (first, first_bank) = account("dup@x.com");
    store.create_account(&first, &first_bank).await.unwrap();

    let (second, second_bank) = account("dup@x.com");
    let result = store.create_account(&second, &second_bank).await;
    assert!(matches!(result, Err(StoreError::Duplicate(_))));

    // The bank row of the failed insert must not survive
    let banks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bank_information")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(banks, 1);
}

#[tokio::test]
#[ignore]
async fn test_pg_update_bank_information() {
    let pool = common::setup_test_db().await;
    let store = PgAccountStore::new(pool);
    let (company, bank) = account("update@x.com");
    store.create_account(&company, &bank).await.unwrap();

    let replacement = BankInformation {
        name: "Tyler Ltd".to_string(),
        number: "resealed".to_string(),
        bank: "Barclays".to_string(),
        updated_at: Utc::now(),
        ..bank
    };
    store.update_bank_information(&replacement).await.unwrap();

    let found = store
        .find_bank_information(company.company_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Tyler Ltd");
    assert_eq!(found.number, "resealed");
    assert_eq!(found.bank, "Barclays");
}

#[tokio::test]
#[ignore]
async fn test_pg_update_missing_row_is_not_found() {
    let pool = common::setup_test_db().await;
    let store = PgAccountStore::new(pool);
    let (company, bank) = account("gone@x.com");
    store.create_account(&company, &bank).await.unwrap();
    store.delete_account(company.company_id).await.unwrap();

    let result = store.update_bank_information(&bank).await;

    assert!(matches!(result, Err(StoreError::NotFound(id)) if id == company.company_id));
}

#[tokio::test]
#[ignore]
async fn test_pg_service_lifecycle() {
    let pool = common::setup_test_db().await;
    let (queue, _notifications) = NotificationQueue::channel();
    let service = common::build_service(Arc::new(PgAccountStore::new(pool)), queue);
    let context = OperationContext::new();
    let bank = BankDetails::new("Tyler", "31510604", "100000", "Santander");

    let outcome = service
        .sign_up(SignUpCommand::new("pg@x.com", "Tyler1111".to_string(), bank), &context)
        .await
        .unwrap();
    assert_eq!(outcome, AccountOutcome::SignedUp);

    let outcome = service
        .sign_in(SignInCommand::new("pg@x.com", "Tyler1111".to_string()), &context)
        .await
        .unwrap();
    assert_eq!(outcome, AccountOutcome::SignedIn);

    let outcome = service
        .delete_account(DeleteAccountCommand::new("pg@x.com", "Tyler1111".to_string()), &context)
        .await
        .unwrap();
    assert_eq!(outcome, AccountOutcome::Deleted);
}
