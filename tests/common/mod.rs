//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tower::util::ServiceExt;

use company_accounts::api::{self, AppState};
use company_accounts::handlers::AccountService;
use company_accounts::modulus::ModulusChecker;
use company_accounts::notifier::{Notification, NotificationQueue};
use company_accounts::security::BankDetailsCipher;
use company_accounts::store::{AccountStore, InMemoryAccountStore};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Application wired to an in-memory store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryAccountStore>,
    pub notifications: mpsc::UnboundedReceiver<Notification>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryAccountStore::new());
        let (queue, notifications) = NotificationQueue::channel();

        let router = api::build_router(AppState::new(build_service(store.clone(), queue)));

        Self {
            router,
            store,
            notifications,
        }
    }

    /// Send a JSON request and return the status with the decoded body
    ///
    /// An empty body decodes to `Value::Null`.
    pub async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(request).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    /// Subjects of every notification enqueued so far
    pub fn sent_subjects(&mut self) -> Vec<String> {
        let mut subjects = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            subjects.push(notification.subject);
        }
        subjects
    }
}

pub fn build_service(store: Arc<dyn AccountStore>, queue: NotificationQueue) -> AccountService {
    AccountService::new(
        store,
        Arc::new(ModulusChecker::seeded().unwrap()),
        BankDetailsCipher::from_secret(TEST_SECRET).unwrap(),
        queue,
    )
}

/// Sign up body with the bank account used throughout the tests
pub fn sign_up_body(email: &str, password: &str) -> Value {
    bank_body(email, password, "31510604", "100000", "Santander")
}

pub fn bank_body(
    email: &str,
    password: &str,
    account_number: &str,
    sort_code: &str,
    bank: &str,
) -> Value {
    serde_json::json!({
        "accountName": "Tyler",
        "accountNumber": account_number,
        "sortCode": sort_code,
        "bank": bank,
        "eaddress": email,
        "pass": password
    })
}

pub fn credentials_body(email: &str, password: &str) -> Value {
    serde_json::json!({ "eaddress": email, "pass": password })
}

/// Setup test database - run migrations and truncate tables
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE TABLE bank_information, company_information CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    pool
}
