//! API Routes
//!
//! HTTP endpoint definitions.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::domain::{AccountOutcome, BankDetails, OperationContext};
use crate::error::AppError;
use crate::handlers::{
    AccountService, DeleteAccountCommand, SignInCommand, SignUpCommand, UpdateBankInfoCommand,
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AccountService>,
}

impl AppState {
    pub fn new(service: AccountService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// =========================================================================
// Request types
// =========================================================================

/// Body of `/signin` and `/delete`
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub eaddress: String,
    pub pass: String,
}

/// Body of `/signup` and `/updated`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountRequest {
    pub account_name: String,
    pub account_number: String,
    pub sort_code: String,
    pub bank: String,
    pub eaddress: String,
    pub pass: String,
}

impl BankAccountRequest {
    fn bank_details(&self) -> BankDetails {
        BankDetails::new(
            &self.account_name,
            &self.account_number,
            &self.sort_code,
            &self.bank,
        )
    }
}

impl IntoResponse for AccountOutcome {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.envelope())).into_response()
    }
}

fn reject(rejection: JsonRejection) -> AppError {
    AppError::InvalidRequest(rejection.body_text())
}

// =========================================================================
// API Router
// =========================================================================

/// Create the account router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/signin", post(sign_in))
        .route("/updated", put(update_bank_info))
        .route("/signup", post(sign_up))
        .route("/delete", delete(delete_account))
        .route("/success/:page", get(success_page))
}

// =========================================================================
// POST /signin
// =========================================================================

async fn sign_in(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<AccountOutcome, AppError> {
    let Json(request) = payload.map_err(reject)?;

    let command = SignInCommand::new(&request.eaddress, request.pass);
    state.service.sign_in(command, &context).await
}

// =========================================================================
// PUT /updated
// =========================================================================

async fn update_bank_info(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<BankAccountRequest>, JsonRejection>,
) -> Result<AccountOutcome, AppError> {
    let Json(request) = payload.map_err(reject)?;

    let bank = request.bank_details();
    let command = UpdateBankInfoCommand::new(&request.eaddress, request.pass, bank);
    state.service.update_bank_info(command, &context).await
}

// =========================================================================
// POST /signup
// =========================================================================

async fn sign_up(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<BankAccountRequest>, JsonRejection>,
) -> Result<AccountOutcome, AppError> {
    let Json(request) = payload.map_err(reject)?;

    let bank = request.bank_details();
    let command = SignUpCommand::new(&request.eaddress, request.pass, bank);
    state.service.sign_up(command, &context).await
}

// =========================================================================
// DELETE /delete
// =========================================================================

async fn delete_account(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<AccountOutcome, AppError> {
    let Json(request) = payload.map_err(reject)?;

    let command = DeleteAccountCommand::new(&request.eaddress, request.pass);
    state.service.delete_account(command, &context).await
}

// =========================================================================
// GET /success/:page
// =========================================================================

/// Confirmation page shown after a successful operation
async fn success_page(Path(page): Path<String>) -> Result<Html<String>, StatusCode> {
    let heading = success_heading(&page).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Success</title></head>\n\
         <body>\n<h1>{heading}</h1>\n<a href=\"/\">Back</a>\n</body>\n</html>\n"
    )))
}

fn success_heading(page: &str) -> Option<&'static str> {
    match page {
        "signin" => Some("You have signed in"),
        "updated" => Some("Your bank information has been updated"),
        "signup" => Some("Your account has been created"),
        "delete" => Some("Your account has been deleted"),
        _ => None,
    }
}
