//! Account Service
//!
//! Sign up, sign in, bank information update and account deletion.
//! Every operation resolves to an [`AccountOutcome`]; only infrastructure
//! failures surface as errors.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AccountOutcome, BankDetails, BankInformation, Company, OperationContext};
use crate::error::AppResult;
use crate::modulus::BankAccountValidator;
use crate::notifier::{Notification, NotificationQueue};
use crate::security::{BankDetailsCipher, PasswordHasher};
use crate::store::{AccountStore, StoreError};

use super::{DeleteAccountCommand, SignInCommand, SignUpCommand, UpdateBankInfoCommand};

/// Orchestrates the credential store, bank store, validator and notifier
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    validator: Arc<dyn BankAccountValidator>,
    passwords: PasswordHasher,
    cipher: BankDetailsCipher,
    notifications: NotificationQueue,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        validator: Arc<dyn BankAccountValidator>,
        cipher: BankDetailsCipher,
        notifications: NotificationQueue,
    ) -> Self {
        Self {
            store,
            validator,
            passwords: PasswordHasher::new(),
            cipher,
            notifications,
        }
    }

    // =====================================================================
    // Sign up
    // =====================================================================

    pub async fn sign_up(
        &self,
        command: SignUpCommand,
        context: &OperationContext,
    ) -> AppResult<AccountOutcome> {
        if self.store.find_company_by_email(&command.email).await?.is_some() {
            return Ok(self.finish("sign_up", &command.email, AccountOutcome::AlreadyExists, context));
        }

        if !self.bank_details_valid(&command.bank) {
            return Ok(self.finish(
                "sign_up",
                &command.email,
                AccountOutcome::InvalidBankInformation,
                context,
            ));
        }

        let now = Utc::now();
        let password_hash = self.passwords.hash_async(command.password).await?;
        let company = Company::new(command.email.clone(), password_hash, now);
        let bank = self.seal(company.company_id, &company.email, &command.bank, now, now)?;

        let outcome = match self.store.create_account(&company, &bank).await {
            Ok(()) => AccountOutcome::SignedUp,
            // Lost a race with a concurrent sign up for the same email
            Err(StoreError::Duplicate(_)) => AccountOutcome::AlreadyExists,
            Err(e) => return Err(e.into()),
        };

        Ok(self.finish("sign_up", &command.email, outcome, context))
    }

    // =====================================================================
    // Sign in
    // =====================================================================

    pub async fn sign_in(
        &self,
        command: SignInCommand,
        context: &OperationContext,
    ) -> AppResult<AccountOutcome> {
        let outcome = match self.store.find_company_by_email(&command.email).await? {
            None => AccountOutcome::NoAccount,
            Some(company) => {
                if self.password_matches(command.password, &company.password_hash).await? {
                    AccountOutcome::SignedIn
                } else {
                    AccountOutcome::WrongPassword
                }
            }
        };

        Ok(self.finish("sign_in", &command.email, outcome, context))
    }

    // =====================================================================
    // Update bank information
    // =====================================================================

    pub async fn update_bank_info(
        &self,
        command: UpdateBankInfoCommand,
        context: &OperationContext,
    ) -> AppResult<AccountOutcome> {
        let Some(company) = self.store.find_company_by_email(&command.email).await? else {
            return Ok(self.finish("update", &command.email, AccountOutcome::NoAccount, context));
        };

        let Some(existing) = self.store.find_bank_information(company.company_id).await? else {
            return Ok(self.finish("update", &command.email, AccountOutcome::NoAccount, context));
        };

        if !self.password_matches(command.password, &company.password_hash).await? {
            return Ok(self.finish("update", &command.email, AccountOutcome::WrongPassword, context));
        }

        if !self.bank_details_valid(&command.bank) {
            return Ok(self.finish(
                "update",
                &command.email,
                AccountOutcome::InvalidBankInformation,
                context,
            ));
        }

        let bank = self.seal(
            company.company_id,
            &existing.email,
            &command.bank,
            existing.created_at,
            Utc::now(),
        )?;
        let outcome = match self.store.update_bank_information(&bank).await {
            Ok(()) => AccountOutcome::Updated,
            // Deleted between the lookup and the write
            Err(StoreError::NotFound(_)) => AccountOutcome::NoAccount,
            Err(e) => return Err(e.into()),
        };

        Ok(self.finish("update", &command.email, outcome, context))
    }

    // =====================================================================
    // Delete account
    // =====================================================================

    pub async fn delete_account(
        &self,
        command: DeleteAccountCommand,
        context: &OperationContext,
    ) -> AppResult<AccountOutcome> {
        // Without a company row there is no password to authenticate against
        let Some(company) = self.store.find_company_by_email(&command.email).await? else {
            return Ok(self.finish("delete", &command.email, AccountOutcome::NoAccount, context));
        };

        if !self.password_matches(command.password, &company.password_hash).await? {
            return Ok(self.finish("delete", &command.email, AccountOutcome::WrongPassword, context));
        }

        self.store.delete_account(company.company_id).await?;

        Ok(self.finish("delete", &command.email, AccountOutcome::Deleted, context))
    }

    // =====================================================================
    // Bank details
    // =====================================================================

    /// Decrypt stored bank information back into plaintext details
    pub fn reveal(&self, bank: &BankInformation) -> AppResult<BankDetails> {
        Ok(BankDetails {
            account_name: bank.name.clone(),
            account_number: self.cipher.open(&bank.number)?,
            sort_code: self.cipher.open(&bank.sort)?,
            bank_name: bank.bank.clone(),
        })
    }

    async fn password_matches(&self, password: String, password_hash: &str) -> AppResult<bool> {
        Ok(self
            .passwords
            .verify_async(password, password_hash.to_string())
            .await?)
    }

    fn bank_details_valid(&self, bank: &BankDetails) -> bool {
        self.validator.is_valid(&bank.sort_code, &bank.account_number)
    }

    fn seal(
        &self,
        company_id: Uuid,
        email: &str,
        details: &BankDetails,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<BankInformation> {
        Ok(BankInformation {
            company_id,
            email: email.to_string(),
            name: details.account_name.clone(),
            number: self.cipher.seal(&details.account_number)?,
            sort: self.cipher.seal(&details.sort_code)?,
            bank: details.bank_name.clone(),
            created_at,
            updated_at,
        })
    }

    /// Log the outcome and enqueue its notification
    fn finish(
        &self,
        operation: &'static str,
        email: &str,
        outcome: AccountOutcome,
        context: &OperationContext,
    ) -> AccountOutcome {
        tracing::info!(
            operation,
            status_code = outcome.status_code(),
            success = outcome.is_success(),
            correlation_id = ?context.correlation_id,
            client_ip = ?context.client_ip,
            "Account operation finished"
        );

        if let Some(notification) = Notification::for_outcome(email, outcome) {
            self.notifications.enqueue(notification);
        }

        outcome
    }
}
