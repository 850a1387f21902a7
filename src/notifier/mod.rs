//! Notifications
//!
//! Transactional emails sent after account state changes. Delivery is best
//! effort: the account service enqueues and moves on, a background worker
//! sends, and failures are only logged.

mod logging;
mod queue;
mod sendgrid;

use async_trait::async_trait;

use crate::domain::AccountOutcome;

pub use logging::LogNotifier;
pub use queue::{run_worker, NotificationQueue};
pub use sendgrid::SendGridNotifier;

/// An email to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// The email announcing a successful account operation, if any
    pub fn for_outcome(email: &str, outcome: AccountOutcome) -> Option<Self> {
        let (subject, body) = match outcome {
            AccountOutcome::SignedUp => (
                "Welcome",
                "Your company account has been created and your bank information saved.",
            ),
            AccountOutcome::SignedIn => (
                "New sign in",
                "Your company account was just signed in to.",
            ),
            AccountOutcome::Updated => (
                "Bank information updated",
                "The bank information on your company account has been updated.",
            ),
            AccountOutcome::Deleted => (
                "Account deleted",
                "Your company account and its bank information have been deleted.",
            ),
            _ => return None,
        };

        Some(Self::new(email, subject, body))
    }
}

/// Errors delivering a notification
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers notifications to a mail provider
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifier name for logging
    fn name(&self) -> &str;

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}
