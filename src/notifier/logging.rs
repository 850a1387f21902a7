//! Logging notifier, used when no mail provider is configured

use async_trait::async_trait;

use super::{Notification, Notifier, NotifyError};

#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            subject = %notification.subject,
            body = %notification.body,
            "Email delivery disabled; notification logged only"
        );
        Ok(())
    }
}
