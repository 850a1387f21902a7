//! Notification queue and delivery worker

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Notification, Notifier};

/// Sending half of the notification queue; cheap to clone
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    sender: mpsc::UnboundedSender<Notification>,
}

impl NotificationQueue {
    /// Create a queue and hand back the receiving half
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Create a queue with a worker delivering through `notifier`.
    ///
    /// The worker stops once every queue handle is dropped and the backlog
    /// has been delivered; await the handle to drain on shutdown.
    pub fn start(notifier: Arc<dyn Notifier>) -> (Self, JoinHandle<()>) {
        let (queue, receiver) = Self::channel();
        let worker = tokio::spawn(run_worker(receiver, notifier));
        (queue, worker)
    }

    /// Enqueue without waiting for delivery
    pub fn enqueue(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::warn!("Notification worker stopped; dropping notification");
        }
    }
}

/// Deliver queued notifications until the queue closes
pub async fn run_worker(
    mut receiver: mpsc::UnboundedReceiver<Notification>,
    notifier: Arc<dyn Notifier>,
) {
    tracing::info!(notifier = notifier.name(), "Notification worker started");

    while let Some(notification) = receiver.recv().await {
        match notifier.send(&notification).await {
            Ok(()) => {
                tracing::debug!(subject = %notification.subject, "Notification sent");
            }
            Err(e) => {
                tracing::warn!(
                    notifier = notifier.name(),
                    subject = %notification.subject,
                    error = %e,
                    "Failed to send notification"
                );
            }
        }
    }

    tracing::info!("Notification worker stopped");
}
