//! SendGrid notifier
//!
//! Sends mail through the SendGrid v3 HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Notification, Notifier, NotifyError};

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SendGridNotifier {
    client: reqwest::Client,
    api_key: String,
    from: String,
    endpoint: String,
}

impl SendGridNotifier {
    pub fn new(api_key: String, from: String) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            from,
            endpoint: SENDGRID_ENDPOINT.to_string(),
        })
    }

    /// Override the API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Request body: plain text plus the same text as an HTML heading
    fn payload(&self, notification: &Notification) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": notification.to }] }],
            "from": { "email": self.from },
            "subject": notification.subject,
            "content": [
                { "type": "text/plain", "value": notification.body },
                { "type": "text/html", "value": format!("<h1>{}</h1>", escape_html(&notification.body)) },
            ],
        })
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    fn name(&self) -> &str {
        "sendgrid"
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.payload(notification))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Rejected { status, body })
    }
}

impl std::fmt::Debug for SendGridNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendGridNotifier")
            .field("from", &self.from)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
