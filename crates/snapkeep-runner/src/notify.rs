//! Completion notification over HTTP

use reqwest::blocking::Client;
use snapkeep_domain::traits::Notifier;
use snapkeep_domain::{CompletionEvent, NotificationError};

/// Posts completion events as JSON to a webhook URL
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    client: Client,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url`
    pub fn new(url: impl Into<String>) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .user_agent(concat!("snapkeep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        Ok(Self::with_client(url, client))
    }

    /// Create a notifier using a preconfigured client
    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    /// Target URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, event: &CompletionEvent) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .map_err(|e| {
                if e.is_builder() {
                    NotificationError::Encode(e.to_string())
                } else {
                    NotificationError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}
