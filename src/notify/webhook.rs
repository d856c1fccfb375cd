use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::traits::{Notice, Notifier};

#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub event: &'static str,
    pub level: &'static str,
    pub message: &'a str,
    pub timestamp: i64,
}

/// POSTs each notice as JSON to an external endpoint without waiting for the
/// result.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(3))
            .build()
            .unwrap_or_default();

        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notice: &Notice) {
        let payload = WebhookPayload {
            event: "notice",
            level: notice.level.as_str(),
            message: &notice.message,
            timestamp: notice.timestamp,
        };
        let body = match serde_json::to_value(&payload) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to encode webhook payload: {}", e);
                return;
            }
        };

        // Non-blocking send - spawn task and don't wait
        let client = self.client.clone();
        let url = self.url.clone();
        tokio::spawn(async move {
            match client.post(&url).json(&body).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!("Webhook sent: {}", url);
                }
                Ok(response) => {
                    tracing::warn!("Webhook failed: status={}", response.status());
                }
                Err(e) => {
                    tracing::debug!("Webhook error (ignored): {}", e);
                }
            }
        });
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}
