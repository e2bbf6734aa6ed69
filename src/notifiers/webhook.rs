//! Generic JSON webhook notifications

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::json;
use tracing::{info, instrument};

use crate::config::WebhookConfig;

use super::{Notifier, NotifyError, REQUEST_TIMEOUT, http_client};

pub struct WebhookNotifier {
    client: Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Self {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    /// Like [`Self::new`], with a custom request timeout
    pub fn with_timeout(config: WebhookConfig, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            config,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    #[instrument(skip(self, message), fields(url = %self.config.url))]
    async fn send(&self, subject: &str, message: &str) -> Result<(), NotifyError> {
        let payload = json!({
            "subject": subject,
            "message": message,
            "timestamp": Utc::now().to_rfc3339()
        });

        let response = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("successfully sent webhook alert");
        Ok(())
    }
}
