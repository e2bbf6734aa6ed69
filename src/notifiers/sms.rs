//! SMS notifications via the Twilio Messages API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, instrument};

use crate::config::SmsConfig;

use super::{Notifier, NotifyError, REQUEST_TIMEOUT, http_client};

pub struct SmsNotifier {
    client: Client,
    config: SmsConfig,
}

impl SmsNotifier {
    pub fn new(config: SmsConfig) -> Self {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    /// Like [`Self::new`], with a custom request timeout
    pub fn with_timeout(config: SmsConfig, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            config,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn name(&self) -> &str {
        "sms"
    }

    // SMS has no subject line, the message already carries the alert headline
    #[instrument(skip(self, _subject, message), fields(to = %self.config.to_number))]
    async fn send(&self, _subject: &str, message: &str) -> Result<(), NotifyError> {
        let params = [
            ("To", self.config.to_number.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", message),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
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

        info!("SMS alert sent: {message}");
        Ok(())
    }
}
