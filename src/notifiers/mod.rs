//! Notification channels
//!
//! A [`Notifier`] delivers a subject/message pair over one channel. Failures are reported as
//! [`NotifyError`] values and are never fatal; the dispatcher logs them and moves on.

pub mod email;
pub mod sms;
pub mod webhook;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::config::NotifiersConfig;

pub use email::EmailNotifier;
pub use sms::SmsNotifier;
pub use webhook::WebhookNotifier;

/// Timeout of a single HTTP request made by a notifier
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Create an HTTP client whose requests give up after `timeout`
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to build HTTP client")
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build email: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("notification timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name used in logs and dispatch reports
    fn name(&self) -> &str;

    async fn send(&self, subject: &str, message: &str) -> Result<(), NotifyError>;
}

/// Build every notifier that is configured
pub fn from_config(config: &NotifiersConfig) -> Vec<Arc<dyn Notifier>> {
    let mut notifiers: Vec<Arc<dyn Notifier>> = vec![];

    if let Some(email) = &config.email {
        notifiers.push(Arc::new(EmailNotifier::new(email.clone())));
    }

    if let Some(sms) = &config.sms {
        notifiers.push(Arc::new(SmsNotifier::new(sms.clone())));
    }

    for webhook in &config.webhooks {
        notifiers.push(Arc::new(WebhookNotifier::new(webhook.clone())));
    }

    notifiers
}
