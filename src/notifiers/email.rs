//! Email notifications via SMTP (STARTTLS)

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{debug, info, instrument};

use crate::config::EmailConfig;

use super::{Notifier, NotifyError};

pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, subject: &str, message: &str) -> Result<Message, NotifyError> {
        let from: Mailbox = self.config.address.parse()?;
        let to: Mailbox = self.config.to.parse()?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.to_string())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    #[instrument(skip(self, message), fields(to = %self.config.to))]
    async fn send(&self, subject: &str, message: &str) -> Result<(), NotifyError> {
        let email = self.build_message(subject, message)?;

        let mut transport =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)?
                .port(self.config.smtp_port);

        if let Some(password) = &self.config.password {
            transport = transport.credentials(Credentials::new(
                self.config.address.clone(),
                password.clone(),
            ));
        }

        debug!("connecting to SMTP server {}", self.config.smtp_server);
        transport.build().send(email).await?;

        info!("email alert sent: {subject}");
        Ok(())
    }
}
