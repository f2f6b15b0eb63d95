use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::SmtpConfig,
    error::{AppError, Result},
    notifications::{Notification, NotificationSink},
};

pub struct SmtpNotificationSink {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotificationSink {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from = config.from_address.parse::<Mailbox>()
            .map_err(|e| AppError::Notification(format!("Invalid from address: {}", e)))?;

        let mut builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| AppError::Notification(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        }
        .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl NotificationSink for SmtpNotificationSink {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let to = notification.to.parse::<Mailbox>()
            .map_err(|e| AppError::Notification(format!("Invalid recipient {}: {}", notification.to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| AppError::Notification(e.to_string()))?;

        let response = self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Notification(e.to_string()))?;

        tracing::debug!("Mail sent to {}: {:?}", notification.to, response.code());
        Ok(())
    }
}
