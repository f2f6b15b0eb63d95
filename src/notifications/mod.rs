use async_trait::async_trait;

use crate::{
    domain::{Decision, User},
    error::Result,
};

pub mod smtp;

pub use smtp::SmtpNotificationSink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Message sent to a volunteer once an admin decides their registration.
    pub fn registration_decided(volunteer: &User, decision: Decision) -> Self {
        let (subject, body) = match decision {
            Decision::Approved => (
                "Your Volunteer Registration is Approved",
                format!(
                    "Hi {}, your volunteer registration request has been approved. Welcome aboard!",
                    volunteer.first_name
                ),
            ),
            Decision::Rejected => (
                "Your Volunteer Registration was Declined",
                format!(
                    "Hi {}, unfortunately, your volunteer registration request was declined.",
                    volunteer.first_name
                ),
            ),
        };

        Self {
            to: volunteer.email.clone(),
            subject: subject.to_string(),
            body,
        }
    }
}

/// Somewhere to deliver notifications. Callers treat delivery as best-effort.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Used when no SMTP relay is configured: the dispatch only shows up in the log.
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            to = %notification.to,
            subject = %notification.subject,
            "Notification not delivered (no SMTP relay configured)"
        );
        Ok(())
    }
}
