pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod notifications;
pub mod repository;
pub mod service;

use std::sync::Arc;

use crate::{
    config::Settings,
    notifications::{LogNotificationSink, NotificationSink, SmtpNotificationSink},
};

/// Picks the SMTP sink when a relay is configured, otherwise logs dispatches.
pub fn notification_sink(settings: &Settings) -> error::Result<Arc<dyn NotificationSink>> {
    match &settings.smtp {
        Some(smtp) => {
            tracing::info!("Email notifications via SMTP relay {}:{}", smtp.host, smtp.port);
            Ok(Arc::new(SmtpNotificationSink::new(smtp)?))
        }
        None => {
            tracing::info!("No SMTP relay configured, notifications will only be logged");
            Ok(Arc::new(LogNotificationSink))
        }
    }
}
