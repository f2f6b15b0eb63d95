use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    notifications::{Notification, NotificationSink},
    repository::{EventRepository, RegistrationRepository, UserRepository},
};

/// Volunteer registration requests and the admin decisions on them.
///
/// A registration starts `pending`; an admin moves it to `approved` or
/// `rejected`. Deciding again overwrites the previous outcome. The volunteer
/// is emailed after every decision, but delivery never affects the result.
pub struct RegistrationService {
    registrations: Arc<dyn RegistrationRepository>,
    events: Arc<dyn EventRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn NotificationSink>,
}

impl RegistrationService {
    pub fn new(
        registrations: Arc<dyn RegistrationRepository>,
        events: Arc<dyn EventRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self { registrations, events, users, notifier }
    }

    pub async fn submit(&self, user_id: Uuid, event_id: Uuid) -> Result<Registration> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(AppError::NotFound("Event not found".to_string()));
        }

        let registration = self.registrations.create(user_id, event_id).await?;
        tracing::info!("User {} requested registration for event {}", user_id, event_id);

        Ok(registration)
    }

    /// Records an admin decision. `outcome` must be `approved` or `rejected`.
    pub async fn decide(&self, id: Uuid, outcome: &str) -> Result<Registration> {
        let decision: Decision = outcome.parse()?;

        let existing = self.registrations.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

        if existing.registration_status.is_terminal() {
            tracing::info!(
                "Registration {} already {}, overwriting with {}",
                id,
                existing.registration_status.as_str(),
                decision.as_status().as_str()
            );
        }

        let updated = self.registrations
            .update_status(id, decision.as_status())
            .await?;

        self.notify_decision(&updated, decision).await;

        Ok(updated)
    }

    async fn notify_decision(&self, registration: &Registration, decision: Decision) {
        let volunteer = match self.users.find_by_id(registration.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(
                    "No user {} for registration {}, skipping notification",
                    registration.user_id,
                    registration.id
                );
                return;
            }
            Err(e) => {
                tracing::error!("Failed to look up volunteer for notification: {:?}", e);
                return;
            }
        };

        let notification = Notification::registration_decided(&volunteer, decision);
        match self.notifier.send(&notification).await {
            Ok(_) => {
                tracing::debug!(
                    "Notification sink {} delivered decision for registration {}",
                    self.notifier.name(),
                    registration.id
                );
            }
            Err(e) => {
                tracing::error!(
                    "Notification sink {} failed for registration {}: {:?}",
                    self.notifier.name(),
                    registration.id,
                    e
                );
            }
        }
    }

    pub async fn list_all(&self) -> Result<Vec<RegistrationSummary>> {
        self.registrations.list_all().await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Application>> {
        self.registrations.list_by_user(user_id).await
    }

    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<RegistrationSummary>> {
        self.registrations.list_by_event(event_id).await
    }
}
