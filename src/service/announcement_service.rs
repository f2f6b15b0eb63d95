use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::{AnnouncementRepository, EventRepository},
};

const EVERYTHING: &[Visibility] = &[Visibility::Public, Visibility::Registered, Visibility::Private];
const NON_PRIVATE: &[Visibility] = &[Visibility::Public, Visibility::Registered];
const REGISTERED_ONLY: &[Visibility] = &[Visibility::Registered];
const PRIVATE_ONLY: &[Visibility] = &[Visibility::Private];

/// Visibilities a caller may see on the announcement listing.
///
/// `role` is `None` for anonymous callers. Non-admins never see private
/// announcements and asking for them is `Forbidden`.
pub fn visible_set(role: Option<Role>, filter: AnnouncementFilter) -> Result<&'static [Visibility]> {
    match (role, filter) {
        (Some(Role::Admin), AnnouncementFilter::All) => Ok(EVERYTHING),
        (Some(Role::Admin), AnnouncementFilter::Registered) => Ok(REGISTERED_ONLY),
        (Some(Role::Admin), AnnouncementFilter::Private) => Ok(PRIVATE_ONLY),
        (_, AnnouncementFilter::All) => Ok(NON_PRIVATE),
        (_, AnnouncementFilter::Registered) => Ok(REGISTERED_ONLY),
        (_, AnnouncementFilter::Private) => Err(AppError::Forbidden("Access denied".to_string())),
    }
}

/// Visibilities a caller may see on a single event's announcements.
pub fn event_visible_set(role: Option<Role>) -> &'static [Visibility] {
    match role {
        Some(Role::Admin) => EVERYTHING,
        _ => NON_PRIVATE,
    }
}

pub struct AnnouncementService {
    announcements: Arc<dyn AnnouncementRepository>,
    events: Arc<dyn EventRepository>,
}

impl AnnouncementService {
    pub fn new(
        announcements: Arc<dyn AnnouncementRepository>,
        events: Arc<dyn EventRepository>,
    ) -> Self {
        Self { announcements, events }
    }

    pub async fn list(&self, role: Option<Role>, filter: AnnouncementFilter) -> Result<Vec<AnnouncementWithEvent>> {
        let visibilities = visible_set(role, filter)?;
        self.announcements.list_with_visibility(visibilities).await
    }

    pub async fn list_for_event(&self, role: Option<Role>, event_id: Uuid) -> Result<Vec<Announcement>> {
        self.announcements
            .list_by_event(event_id, event_visible_set(role))
            .await
    }

    pub async fn create(&self, announcement: NewAnnouncement) -> Result<Announcement> {
        if self.events.find_by_id(announcement.event_id).await?.is_none() {
            return Err(AppError::NotFound("Event not found".to_string()));
        }

        self.announcements.create(announcement).await
    }

    pub async fn update(&self, id: Uuid, update: AnnouncementUpdate) -> Result<Announcement> {
        self.announcements.update(id, update).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.announcements.delete(id).await
    }
}
