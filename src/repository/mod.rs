use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;
use crate::domain::*;
use crate::error::{AppError, Result};

pub mod user_repository;
pub mod event_repository;
pub mod registration_repository;
pub mod announcement_repository;

pub use user_repository::SqliteUserRepository;
pub use event_repository::SqliteEventRepository;
pub use registration_repository::SqliteRegistrationRepository;
pub use announcement_repository::SqliteAnnouncementRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateEmail` when the address is taken.
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_password_hash(&self, id: Uuid) -> Result<Option<String>>;
    async fn list(&self) -> Result<Vec<User>>;
    async fn update_profile(&self, id: Uuid, update: UpdateProfileRequest) -> Result<User>;
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()>;
    async fn update_status(&self, id: Uuid, status: UserStatus) -> Result<User>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: EventInput) -> Result<Event>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>>;
    /// All events, earliest start first.
    async fn list(&self) -> Result<Vec<Event>>;
    async fn update(&self, id: Uuid, event: EventInput) -> Result<Event>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Inserts a `pending` row. Fails with `DuplicateRegistration` when the
    /// (user, event) pair already has one, whatever its status.
    async fn create(&self, user_id: Uuid, event_id: Uuid) -> Result<Registration>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>>;
    async fn update_status(&self, id: Uuid, status: RegistrationStatus) -> Result<Registration>;
    async fn list_all(&self) -> Result<Vec<RegistrationSummary>>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Application>>;
    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<RegistrationSummary>>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: NewAnnouncement) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    /// Announcements whose visibility is in `visibilities`, newest first.
    async fn list_with_visibility(&self, visibilities: &[Visibility]) -> Result<Vec<AnnouncementWithEvent>>;
    async fn list_by_event(&self, event_id: Uuid, visibilities: &[Visibility]) -> Result<Vec<Announcement>>;
    async fn update(&self, id: Uuid, update: AnnouncementUpdate) -> Result<Announcement>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

fn parse_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| AppError::Database(e.to_string()))
}

fn utc(dt: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(dt, Utc)
}
