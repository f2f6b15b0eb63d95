pub mod user_service;
pub mod registration_service;
pub mod announcement_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::repository::*;
use crate::auth::AuthService;
use crate::notifications::NotificationSink;
use user_service::UserService;
use registration_service::RegistrationService;
use announcement_service::AnnouncementService;

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub registration_service: Arc<RegistrationService>,
    pub announcement_service: Arc<AnnouncementService>,
}

impl ServiceContext {
    pub fn new(
        db_pool: SqlitePool,
        auth_service: Arc<AuthService>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(db_pool.clone()));
        let event_repo: Arc<dyn EventRepository> = Arc::new(SqliteEventRepository::new(db_pool.clone()));
        let registration_repo: Arc<dyn RegistrationRepository> =
            Arc::new(SqliteRegistrationRepository::new(db_pool.clone()));
        let announcement_repo: Arc<dyn AnnouncementRepository> =
            Arc::new(SqliteAnnouncementRepository::new(db_pool));

        let user_service = Arc::new(UserService::new(user_repo.clone(), auth_service.clone()));
        let registration_service = Arc::new(RegistrationService::new(
            registration_repo.clone(),
            event_repo.clone(),
            user_repo.clone(),
            notifier,
        ));
        let announcement_service = Arc::new(AnnouncementService::new(
            announcement_repo,
            event_repo.clone(),
        ));

        Self {
            user_repo,
            event_repo,
            registration_repo,
            auth_service,
            user_service,
            registration_service,
            announcement_service,
        }
    }
}
