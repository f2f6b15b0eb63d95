use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::AuthService,
    config::BootstrapAdminConfig,
    domain::*,
    error::{AppError, Result},
    repository::UserRepository,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Emails are stored and looked up trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
    auth_service: Arc<AuthService>,
}

/// Fields accepted by self-registration. Accounts created this way are
/// always volunteers.
#[derive(Debug, Clone)]
pub struct Signup {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, auth_service: Arc<AuthService>) -> Self {
        Self { repo, auth_service }
    }

    pub async fn register(&self, signup: Signup) -> Result<User> {
        self.create_with_role(signup, Role::Volunteer).await
    }

    async fn create_with_role(&self, signup: Signup, role: Role) -> Result<User> {
        let email = normalize_email(&signup.email);
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = AuthService::hash_password(&signup.password).await?;

        // The UNIQUE index still catches a concurrent signup with the same email.
        self.repo.create(NewUser {
            first_name: signup.first_name,
            last_name: signup.last_name,
            email,
            phone: signup.phone,
            role,
            password_hash,
        }).await
    }

    /// Checks credentials and returns a bearer token with the user.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User)> {
        let user = self.repo.find_by_email(&normalize_email(email)).await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_hash = self.repo.find_password_hash(user.id).await?
            .ok_or(AppError::InvalidCredentials)?;

        if !AuthService::verify_password(password, &password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        if user.status != UserStatus::Active {
            return Err(AppError::Forbidden("Account is not active".to_string()));
        }

        let token = self.auth_service.issue_token(&user)?;
        Ok((token, user))
    }

    pub async fn profile(&self, id: Uuid) -> Result<User> {
        self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(&self, id: Uuid, update: UpdateProfileRequest) -> Result<User> {
        self.repo.update_profile(id, update).await
    }

    pub async fn change_password(&self, id: Uuid, old_password: &str, new_password: &str) -> Result<()> {
        let current_hash = self.repo.find_password_hash(id).await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !AuthService::verify_password(old_password, &current_hash).await? {
            return Err(AppError::BadRequest("Old password is incorrect".to_string()));
        }

        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters", MIN_PASSWORD_LENGTH
            )));
        }

        let new_hash = AuthService::hash_password(new_password).await?;
        self.repo.update_password(id, &new_hash).await
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.repo.list().await
    }

    pub async fn set_status(&self, id: Uuid, status: UserStatus) -> Result<User> {
        let user = self.repo.update_status(id, status).await?;
        tracing::info!("User {} status set to {}", user.id, status.as_str());
        Ok(user)
    }

    /// Creates the configured admin account unless its email already exists.
    pub async fn ensure_admin(&self, config: &BootstrapAdminConfig) -> Result<Option<User>> {
        if self.repo.find_by_email(&normalize_email(&config.email)).await?.is_some() {
            return Ok(None);
        }

        let admin = self.create_with_role(
            Signup {
                first_name: config.first_name.clone(),
                last_name: config.last_name.clone(),
                email: config.email.clone(),
                password: config.password.clone(),
                phone: None,
            },
            Role::Admin,
        ).await?;

        tracing::info!("Created bootstrap admin {}", admin.email);
        Ok(Some(admin))
    }
}
