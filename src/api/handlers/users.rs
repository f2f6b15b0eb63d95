use axum::{
    extract::State,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::extract::{ApiJson, ApiPath};
use crate::{
    api::{handlers::MessageResponse, middleware::auth::CurrentUser, state::AppState},
    domain::{UpdateProfileRequest, User, UserStatus},
    error::Result,
};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<User>> {
    let profile = state.service_context.user_service
        .profile(user.user_id)
        .await?;

    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(dto): ApiJson<UpdateProfileDto>,
) -> Result<Json<UserResponse>> {
    dto.validate()?;

    let updated = state.service_context.user_service
        .update_profile(user.user_id, UpdateProfileRequest {
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone: dto.phone,
        })
        .await?;

    Ok(Json(UserResponse {
        message: "Profile updated successfully".to_string(),
        user: updated,
    }))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    state.service_context.user_service
        .change_password(user.user_id, &req.old_password, &req.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>> {
    let users = state.service_context.user_service.list().await?;
    Ok(Json(users))
}

pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> Result<Json<UserResponse>> {
    let status: UserStatus = req.status.parse()?;

    let user = state.service_context.user_service
        .set_status(id, status)
        .await?;

    Ok(Json(UserResponse {
        message: format!("User status set to {}", status.as_str()),
        user,
    }))
}
