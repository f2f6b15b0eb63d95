use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::{
    api::{handlers::MessageResponse, middleware::auth::CurrentUser, state::AppState},
    domain::{
        Announcement, AnnouncementFilter, AnnouncementUpdate, AnnouncementWithEvent,
        NewAnnouncement, Visibility,
    },
    error::Result,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    pub event_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default)]
    pub visibility: Visibility,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAnnouncementRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub visibility: Visibility,
}

#[derive(Debug, Deserialize)]
pub struct ListAnnouncementsQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnnouncementResponse {
    pub message: String,
    pub announcement: Announcement,
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListAnnouncementsQuery>,
    user: Option<Extension<CurrentUser>>,
) -> Result<Json<Vec<AnnouncementWithEvent>>> {
    let filter = match params.filter.as_deref() {
        Some(raw) => raw.parse::<AnnouncementFilter>()?,
        None => AnnouncementFilter::All,
    };
    let role = user.map(|Extension(u)| u.role);

    let announcements = state.service_context.announcement_service
        .list(role, filter)
        .await?;

    Ok(Json(announcements))
}

pub async fn list_for_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<Uuid>,
    user: Option<Extension<CurrentUser>>,
) -> Result<Json<Vec<Announcement>>> {
    let role = user.map(|Extension(u)| u.role);

    let announcements = state.service_context.announcement_service
        .list_for_event(role, event_id)
        .await?;

    Ok(Json(announcements))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<AnnouncementResponse>)> {
    request.validate()?;

    let announcement = state.service_context.announcement_service
        .create(NewAnnouncement {
            event_id: request.event_id,
            title: request.title,
            content: request.content,
            visibility: request.visibility,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AnnouncementResponse {
            message: "Announcement created successfully".to_string(),
            announcement,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateAnnouncementRequest>,
) -> Result<Json<AnnouncementResponse>> {
    request.validate()?;

    let announcement = state.service_context.announcement_service
        .update(id, AnnouncementUpdate {
            title: request.title,
            content: request.content,
            visibility: request.visibility,
        })
        .await?;

    Ok(Json(AnnouncementResponse {
        message: "Announcement updated successfully".to_string(),
        announcement,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>> {
    state.service_context.announcement_service.delete(id).await?;

    Ok(Json(MessageResponse::new("Announcement deleted successfully")))
}
