use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::api::extract::{ApiJson, ApiPath};
use crate::{
    api::{handlers::MessageResponse, state::AppState},
    domain::{Event, EventInput, RegistrationSummary},
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub message: String,
    pub event: Event,
}

fn validate_event(input: &EventInput) -> Result<()> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if input.end_date < input.start_date {
        return Err(AppError::Validation("End date must not be before start date".to_string()));
    }
    Ok(())
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Event>>> {
    let events = state.service_context.event_repo.list().await?;
    Ok(Json(events))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Event>> {
    let event = state.service_context.event_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(Json(event))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<EventInput>,
) -> Result<(StatusCode, Json<EventResponse>)> {
    validate_event(&input)?;

    let event = state.service_context.event_repo.create(input).await?;
    tracing::info!("Created event {} ({})", event.id, event.title);

    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            message: "Event created successfully".to_string(),
            event,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<EventInput>,
) -> Result<Json<EventResponse>> {
    validate_event(&input)?;

    let event = state.service_context.event_repo.update(id, input).await?;

    Ok(Json(EventResponse {
        message: "Event updated successfully".to_string(),
        event,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>> {
    state.service_context.event_repo.delete(id).await?;
    tracing::info!("Deleted event {}", id);

    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

pub async fn registrations(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<RegistrationSummary>>> {
    let registrations = state.service_context.registration_service
        .list_for_event(id)
        .await?;

    Ok(Json(registrations))
}
