use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::extract::{ApiJson, ApiPath};
use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Application, Registration, RegistrationSummary},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct SubmitRegistrationRequest {
    pub event_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct DecideRegistrationRequest {
    pub registration_status: String,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub message: String,
    pub registration: Registration,
}

pub async fn submit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(req): ApiJson<SubmitRegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>)> {
    let registration = state.service_context.registration_service
        .submit(user.user_id, req.event_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            message: "Registration request sent successfully".to_string(),
            registration,
        }),
    ))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegistrationSummary>>> {
    let registrations = state.service_context.registration_service
        .list_all()
        .await?;

    Ok(Json(registrations))
}

pub async fn mine(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Application>>> {
    let applications = state.service_context.registration_service
        .list_for_user(user.user_id)
        .await?;

    Ok(Json(applications))
}

pub async fn decide(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    Extension(admin): Extension<CurrentUser>,
    ApiJson(req): ApiJson<DecideRegistrationRequest>,
) -> Result<Json<RegistrationResponse>> {
    let registration = state.service_context.registration_service
        .decide(id, &req.registration_status)
        .await?;

    tracing::info!(
        "Admin {} marked registration {} as {}",
        admin.email,
        id,
        registration.registration_status.as_str()
    );

    Ok(Json(RegistrationResponse {
        message: format!(
            "Registration {} successfully",
            registration.registration_status.as_str()
        ),
        registration,
    }))
}
