use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Volunteer Portal API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Volunteer registration and event announcements",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "auth": "/api/auth",
            "events": "/api/events",
            "registrations": "/api/registrations",
            "announcements": "/api/announcements",
            "users": "/api/users"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
