use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    auth::Claims,
    domain::Role,
    error::{AppError, Result},
};

/// Identity decoded from the bearer token, attached to the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    let claims = state.service_context.auth_service.verify_token(token)?;
    Ok(claims.into())
}

/// Role check for a route's allowed-role set.
pub fn authorize(user: &CurrentUser, allowed: &[Role]) -> Result<()> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Access denied".to_string()))
    }
}

async fn guard(
    state: &AppState,
    allowed: &[Role],
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user = authenticate(state, request.headers())?;
    authorize(&user, allowed)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    guard(&state, &[Role::Volunteer, Role::Admin], request, next).await
}

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    guard(&state, &[Role::Admin], request, next).await
}

pub async fn require_volunteer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    guard(&state, &[Role::Volunteer], request, next).await
}

/// Attaches the caller when a valid token is presented; anonymous and
/// invalid-token requests continue without one.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(user) = authenticate(&state, request.headers()) {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}
