pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::service::ServiceContext;
use middleware::auth::{optional_auth, require_admin, require_auth, require_volunteer};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>) -> Router {
    let app_state = AppState::new(service_context);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        .nest("/api", api_routes(app_state.clone()))

        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes(state.clone()))
        .nest("/events", event_routes(state.clone()))
        .nest("/registrations", registration_routes(state.clone()))
        .nest("/announcements", announcement_routes(state))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

fn user_routes(state: AppState) -> Router<AppState> {
    let authenticated = from_fn_with_state(state.clone(), require_auth);
    let admin = from_fn_with_state(state, require_admin);

    Router::new()
        .route("/", get(handlers::users::list).route_layer(admin.clone()))
        .route(
            "/profile",
            get(handlers::users::profile)
                .put(handlers::users::update_profile)
                .route_layer(authenticated.clone()),
        )
        .route(
            "/change-password",
            put(handlers::users::change_password).route_layer(authenticated),
        )
        .route("/:id/status", put(handlers::users::update_status).route_layer(admin))
}

fn event_routes(state: AppState) -> Router<AppState> {
    let admin = from_fn_with_state(state, require_admin);

    Router::new()
        // Reading the catalog needs no token
        .route("/", get(handlers::events::list))
        .route("/", post(handlers::events::create).route_layer(admin.clone()))
        .route("/:id", get(handlers::events::get))
        .route(
            "/:id",
            put(handlers::events::update)
                .delete(handlers::events::delete)
                .route_layer(admin.clone()),
        )
        .route(
            "/:id/registrations",
            get(handlers::events::registrations).route_layer(admin),
        )
}

fn registration_routes(state: AppState) -> Router<AppState> {
    let volunteer = from_fn_with_state(state.clone(), require_volunteer);
    let authenticated = from_fn_with_state(state.clone(), require_auth);
    let admin = from_fn_with_state(state, require_admin);

    Router::new()
        .route("/", post(handlers::registrations::submit).route_layer(volunteer))
        .route("/", get(handlers::registrations::list).route_layer(admin.clone()))
        .route("/mine", get(handlers::registrations::mine).route_layer(authenticated))
        .route("/:id", put(handlers::registrations::decide).route_layer(admin))
}

fn announcement_routes(state: AppState) -> Router<AppState> {
    let optional = from_fn_with_state(state.clone(), optional_auth);
    let admin = from_fn_with_state(state, require_admin);

    Router::new()
        // Token optional: the caller's role selects the visible set
        .route("/", get(handlers::announcements::list).route_layer(optional.clone()))
        .route("/", post(handlers::announcements::create).route_layer(admin.clone()))
        .route(
            "/event/:event_id",
            get(handlers::announcements::list_for_event).route_layer(optional),
        )
        .route(
            "/:id",
            put(handlers::announcements::update)
                .delete(handlers::announcements::delete)
                .route_layer(admin),
        )
}
