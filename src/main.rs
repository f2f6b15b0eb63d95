use std::{str::FromStr, sync::Arc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use volunteer_portal::{
    api,
    auth::AuthService,
    config::{Settings, DEFAULT_JWT_SECRET},
    notification_sink,
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volunteer_portal=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    if settings.auth.jwt_secret == DEFAULT_JWT_SECRET {
        tracing::warn!("Using the default JWT secret; set VPORTAL__AUTH__JWT_SECRET");
    }

    tracing::info!("Starting Volunteer Portal on {}:{}", settings.server.host, settings.server.port);

    // Initialize database; cascades rely on foreign keys being on
    let connect_options = SqliteConnectOptions::from_str(&settings.database.url)?
        .foreign_keys(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect_with(connect_options)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let auth_service = Arc::new(AuthService::new(
        &settings.auth.jwt_secret,
        settings.auth.token_expiry_hours,
    ));

    let notifier = notification_sink(&settings)?;

    let service_context = Arc::new(ServiceContext::new(
        db_pool.clone(),
        auth_service,
        notifier,
    ));

    if let Some(admin) = &settings.bootstrap_admin {
        service_context.user_service.ensure_admin(admin).await?;
    }

    let app = api::create_app(service_context);

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on http://{}:{}", settings.server.host, settings.server.port);

    axum::serve(listener, app).await?;

    Ok(())
}
