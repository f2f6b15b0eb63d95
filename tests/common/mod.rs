#![allow(dead_code)]

use std::{str::FromStr, sync::{Arc, Mutex}};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tower::ServiceExt;

use volunteer_portal::{
    api,
    auth::AuthService,
    config::BootstrapAdminConfig,
    domain::User,
    error::{AppError, Result},
    notifications::{Notification, NotificationSink},
    service::{user_service::Signup, ServiceContext},
};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Keeps every notification it is handed.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Fails every delivery, like an unreachable relay.
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    async fn send(&self, _notification: &Notification) -> Result<()> {
        Err(AppError::Notification("connection refused".to_string()))
    }
}

/// In-memory database with migrations applied. One connection, kept open,
/// so every query sees the same database.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

/// File-backed database shared by several connections, for tests that need
/// writes to really overlap. The caller removes `path` when done.
pub async fn file_pool(max_connections: u32) -> anyhow::Result<(SqlitePool, std::path::PathBuf)> {
    let path = std::env::temp_dir().join(format!("volunteer-portal-{}.db", uuid::Uuid::new_v4()));
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(10));
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .min_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok((pool, path))
}

pub fn remove_database(path: &std::path::Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

pub struct TestApp {
    pub pool: SqlitePool,
    pub context: Arc<ServiceContext>,
    pub sink: Arc<RecordingSink>,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        let pool = test_pool().await?;
        let sink = Arc::new(RecordingSink::default());
        let context = Arc::new(ServiceContext::new(
            pool.clone(),
            Arc::new(AuthService::new(TEST_SECRET, 1)),
            sink.clone(),
        ));
        let router = api::create_app(context.clone());

        Ok(Self { pool, context, sink, router })
    }

    pub async fn with_sink(sink: Arc<dyn NotificationSink>) -> anyhow::Result<Arc<ServiceContext>> {
        let pool = test_pool().await?;
        Ok(Arc::new(ServiceContext::new(
            pool,
            Arc::new(AuthService::new(TEST_SECRET, 1)),
            sink,
        )))
    }

    pub async fn volunteer(&self, email: &str) -> anyhow::Result<(User, String)> {
        create_volunteer(&self.context, email).await
    }

    pub async fn admin(&self, email: &str) -> anyhow::Result<(User, String)> {
        let admin = self.context.user_service
            .ensure_admin(&BootstrapAdminConfig {
                email: email.to_string(),
                password: "admin-password".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Admin".to_string(),
            })
            .await?
            .expect("admin email should be unused");
        let token = self.context.auth_service.issue_token(&admin)?;
        Ok((admin, token))
    }

    /// Sends a request through the router and decodes the JSON body
    /// (`Value::Null` when empty or not JSON).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Ok((status, value))
    }
}

pub async fn create_volunteer(context: &ServiceContext, email: &str) -> anyhow::Result<(User, String)> {
    let user = context.user_service
        .register(Signup {
            first_name: "Vera".to_string(),
            last_name: "Volunteer".to_string(),
            email: email.to_string(),
            password: "volunteer-password".to_string(),
            phone: None,
        })
        .await?;
    let token = context.auth_service.issue_token(&user)?;
    Ok((user, token))
}

pub async fn create_event(
    context: &ServiceContext,
    title: &str,
    days_from_now: i64,
) -> anyhow::Result<volunteer_portal::domain::Event> {
    use chrono::{Duration, Utc};
    use volunteer_portal::domain::{EventInput, EventStatus};

    let start = Utc::now() + Duration::days(days_from_now);
    let event = context.event_repo
        .create(EventInput {
            title: title.to_string(),
            description: Some(format!("{} description", title)),
            location: Some("Riverside Park".to_string()),
            start_date: start,
            end_date: start + Duration::hours(3),
            status: EventStatus::Upcoming,
        })
        .await?;
    Ok(event)
}
