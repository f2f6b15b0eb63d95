use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{Application, Registration, RegistrationStatus, RegistrationSummary},
    error::{is_unique_violation, AppError, Result},
    repository::{parse_id, utc, RegistrationRepository},
};

#[derive(FromRow)]
struct RegistrationRow {
    id: String,
    user_id: String,
    event_id: String,
    registration_status: String,
    registered_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct SummaryRow {
    id: String,
    registration_status: String,
    registered_at: NaiveDateTime,
    user_id: String,
    first_name: String,
    last_name: String,
    event_id: String,
    event_title: String,
}

#[derive(FromRow)]
struct ApplicationRow {
    id: String,
    event_id: String,
    event_title: String,
    start_date: NaiveDateTime,
    registration_status: String,
    registered_at: NaiveDateTime,
}

pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn parse_status(s: &str) -> Result<RegistrationStatus> {
        s.parse::<RegistrationStatus>()
            .map_err(|_| AppError::Database(format!("Invalid registration status: {}", s)))
    }

    fn row_to_registration(row: RegistrationRow) -> Result<Registration> {
        Ok(Registration {
            id: parse_id(&row.id)?,
            user_id: parse_id(&row.user_id)?,
            event_id: parse_id(&row.event_id)?,
            registration_status: Self::parse_status(&row.registration_status)?,
            registered_at: utc(row.registered_at),
            updated_at: utc(row.updated_at),
        })
    }

    fn row_to_summary(row: SummaryRow) -> Result<RegistrationSummary> {
        Ok(RegistrationSummary {
            id: parse_id(&row.id)?,
            registration_status: Self::parse_status(&row.registration_status)?,
            registered_at: utc(row.registered_at),
            user_id: parse_id(&row.user_id)?,
            first_name: row.first_name,
            last_name: row.last_name,
            event_id: parse_id(&row.event_id)?,
            event_title: row.event_title,
        })
    }

    fn row_to_application(row: ApplicationRow) -> Result<Application> {
        Ok(Application {
            id: parse_id(&row.id)?,
            event_id: parse_id(&row.event_id)?,
            event_title: row.event_title,
            start_date: utc(row.start_date),
            registration_status: Self::parse_status(&row.registration_status)?,
            registered_at: utc(row.registered_at),
        })
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepository {
    async fn create(&self, user_id: Uuid, event_id: Uuid) -> Result<Registration> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        // UNIQUE(user_id, event_id) decides duplicates, so two concurrent
        // submissions cannot both land.
        sqlx::query(
            r#"
            INSERT INTO registrations (
                id, user_id, event_id, registration_status, registered_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(event_id.to_string())
        .bind(RegistrationStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateRegistration
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created registration".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, user_id, event_id, registration_status, registered_at, updated_at
            FROM registrations
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_registration).transpose()
    }

    async fn update_status(&self, id: Uuid, status: RegistrationStatus) -> Result<Registration> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            "UPDATE registrations SET registration_status = ?, updated_at = ? WHERE id = ?"
        )
        .bind(status.as_str())
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Registration not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated registration".to_string())
        })
    }

    async fn list_all(&self) -> Result<Vec<RegistrationSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT r.id, r.registration_status, r.registered_at,
                   u.id AS user_id, u.first_name, u.last_name,
                   e.id AS event_id, e.title AS event_title
            FROM registrations r
            JOIN users u ON r.user_id = u.id
            JOIN events e ON r.event_id = e.id
            ORDER BY r.registered_at DESC, r.rowid DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_summary)
            .collect()
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT r.id, e.id AS event_id, e.title AS event_title, e.start_date,
                   r.registration_status, r.registered_at
            FROM registrations r
            JOIN events e ON r.event_id = e.id
            WHERE r.user_id = ?
            ORDER BY r.registered_at DESC, r.rowid DESC
            "#
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_application)
            .collect()
    }

    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<RegistrationSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT r.id, r.registration_status, r.registered_at,
                   u.id AS user_id, u.first_name, u.last_name,
                   e.id AS event_id, e.title AS event_title
            FROM registrations r
            JOIN users u ON r.user_id = u.id
            JOIN events e ON r.event_id = e.id
            WHERE r.event_id = ?
            ORDER BY r.registered_at DESC, r.rowid DESC
            "#
        )
        .bind(event_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_summary)
            .collect()
    }
}
