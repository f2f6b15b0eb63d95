use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{Event, EventInput, EventStatus},
    error::{AppError, Result},
    repository::{parse_id, utc, EventRepository},
};

#[derive(FromRow)]
struct EventRow {
    id: String,
    title: String,
    description: Option<String>,
    location: Option<String>,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_event(row: EventRow) -> Result<Event> {
        Ok(Event {
            id: parse_id(&row.id)?,
            title: row.title,
            description: row.description,
            location: row.location,
            start_date: utc(row.start_date),
            end_date: utc(row.end_date),
            status: row.status.parse::<EventStatus>()
                .map_err(|_| AppError::Database(format!("Invalid event status: {}", row.status)))?,
            created_at: utc(row.created_at),
            updated_at: utc(row.updated_at),
        })
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn create(&self, event: EventInput) -> Result<Event> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO events (
                id, title, description, location, start_date, end_date,
                status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start_date.naive_utc())
        .bind(event.end_date.naive_utc())
        .bind(event.status.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created event".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, location, start_date, end_date,
                   status, created_at, updated_at
            FROM events
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_event).transpose()
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, location, start_date, end_date,
                   status, created_at, updated_at
            FROM events
            ORDER BY start_date ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_event)
            .collect()
    }

    async fn update(&self, id: Uuid, event: EventInput) -> Result<Event> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = ?, description = ?, location = ?,
                start_date = ?, end_date = ?, status = ?,
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start_date.naive_utc())
        .bind(event.end_date.naive_utc())
        .bind(event.status.as_str())
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated event".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // Registrations and announcements go with it (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }

        Ok(())
    }
}
