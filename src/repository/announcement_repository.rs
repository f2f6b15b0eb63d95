use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Announcement, AnnouncementUpdate, AnnouncementWithEvent, NewAnnouncement, Visibility},
    error::{AppError, Result},
    repository::{parse_id, utc, AnnouncementRepository},
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    event_id: String,
    title: String,
    content: String,
    visibility: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct AnnouncementWithEventRow {
    #[sqlx(flatten)]
    announcement: AnnouncementRow,
    event_title: Option<String>,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
        Ok(Announcement {
            id: parse_id(&row.id)?,
            event_id: parse_id(&row.event_id)?,
            title: row.title,
            content: row.content,
            visibility: row.visibility.parse::<Visibility>()
                .map_err(|_| AppError::Database(format!("Invalid visibility: {}", row.visibility)))?,
            created_at: utc(row.created_at),
            updated_at: utc(row.updated_at),
        })
    }

    /// Appends `IN (?, ?, ...)` for the given visibilities.
    fn push_visibility_in(builder: &mut QueryBuilder<'_, Sqlite>, visibilities: &[Visibility]) {
        builder.push(" IN (");
        let mut separated = builder.separated(", ");
        for visibility in visibilities {
            separated.push_bind(visibility.as_str());
        }
        separated.push_unseparated(")");
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, announcement: NewAnnouncement) -> Result<Announcement> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, event_id, title, content, visibility, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(announcement.event_id.to_string())
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(announcement.visibility.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, event_id, title, content, visibility, created_at, updated_at
            FROM announcements
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_announcement).transpose()
    }

    async fn list_with_visibility(&self, visibilities: &[Visibility]) -> Result<Vec<AnnouncementWithEvent>> {
        if visibilities.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT a.id, a.event_id, a.title, a.content, a.visibility,
                   a.created_at, a.updated_at, e.title AS event_title
            FROM announcements a
            LEFT JOIN events e ON e.id = a.event_id
            WHERE a.visibility"#
        );
        Self::push_visibility_in(&mut builder, visibilities);
        builder.push(" ORDER BY a.created_at DESC, a.rowid DESC");

        let rows = builder
            .build_query_as::<AnnouncementWithEventRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(AnnouncementWithEvent {
                    announcement: Self::row_to_announcement(row.announcement)?,
                    event_title: row.event_title,
                })
            })
            .collect()
    }

    async fn list_by_event(&self, event_id: Uuid, visibilities: &[Visibility]) -> Result<Vec<Announcement>> {
        if visibilities.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT id, event_id, title, content, visibility, created_at, updated_at
            FROM announcements
            WHERE event_id = "#
        );
        builder.push_bind(event_id.to_string());
        builder.push(" AND visibility");
        Self::push_visibility_in(&mut builder, visibilities);
        builder.push(" ORDER BY created_at DESC, rowid DESC");

        let rows = builder
            .build_query_as::<AnnouncementRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(Self::row_to_announcement)
            .collect()
    }

    async fn update(&self, id: Uuid, update: AnnouncementUpdate) -> Result<Announcement> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE announcements
            SET title = ?, content = ?, visibility = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&update.title)
        .bind(&update.content)
        .bind(update.visibility.as_str())
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Announcement not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated announcement".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Announcement not found".to_string()));
        }

        Ok(())
    }
}
