use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub event_id: Uuid,
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Announcement with the title of the event it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementWithEvent {
    #[serde(flatten)]
    pub announcement: Announcement,
    pub event_title: Option<String>,
}

/// Who may read an announcement. The schema CHECK constraint lists exactly
/// these values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Registered,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Registered => "registered",
            Visibility::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "registered" => Ok(Visibility::Registered),
            "private" => Ok(Visibility::Private),
            _ => Err(AppError::BadRequest(format!("Invalid visibility: {}", s))),
        }
    }
}

/// The `filter` query parameter on the announcement listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnouncementFilter {
    #[default]
    All,
    Registered,
    Private,
}

impl FromStr for AnnouncementFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(AnnouncementFilter::All),
            "registered" => Ok(AnnouncementFilter::Registered),
            "private" => Ok(AnnouncementFilter::Private),
            _ => Err(AppError::BadRequest(format!("Invalid filter: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnnouncement {
    pub event_id: Uuid,
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
}

/// Replaces title, content and visibility of an existing announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementUpdate {
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
}
