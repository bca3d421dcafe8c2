use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored as upper-case TEXT (`ADMIN`, `SUBSCRIBER`, `GUEST`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Subscriber,
    Guest,
}

/// Full account row, hash included. Never serialize this into a response;
/// map it to a public profile first.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbUser {
    pub id: String,
    pub email: String,
    pub hashed_password: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Preferences row joined with its tag names (sorted).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbUserPreferences {
    pub id: String,
    pub user_id: String,
    pub exclude_nsfw: bool,
    pub preferred_tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbComic {
    pub id: String,
    pub title: String,
    pub img_url: String,
    pub pub_date: Option<NaiveDate>,
    pub is_nsfw: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbExplanationRequest {
    pub id: i64,
    pub comic_id: String,
    pub request_id: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}
