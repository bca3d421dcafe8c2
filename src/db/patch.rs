use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::models::UserRole;

/// Nested account creation: user row, optional preferences, tag links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub hashed_password: String,
    pub role: UserRole,
    pub preferences: Option<PreferencesCreate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesCreate {
    pub exclude_nsfw: bool,
    /// Connect-or-create by name; duplicates collapse to one link.
    pub preferred_tags: Vec<String>,
}

/// Create-or-update of the preferences row keyed by `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesUpsert {
    pub user_id: String,
    pub exclude_nsfw: bool,
}

/// Insert-if-absent comic record; an existing row is left as is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComicCreate {
    pub id: String,
    pub title: String,
    pub img_url: String,
    pub pub_date: Option<NaiveDate>,
    pub is_nsfw: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationCreate {
    pub comic_id: String,
    pub request_id: String,
    pub response: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComicPatch {
    /// `None` => do not change; `Some(v)` => update
    pub title: Option<String>,
    /// `None` => do not change; `Some(v)` => update
    pub img_url: Option<String>,
    pub pub_date: Option<NaiveDate>,
    pub is_nsfw: Option<bool>,
}

impl ComicPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.img_url.is_none()
            && self.pub_date.is_none()
            && self.is_nsfw.is_none()
    }
}

/// Patch envelope: which comic, and what to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComicUpdate {
    pub id: String,
    pub patch: ComicPatch,
}
