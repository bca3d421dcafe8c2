use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::password::{hash_password_blocking, verify_password_blocking};
use crate::db::{DbActorHandle, DbUser, PreferencesCreate, PreferencesUpsert, UserCreate, UserRole};
use crate::error::ComicLensError;

pub const USER_REGISTERED: &str = "User registered successfully.";
pub const USER_NOT_FOUND: &str = "User not found.";
pub const INCORRECT_PASSWORD: &str = "Incorrect password.";
pub const AUTHENTICATION_SUCCESSFUL: &str = "Authentication successful.";
pub const PREFERENCES_UPDATED: &str = "User preferences updated successfully.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesInput {
    #[serde(rename = "excludeNSFW")]
    pub exclude_nsfw: bool,
    #[serde(default, rename = "preferredTags")]
    pub preferred_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    /// Without preferences the account starts with no preferences row.
    #[serde(default)]
    pub preferences: Option<PreferencesInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserResponse {
    pub user_id: String,
    pub message: String,
}

/// Hashes the password and creates the account, its preferences and tag
/// links in one store operation. Duplicate emails fail on the unique index.
pub async fn register_user(
    db: &DbActorHandle,
    request: RegisterUserRequest,
) -> Result<RegisterUserResponse, ComicLensError> {
    let hashed_password = hash_password_blocking(request.password).await?;

    let user_id = db
        .create_user(UserCreate {
            email: request.email,
            hashed_password,
            role: UserRole::Subscriber,
            preferences: request.preferences.map(|p| PreferencesCreate {
                exclude_nsfw: p.exclude_nsfw,
                preferred_tags: p.preferred_tags,
            }),
        })
        .await?;

    info!(user_id = %user_id, "User registered");
    Ok(RegisterUserResponse {
        user_id,
        message: USER_REGISTERED.to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateUserRequest {
    pub email: String,
    pub password: String,
}

/// Public profile. Carries no credential material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub role: UserRole,
}

impl From<DbUser> for PublicUser {
    fn from(user: DbUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            avatar_url: user.avatar_url,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    UserNotFound,
    IncorrectPassword,
    Authenticated(PublicUser),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticateUserResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
}

impl From<AuthOutcome> for AuthenticateUserResponse {
    fn from(outcome: AuthOutcome) -> Self {
        match outcome {
            AuthOutcome::UserNotFound => Self {
                success: false,
                message: USER_NOT_FOUND.to_string(),
                user: None,
            },
            AuthOutcome::IncorrectPassword => Self {
                success: false,
                message: INCORRECT_PASSWORD.to_string(),
                user: None,
            },
            AuthOutcome::Authenticated(user) => Self {
                success: true,
                message: AUTHENTICATION_SUCCESSFUL.to_string(),
                user: Some(user),
            },
        }
    }
}

pub async fn authenticate_user(
    db: &DbActorHandle,
    request: AuthenticateUserRequest,
) -> Result<AuthOutcome, ComicLensError> {
    let Some(user) = db.get_user_by_email(&request.email).await? else {
        debug!("Authentication for unknown email");
        return Ok(AuthOutcome::UserNotFound);
    };

    if !verify_password_blocking(request.password, user.hashed_password.clone()).await? {
        debug!(user_id = %user.id, "Authentication with incorrect password");
        return Ok(AuthOutcome::IncorrectPassword);
    }

    Ok(AuthOutcome::Authenticated(user.into()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub user_id: String,
    #[serde(
        rename = "excludeNSFW",
        deserialize_with = "crate::utils::serde_bool::bool_or_text"
    )]
    pub exclude_nsfw: bool,
    /// Accepted for compatibility; preference updates do not touch tag links.
    #[serde(default, rename = "preferredTags")]
    pub preferred_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdatePreferencesResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Creates the preferences row on first use, otherwise overwrites the NSFW flag.
/// A single upsert keyed by the unique `user_id`.
pub async fn update_preferences(
    db: &DbActorHandle,
    request: UpdatePreferencesRequest,
) -> Result<UpdatePreferencesResponse, ComicLensError> {
    if !request.preferred_tags.is_empty() {
        debug!(
            user_id = %request.user_id,
            tags = request.preferred_tags.len(),
            "preferredTags ignored by preference update"
        );
    }

    let preferences_id = db
        .upsert_preferences(PreferencesUpsert {
            user_id: request.user_id.clone(),
            exclude_nsfw: request.exclude_nsfw,
        })
        .await?;

    info!(
        user_id = %request.user_id,
        preferences_id = %preferences_id,
        exclude_nsfw = request.exclude_nsfw,
        "User preferences updated"
    );
    Ok(UpdatePreferencesResponse {
        success: true,
        message: Some(PREFERENCES_UPDATED.to_string()),
    })
}
