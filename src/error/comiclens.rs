use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use tracing::error;

/// Infrastructure failures. Expected domain outcomes (unknown user, wrong password,
/// missing comic, empty update) never use this type; see the `service` outcome enums.
#[derive(Debug, ThisError)]
pub enum ComicLensError {
    #[error("Error fetching the current XKCD comic.")]
    LatestComicFetch { status: StatusCode },

    #[error("Error fetching XKCD comic number {id}.")]
    ComicFetch { id: u32, status: StatusCode },

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("Upstream response missing header: {0}")]
    MissingUpstreamHeader(&'static str),

    #[error("Unexpected upstream payload: {0}")]
    UpstreamPayload(String),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl ComicLensError {
    /// Message placed in the response envelope.
    ///
    /// Upstream-facing failures describe themselves; store and internal failures
    /// collapse to one generic sentence.
    pub fn public_message(&self) -> String {
        match self {
            ComicLensError::LatestComicFetch { .. }
            | ComicLensError::ComicFetch { .. }
            | ComicLensError::UpstreamStatus(_)
            | ComicLensError::MissingUpstreamHeader(_)
            | ComicLensError::UpstreamPayload(_)
            | ComicLensError::ReqwestError(_)
            | ComicLensError::JsonError(_) => self.to_string(),

            ComicLensError::UrlError(_)
            | ComicLensError::PasswordHash(_)
            | ComicLensError::RactorError(_)
            | ComicLensError::DatabaseError(_)
            | ComicLensError::UnexpectedError(_) => {
                "An internal server error occurred.".to_string()
            }
        }
    }
}

impl IntoResponse for ComicLensError {
    fn into_response(self) -> axum::response::Response {
        error!(error = %self, "Error processing request");
        let body = ApiErrorBody {
            error: self.public_message(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Error envelope returned with every 500.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}
