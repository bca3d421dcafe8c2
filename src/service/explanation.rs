use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{DbActorHandle, ExplanationCreate};
use crate::error::ComicLensError;
use crate::upstream::VisionClient;

pub const EXPLANATION_UNAVAILABLE: &str = "Explanation unavailable.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub comic_id: String,
    /// Image URL handed to the vision API.
    pub comic_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplanationResponse {
    pub comic_id: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// Asks the vision API to explain one comic image and appends the result to the
/// explanation log. The log row is written only after a complete upstream reply.
pub async fn request_explanation(
    db: &DbActorHandle,
    vision: &VisionClient<'_>,
    request: ExplanationRequest,
) -> Result<ExplanationResponse, ComicLensError> {
    let reply = vision.explain(&request.comic_url).await?;

    let explanation = reply
        .body
        .explanation
        .unwrap_or_else(|| EXPLANATION_UNAVAILABLE.to_string());

    let row_id = db
        .create_explanation(ExplanationCreate {
            comic_id: request.comic_id.clone(),
            request_id: reply.request_id.clone(),
            response: explanation.clone(),
        })
        .await?;

    info!(
        comic_id = %request.comic_id,
        upstream_request_id = %reply.request_id,
        row_id,
        "Explanation recorded"
    );

    Ok(ExplanationResponse {
        comic_id: request.comic_id,
        explanation,
        additional_info: reply.body.additional_info,
    })
}
