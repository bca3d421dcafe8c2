use crate::error::ComicLensError;
use crate::server::extract::ApiPayload;
use crate::server::router::ComicLensState;
use crate::service::explanation::{self, ExplanationRequest, ExplanationResponse};
use crate::upstream::VisionClient;
use axum::{Json, extract::State};

pub(super) async fn request_explanation_handler(
    State(state): State<ComicLensState>,
    ApiPayload(request): ApiPayload<ExplanationRequest>,
) -> Result<Json<ExplanationResponse>, ComicLensError> {
    let vision = VisionClient::new(state.vision_cfg.as_ref(), state.vision_client.clone());
    Ok(Json(
        explanation::request_explanation(&state.db, &vision, request).await?,
    ))
}
