use crate::error::ComicLensError;
use crate::server::extract::ApiPayload;
use crate::server::router::ComicLensState;
use crate::service::comics::{
    self, ComicMetadataUpdate, RandomComic, UpdateComicMetadataResponse,
};
use crate::upstream::XkcdClient;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{debug, warn};

pub(super) async fn random_comic_handler(
    State(state): State<ComicLensState>,
) -> Result<Json<RandomComic>, ComicLensError> {
    let xkcd = XkcdClient::new(state.xkcd_cfg.as_ref(), state.xkcd_client.clone());
    let comic = comics::fetch_random_comic(&xkcd).await?;

    // Seen comics become editable through the metadata route. Best effort only.
    match state.db.record_comic(comic.to_comic_create()).await {
        Ok(inserted) => debug!(comic_id = comic.comic_id, inserted, "Comic recorded"),
        Err(e) => warn!(comic_id = comic.comic_id, error = %e, "Failed to record comic"),
    }

    Ok(Json(comic))
}

pub(super) async fn update_comic_handler(
    State(state): State<ComicLensState>,
    Path(id): Path<String>,
    ApiPayload(update): ApiPayload<ComicMetadataUpdate>,
) -> Result<Json<UpdateComicMetadataResponse>, ComicLensError> {
    let outcome = comics::update_comic_metadata(&state.db, &id, update).await?;
    Ok(Json(outcome.into()))
}
