use crate::server::router::ComicLensState;
use axum::{
    Router,
    routing::{get, post},
};

pub mod handlers;

pub fn router() -> Router<ComicLensState> {
    Router::new()
        .route("/comics/random", get(handlers::random_comic_handler))
        .route("/comics/{id}/update", post(handlers::update_comic_handler))
}
