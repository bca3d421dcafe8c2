use crate::server::router::ComicLensState;
use axum::{Router, routing::post};

pub mod handlers;

pub fn router() -> Router<ComicLensState> {
    Router::new().route(
        "/explanation/request",
        post(handlers::request_explanation_handler),
    )
}
