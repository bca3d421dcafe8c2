use crate::server::router::ComicLensState;
use axum::{
    Router,
    routing::{post, put},
};

pub mod handlers;

pub fn router() -> Router<ComicLensState> {
    Router::new()
        .route("/user/register", post(handlers::register_handler))
        .route("/user/authenticate", post(handlers::authenticate_handler))
        .route(
            "/user/preferences/update",
            put(handlers::update_preferences_handler),
        )
}
