use crate::error::ComicLensError;
use crate::server::extract::ApiPayload;
use crate::server::router::ComicLensState;
use crate::service::users::{
    self, AuthenticateUserRequest, AuthenticateUserResponse, RegisterUserRequest,
    RegisterUserResponse, UpdatePreferencesRequest, UpdatePreferencesResponse,
};
use axum::{Json, extract::State};

pub(super) async fn register_handler(
    State(state): State<ComicLensState>,
    ApiPayload(request): ApiPayload<RegisterUserRequest>,
) -> Result<Json<RegisterUserResponse>, ComicLensError> {
    Ok(Json(users::register_user(&state.db, request).await?))
}

pub(super) async fn authenticate_handler(
    State(state): State<ComicLensState>,
    ApiPayload(request): ApiPayload<AuthenticateUserRequest>,
) -> Result<Json<AuthenticateUserResponse>, ComicLensError> {
    let outcome = users::authenticate_user(&state.db, request).await?;
    Ok(Json(outcome.into()))
}

pub(super) async fn update_preferences_handler(
    State(state): State<ComicLensState>,
    ApiPayload(request): ApiPayload<UpdatePreferencesRequest>,
) -> Result<Json<UpdatePreferencesResponse>, ComicLensError> {
    Ok(Json(users::update_preferences(&state.db, request).await?))
}
