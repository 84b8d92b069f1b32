/*
 * Responsibility
 * - POST /users (public sign-up)
 * - DTO validation → store; duplicate email surfaces as CONFLICT through the classifier
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::users::{CreateUserRequest, UserResponse},
        extractors::ApiJson,
    },
    error::Failure,
    state::AppState,
};

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), Failure> {
    let user = req.validate()?;
    let row = state.store.create_user(user).await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}
