/*
 * Responsibility
 * - POST /events/{event_id}/bookings (private)
 * - Unknown event → NOT_FOUND, own event → FORBIDDEN, second booking → CONFLICT (unique key)
 * - The guard runs before the path is looked at, so anonymous callers always get UNAUTHENTICATED
 */
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::bookings::BookingResponse,
        extractors::{ApiPath, RequestCtx},
    },
    error::{AppError, Failure},
    state::AppState,
};

pub async fn create_booking(
    ctx: RequestCtx,
    State(state): State<AppState>,
    path: Result<ApiPath<String>, Failure>,
) -> Result<(StatusCode, Json<BookingResponse>), Failure> {
    let claim = ctx.require_identity()?;
    let ApiPath(event_id) = path?;

    // A malformed id cannot name an existing event
    let event_id = Uuid::parse_str(&event_id).map_err(|_| AppError::not_found("event"))?;

    let event = state
        .store
        .get_event(event_id)
        .await?
        .ok_or(AppError::not_found("event"))?;

    if event.owner_id == claim.subject_id {
        return Err(AppError::forbidden("cannot book your own event").into());
    }

    let row = state
        .store
        .create_booking(event.id, &claim.subject_id)
        .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}
