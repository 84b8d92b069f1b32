/*
 * Responsibility
 * - GET /events (public), POST /events (private: owner = caller)
 * - POST /events checks identity before the body, so a bad body never hides a missing credential
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::events::{CreateEventRequest, EventResponse},
        extractors::{ApiJson, RequestCtx},
    },
    error::Failure,
    state::AppState,
};

pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, Failure> {
    let rows = state.store.list_events().await?;

    Ok(Json(rows.into_iter().map(EventResponse::from).collect()))
}

pub async fn create_event(
    ctx: RequestCtx,
    State(state): State<AppState>,
    body: Result<ApiJson<CreateEventRequest>, Failure>,
) -> Result<(StatusCode, Json<EventResponse>), Failure> {
    let claim = ctx.require_identity()?;
    let ApiJson(req) = body?;
    let event = req.validate(&claim.subject_id)?;
    let row = state.store.create_event(event).await?;

    tracing::info!(event_id = %row.id, owner = %row.owner_id, "event created");

    Ok((StatusCode::CREATED, Json(row.into())))
}
