/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - Every route shares one pipeline; private handlers call RequestCtx::require_identity themselves
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    bookings::create_booking,
    events::{create_event, list_events},
    fallback::route_not_found,
    health::health,
    me::me,
    users::create_user,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/users", post(create_user))
        .route("/events", get(list_events).post(create_event))
        .route("/events/{event_id}/bookings", post(create_booking))
        .method_not_allowed_fallback(route_not_found)
}
