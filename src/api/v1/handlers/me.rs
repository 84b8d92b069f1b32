/*
 * Responsibility
 * - GET /me: echo the authenticated caller (private)
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::RequestCtx};
use crate::error::Failure;

pub async fn me(ctx: RequestCtx) -> Result<Json<MeResponse>, Failure> {
    let claim = ctx.require_identity()?;

    Ok(Json(MeResponse {
        subject_id: claim.subject_id.clone(),
    }))
}
