//! Request boundary: build `RequestCtx` → run the request → write the error body if it failed.
//!
//! Authentication here is advisory. An invalid or missing credential never rejects the request;
//! it only leaves `RequestCtx::identity()` empty, and private handlers reject via the guard.
//!
//! Errors raised anywhere below (handlers, extractors, the timeout layer) reach this point as a
//! `ClassifiedError` in the response extensions and are written exactly once, with the request id.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use tracing::Instrument;

use crate::api::v1::extractors::RequestCtx;
use crate::error::{ClassifiedError, respond};
use crate::state::AppState;

pub fn apply(router: Router, state: AppState) -> Router {
    router.layer(middleware::from_fn_with_state(state, request_boundary))
}

async fn request_boundary(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let ctx = RequestCtx::build(req.headers(), &state.verifier);
    let request_id = ctx.request_id().to_owned();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        authenticated = ctx.identity().is_some()
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(ctx);

    let mut res = next.run(req).instrument(span.clone()).await;

    if let Some(classified) = res.extensions_mut().remove::<ClassifiedError>() {
        span.in_scope(|| log_failure(&classified));
        res = respond(classified, &request_id);
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        res.headers_mut()
            .insert(HeaderName::from_static("x-request-id"), value);
    }

    res
}

fn log_failure(classified: &ClassifiedError) {
    let status = classified.status();
    let kind = classified.kind();
    if status.is_server_error() {
        tracing::error!(%status, ?kind, code = classified.code(), "request failed");
    } else {
        tracing::info!(%status, ?kind, code = classified.code(), "request rejected");
    }
}
