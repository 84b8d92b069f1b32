//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Global timeout (surfaced as a pre-classified `TIMEOUT` failure)
//! - Body size limit (enforced by the JSON extractor, so oversize bodies are BAD_USER_INPUT)
//! - Access logging / request tracing (TraceLayer)

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{AppError, Failure};

pub fn apply(router: Router, config: &Config) -> Router {
    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into failures.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                Failure::from(AppError::coded("TIMEOUT", "request timed out"))
            } else {
                Failure::from(anyhow::anyhow!("middleware error: {err}"))
            }
        }))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http());

    router
        .layer(layers)
        .layer(DefaultBodyLimit::max(config.request_body_limit_bytes))
}
