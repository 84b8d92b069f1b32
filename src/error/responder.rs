use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use super::ClassifiedError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse<'a> {
    error: &'a str,
    code: &'a str,
    request_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a Value>,
}

/// Write the client-facing error body. Called once per failed request, by the request boundary.
pub fn respond(error: ClassifiedError, request_id: &str) -> Response {
    let body = ErrorResponse {
        error: error.message(),
        code: error.code(),
        request_id,
        details: error.details(),
    };

    (error.status(), Json(body)).into_response()
}
