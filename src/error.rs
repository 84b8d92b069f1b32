/*
 * Responsibility
 * - The closed error taxonomy (ErrorKind / ClassifiedError)
 * - AppError: failures that already know their machine code (guard, not-found, business rules)
 * - Failure: the carrier handlers return; any error converts into it and is classified once
 * - The final JSON body is written by the request boundary (middleware::boundary) via `respond`
 */
use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;

mod classifier;
mod responder;

pub use classifier::classify;
pub use responder::respond;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Conflict,
    BadInput,
    Unauthenticated,
    Forbidden,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::BadInput => "BAD_USER_INPUT",
            ErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::BadInput => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Kind for a code carried by a pre-classified failure. Unknown codes are internal.
    pub fn from_carried_code(code: &str) -> Self {
        match code {
            "BAD_USER_INPUT" => ErrorKind::BadInput,
            "UNAUTHENTICATED" => ErrorKind::Unauthenticated,
            "FORBIDDEN" => ErrorKind::Forbidden,
            "NOT_FOUND" => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }
}

/// One entry of the taxonomy, ready to be written by `respond`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    status: StatusCode,
    code: Cow<'static, str>,
    details: Option<Value>,
}

impl ClassifiedError {
    fn of_kind(kind: ErrorKind, message: impl Into<Cow<'static, str>>, details: Option<Value>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: kind.status(),
            code: Cow::Borrowed(kind.code()),
            details,
        }
    }

    fn internal() -> Self {
        Self::of_kind(ErrorKind::Internal, "internal server error", None)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { message: String },
    #[error("authentication required")]
    Unauthenticated,
    #[error("{message}")]
    Forbidden { message: String },
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("{message}")]
    Coded {
        code: &'static str,
        message: String,
        details: Option<Value>,
    },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn coded(code: &'static str, message: impl Into<String>) -> Self {
        Self::Coded {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest { .. } => "BAD_USER_INPUT",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::Forbidden { .. } => "FORBIDDEN",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Coded { code, .. } => *code,
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            AppError::Coded { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

/// Any error a handler can raise.
///
/// Converting into a response only classifies; the body (with the request id) is produced by
/// the request boundary, which finds the `ClassifiedError` in the response extensions.
#[derive(Debug)]
pub struct Failure(anyhow::Error);

impl<E> From<E> for Failure
where
    E: Into<anyhow::Error>,
{
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let classified = classify(&*self.0);
        let mut res = classified.status().into_response();
        res.extensions_mut().insert(classified);
        res
    }
}
