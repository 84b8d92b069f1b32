/*
 * Responsibility
 * - `Json<T>` whose rejection (bad syntax, wrong content type, body too large) is a
 *   BAD_USER_INPUT failure instead of axum's plain-text response
 */
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::error::{AppError, Failure};

pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "json body rejected");
                Err(AppError::bad_request(rejection.body_text()).into())
            }
        }
    }
}
