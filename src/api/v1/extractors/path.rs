/*
 * Responsibility
 * - `Path<T>` whose rejection (undecodable segment, wrong type) is a BAD_USER_INPUT failure
 *   instead of axum's plain-text response
 */
use axum::{
    extract::{FromRequestParts, Path, rejection::PathRejection},
    http::request::Parts,
};

use crate::error::{AppError, Failure};

pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "path parameters rejected");
                Err(AppError::bad_request(rejection.body_text()).into())
            }
        }
    }
}
