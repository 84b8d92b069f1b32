use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::Failure;

use super::RequestCtx;

/// Handler-side access to the `RequestCtx` the boundary middleware inserted.
/// Missing context means the router was assembled without the boundary, which is a server bug.
impl<S> FromRequestParts<S> for RequestCtx
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestCtx>()
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!("request context missing; boundary middleware not applied").into()
            })
    }
}
