use crate::error::{AppError, Failure};

/// Unknown path or unsupported method.
pub async fn route_not_found() -> Failure {
    AppError::not_found("route").into()
}
