/*
 * Responsibility
 * - The context every handler can see: optional identity + correlation id
 * - Built once per request (`build`), never mutated afterwards (fields are private)
 *
 * Notes
 * - Building never fails: a missing/invalid credential is simply an anonymous request
 * - Authorization decisions are NOT made here; handlers call `require_identity` when they need a caller
 */
use axum::http::{HeaderMap, header};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::{IdentityClaim, IdentityVerifier};

#[derive(Debug, Clone)]
pub struct RequestCtx {
    identity: Option<IdentityClaim>,
    request_id: String,
}

impl RequestCtx {
    pub fn build(headers: &HeaderMap, verifier: &IdentityVerifier) -> Self {
        // Non-UTF8 header values are treated like a missing header
        let credential = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        Self {
            identity: verifier.verify(credential),
            request_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn identity(&self) -> Option<&IdentityClaim> {
        self.identity.as_ref()
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Demand an authenticated caller.
    pub fn require_identity(&self) -> Result<&IdentityClaim, AppError> {
        self.identity.as_ref().ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"ctx-secret";

    fn verifier() -> IdentityVerifier {
        IdentityVerifier::new(Some(SECRET), None, None, 0)
    }

    fn headers_with(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    fn bearer(sub: &str) -> String {
        let exp = chrono::Utc::now().timestamp() + 600;
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({ "sub": sub, "exp": exp }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        format!("Bearer {token}")
    }

    #[test]
    fn anonymous_without_header() {
        let ctx = RequestCtx::build(&HeaderMap::new(), &verifier());
        assert!(ctx.identity().is_none());
        assert!(!ctx.request_id().is_empty());
    }

    #[test]
    fn anonymous_for_wrong_scheme_case() {
        let token = bearer("user-1").replacen("Bearer", "bearer", 1);
        let ctx = RequestCtx::build(&headers_with(&token), &verifier());
        assert!(ctx.identity().is_none());
    }

    #[test]
    fn each_request_gets_a_fresh_correlation_id() {
        let a = RequestCtx::build(&HeaderMap::new(), &verifier());
        let b = RequestCtx::build(&HeaderMap::new(), &verifier());
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn guard_rejects_anonymous_callers() {
        let ctx = RequestCtx::build(&HeaderMap::new(), &verifier());
        let err = ctx.require_identity().unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));

        let classified = crate::error::classify(&err);
        assert_eq!(classified.status().as_u16(), 401);
        assert_eq!(classified.code(), "UNAUTHENTICATED");
    }

    #[test]
    fn guard_returns_the_same_claim_every_time() {
        let ctx = RequestCtx::build(&headers_with(&bearer("user-7")), &verifier());

        let first = ctx.require_identity().unwrap().clone();
        let second = ctx.require_identity().unwrap();
        assert_eq!(first.subject_id, "user-7");
        assert_eq!(&first, second);
        assert_eq!(ctx.identity(), Some(second));
    }
}
