/// Factory: build `IdentityVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::IdentityVerifier;

pub fn build_identity_verifier(config: &Config) -> Arc<IdentityVerifier> {
    let verifier = IdentityVerifier::new(
        config.auth_jwt_secret.as_deref().map(str::as_bytes),
        config.auth_issuer.as_deref(),
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    );

    // Fail closed rather than refusing to start
    if !verifier.has_key() {
        tracing::warn!("AUTH_JWT_SECRET is not set; every request will be treated as anonymous");
    }

    Arc::new(verifier)
}
