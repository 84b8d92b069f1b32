//! Bearer credential verification.
//!
//! `IdentityVerifier::verify` never fails. Anything that is not a well-formed, correctly signed and
//! unexpired token yields `None`, which callers treat as an anonymous request.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

const BEARER_PREFIX: &str = "Bearer ";

/// Who issued the current request. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    pub subject_id: String,
}

#[derive(Debug, Deserialize)]
struct AccessTokenClaims {
    sub: String,
}

/// HS256 access-token verifier.
///
/// - The secret is injected at construction; `None` makes every credential anonymous.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct IdentityVerifier {
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier")
            .field("has_key", &self.decoding_key.is_some())
            .field("validation", &self.validation)
            .finish()
    }
}

impl IdentityVerifier {
    pub fn new(
        secret: Option<&[u8]>,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Self {
        // An empty secret would accept tokens signed with an empty key.
        let decoding_key = secret
            .filter(|s| !s.is_empty())
            .map(DecodingKey::from_secret);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = leeway_seconds;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key,
            validation,
        }
    }

    pub fn has_key(&self) -> bool {
        self.decoding_key.is_some()
    }

    /// Resolve a raw `Authorization` value into an identity, or `None` for anonymous.
    pub fn verify(&self, credential: Option<&str>) -> Option<IdentityClaim> {
        let token = credential.and_then(bearer_token)?;
        let key = self.decoding_key.as_ref()?;

        match jsonwebtoken::decode::<AccessTokenClaims>(token, key, &self.validation) {
            Ok(data) if !data.claims.sub.trim().is_empty() => Some(IdentityClaim {
                subject_id: data.claims.sub,
            }),
            Ok(_) => {
                tracing::debug!("access token rejected: empty 'sub' claim");
                None
            }
            Err(err) => {
                tracing::debug!(error = %err, "access token rejected");
                None
            }
        }
    }
}

/// Extract the token from `Bearer <token>`.
///
/// The prefix is case-sensitive and must be followed by exactly one space; a token that is empty
/// or contains any whitespace is treated as absent.
pub fn bearer_token(credential: &str) -> Option<&str> {
    let token = credential.strip_prefix(BEARER_PREFIX)?;
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return None;
    }
    Some(token)
}
