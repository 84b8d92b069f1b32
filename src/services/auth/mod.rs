pub mod factory;
pub mod identity;

pub use factory::build_identity_verifier;
pub use identity::{IdentityClaim, IdentityVerifier};
