/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: read-only, built once at startup from Config
 *   - store: users / events / bookings persistence
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::repos::Store;
use crate::services::auth::IdentityVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<IdentityVerifier>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(verifier: Arc<IdentityVerifier>, store: Arc<dyn Store>) -> Self {
        Self { verifier, store }
    }
}
