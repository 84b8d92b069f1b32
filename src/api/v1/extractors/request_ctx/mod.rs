/*!
 * Request context extractor
 *
 * Responsibility:
 * - Per-request context (optional identity + correlation id) built once by the request boundary
 * - `require_identity` is the guard private handlers call explicitly; handlers that skip it stay public
 *
 * Public API:
 * - RequestCtx
 */

mod core;
mod types;

pub use types::RequestCtx;
