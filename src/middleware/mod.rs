/*
 * Responsibility
 * - middleware の公開インターフェース
 * - boundary: request context + final error response
 * - http: timeout / body limit / access log
 * - cors: browser origin policy
 */
pub mod boundary;
pub mod cors;
pub mod http;
