pub mod json;
pub mod path;
pub mod request_ctx;

pub use json::ApiJson;
pub use path::ApiPath;
pub use request_ctx::RequestCtx;
