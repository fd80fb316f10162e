pub mod cors;
pub mod request_trace;

pub use cors::cors_middleware;
pub use request_trace::{RequestTrace, TraceId};
