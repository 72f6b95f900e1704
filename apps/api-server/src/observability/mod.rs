//! Observability module - request correlation and the error envelope.

mod request_id;

pub use request_id::RequestIdMiddleware;
