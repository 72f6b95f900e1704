//! Middleware modules.

pub mod cors;
pub mod error;
pub mod headers;
pub mod rate_limit;
pub mod session;
