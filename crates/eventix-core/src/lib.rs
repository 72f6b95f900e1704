//! # Eventix Core
//!
//! The domain layer of the Eventix ticketing backend.
//! This crate contains entities, ports and the request policy layer
//! (validation schemas, upload gate, rate-limit policies) with zero
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod rate_limit;
pub mod upload;
pub mod validation;

pub use error::RepoError;
