//! Repository-level error types.

use thiserror::Error;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    /// A store-level constraint rejected the write (e.g. duplicate email).
    #[error("Constraint violation: {0}")]
    Constraint(String),
}
