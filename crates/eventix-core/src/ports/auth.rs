//! Authentication ports: password hashing and session tokens.

use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    /// Unix timestamp (seconds).
    pub issued_at: i64,
    /// Unix timestamp (seconds).
    pub expires_at: i64,
}

/// Signed, time-boxed session token operations.
pub trait TokenService: Send + Sync {
    /// Issue a session token for a user.
    fn issue_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError>;

    /// Verify signature, issuer and expiry, then decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens in seconds.
    fn ttl_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a random salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Session expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
