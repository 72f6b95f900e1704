//! Application error type and its HTTP mapping.

use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpResponse, ResponseError};
use eventix_core::RepoError;
use eventix_core::ports::{AuthError, BlobError, RateLimitResult};
use eventix_core::upload::UploadError;
use eventix_core::validation::ValidationError;
use eventix_shared::ErrorResponse;

use super::rate_limit::{reset_secs, write_rate_limit_headers};

/// Errors a handler, extractor or middleware can surface to the client.
///
/// The `Display` output is the client-facing message; internal details are
/// logged when the response is built and never sent.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Unprocessable(String),

    #[error("Too many requests, please try again later.")]
    RateLimited(RateLimitResult),

    #[error("Internal server error")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }

        let mut response =
            HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()));

        if let AppError::RateLimited(result) = self {
            let headers = response.headers_mut();
            write_rate_limit_headers(headers, result);
            headers.insert(
                header::RETRY_AFTER,
                HeaderValue::from(reset_secs(result.reset_after)),
            );
        }
        response
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => AppError::Unprocessable(msg),
            RepoError::Connection(msg) => AppError::Internal(format!("Database connection: {msg}")),
            RepoError::Query(msg) => AppError::Internal(format!("Database query: {msg}")),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => AppError::Unauthorized(err.to_string()),
            AuthError::InvalidToken(detail) => {
                tracing::debug!(%detail, "Rejected session token");
                AppError::Unauthorized("Invalid session".to_string())
            }
            AuthError::Signing(_) | AuthError::HashingError(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<BlobError> for AppError {
    fn from(err: BlobError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::from(ValidationError::new("email", "is required")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(RepoError::Constraint("dup".into())).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(AuthError::TokenExpired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(UploadError::TooManyFiles).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = AppError::from(RepoError::Query("relation \"events\" does not exist".into()));
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rate_limited_headers() {
        let res = AppError::RateLimited(RateLimitResult {
            allowed: false,
            limit: 50,
            remaining: 0,
            reset_after: Duration::from_millis(1500),
        })
        .error_response();

        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers().get("Retry-After").unwrap(), "2");
        assert_eq!(res.headers().get("RateLimit-Limit").unwrap(), "50");
        assert_eq!(res.headers().get("RateLimit-Remaining").unwrap(), "0");
        assert_eq!(res.headers().get("RateLimit-Reset").unwrap(), "2");
    }
}
