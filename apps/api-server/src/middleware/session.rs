//! Cookie session: cookie lifecycle and the session extractor.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::{Ready, ready};
use uuid::Uuid;

use eventix_core::ports::TokenClaims;

use super::error::AppError;
use crate::state::AppState;

/// Attributes of the session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookieConfig {
    pub name: String,
    /// Set the `Secure` attribute (production only).
    pub secure: bool,
    pub ttl_seconds: i64,
}

impl SessionCookieConfig {
    /// HTTP-only, SameSite=Strict cookie carrying `token`.
    pub fn issue(&self, token: String) -> Cookie<'static> {
        Cookie::build(self.name.clone(), token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .max_age(CookieDuration::seconds(self.ttl_seconds))
            .finish()
    }

    /// Expired cookie with the same attributes, clearing the session.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = self.issue(String::new());
        cookie.make_removal();
        cookie
    }
}

/// Authenticated user identity, decoded from a verified token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Session extractor.
///
/// `Session(None)` when no cookie was sent. A cookie that fails signature,
/// issuer or expiry checks rejects the request with 401.
#[derive(Debug, Clone)]
pub struct Session(pub Option<Identity>);

impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(AppError::Internal(
                "AppState not found in app data".to_string(),
            )));
        };

        let Some(cookie) = req.cookie(&state.session.name) else {
            return ready(Ok(Session(None)));
        };

        ready(
            state
                .tokens
                .validate_token(cookie.value())
                .map(|claims| Session(Some(claims.into())))
                .map_err(AppError::from),
        )
    }
}
