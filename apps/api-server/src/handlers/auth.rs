//! Authentication handlers.

use actix_web::{HttpResponse, web};
use serde_json::Value;

use eventix_core::RepoError;
use eventix_core::domain::{User, mask_email};
use eventix_core::ports::{BaseRepository, PasswordService, TokenService, UserRepository};
use eventix_core::validation::{LOGIN, REGISTER};
use eventix_shared::dto::{LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::Session;
use crate::state::AppState;

fn public_user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
    }
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let req: RegisterUserRequest = REGISTER.parse(&body)?;

    let password_hash = state.passwords.hash(&req.password)?;
    let user = User::new(req.name, req.email, password_hash);

    let saved_user = state.users.insert(user).await.map_err(|e| match e {
        RepoError::Constraint(_) => AppError::Unprocessable("Email already registered".to_string()),
        other => other.into(),
    })?;

    tracing::info!(user_id = %saved_user.id, "User registered");
    Ok(HttpResponse::Ok().json(public_user(&saved_user)))
}

/// POST /login
pub async fn login(state: web::Data<AppState>, body: web::Json<Value>) -> AppResult<HttpResponse> {
    let req: LoginRequest = LOGIN.parse(&body)?;

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::info!(user_email = %mask_email(&user.email), "Login rejected");
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let token = state.tokens.issue_token(user.id, &user.email)?;

    Ok(HttpResponse::Ok()
        .cookie(state.session.issue(token))
        .json(public_user(&user)))
}

/// GET /profile - `null` when anonymous.
pub async fn profile(state: web::Data<AppState>, session: Session) -> AppResult<HttpResponse> {
    let Session(Some(identity)) = session else {
        return Ok(HttpResponse::Ok().json(Value::Null));
    };

    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| {
            tracing::info!(user_email = %mask_email(&identity.email), "Session for unknown user");
            AppError::Unauthorized("Invalid session".to_string())
        })?;

    Ok(HttpResponse::Ok().json(public_user(&user)))
}

/// POST /logout
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(state.session.removal())
        .json(true)
}
