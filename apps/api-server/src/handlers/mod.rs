//! HTTP handlers and route configuration.

mod auth;
mod events;
mod health;
mod tickets;


use std::path::Path;
use std::sync::Arc;

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, guard, web};

use eventix_core::ports::RateLimiter;
use eventix_core::rate_limit::RateLimitPolicy;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::{AppState, UPLOADS_PREFIX};

/// Maximum JSON body size: 1 MiB.
pub const JSON_LIMIT: usize = 1024 * 1024;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Fallback for unmatched routes.
pub async fn not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("Route not found"))
}

/// Configure all application routes.
///
/// Rate-limited routes get their own guarded resource so the limiter only
/// sees the method it is meant to count.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState, upload_dir: &Path) {
    let limited = |limiter: &Arc<dyn RateLimiter>, policy: RateLimitPolicy| {
        RateLimitMiddleware::new(limiter.clone(), policy.group, state.trust_proxy)
    };
    let limiters = &state.limiters;

    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(json_error),
    )
    // Health checks
    .route("/healthz", web::get().to(health::liveness))
    .route("/readyz", web::get().to(health::readiness))
    // Auth
    .service(
        web::resource("/register")
            .guard(guard::Post())
            .wrap(limited(&limiters.auth, RateLimitPolicy::AUTH))
            .route(web::post().to(auth::register)),
    )
    .service(
        web::resource("/login")
            .guard(guard::Post())
            .wrap(limited(&limiters.auth, RateLimitPolicy::AUTH))
            .route(web::post().to(auth::login)),
    )
    .route("/profile", web::get().to(auth::profile))
    .route("/logout", web::post().to(auth::logout))
    // Events
    .service(
        web::resource("/createEvent")
            .guard(guard::Post())
            .wrap(limited(&limiters.create_event, RateLimitPolicy::CREATE_EVENT))
            .route(web::post().to(events::create)),
    )
    .route("/createEvent", web::get().to(events::list))
    .route("/events", web::get().to(events::list))
    .service(
        web::resource("/event/{id}")
            .guard(guard::Post())
            .wrap(limited(&limiters.like, RateLimitPolicy::LIKE))
            .route(web::post().to(events::like)),
    )
    .route("/event/{id}", web::get().to(events::get))
    .route("/event/{id}/ordersummary", web::get().to(events::get))
    .route(
        "/event/{id}/ordersummary/paymentsummary",
        web::get().to(events::get),
    )
    // Tickets
    .service(
        web::resource("/tickets")
            .guard(guard::Post())
            .wrap(limited(&limiters.tickets, RateLimitPolicy::TICKETS))
            .route(web::post().to(tickets::create)),
    )
    .route("/tickets/user/{userId}", web::get().to(tickets::list_for_user))
    .service(
        web::resource("/tickets/{id}")
            .route(web::get().to(tickets::get))
            .route(web::delete().to(tickets::delete)),
    )
    // Uploaded images
    .service(actix_files::Files::new(
        &format!("/{UPLOADS_PREFIX}"),
        upload_dir,
    ));
}
