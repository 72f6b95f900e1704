//! Liveness and readiness checks.

use actix_web::{HttpResponse, web};

use eventix_shared::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// GET /healthz
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /readyz
///
/// 200 `connected` when the database answers, 200 `in_memory` when none was
/// configured, 503 `not_connected` otherwise.
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let db = match &state.db {
        Some(connections) => {
            if connections.ping().await {
                "connected"
            } else {
                "not_connected"
            }
        }
        None if state.database_required => "not_connected",
        None => "in_memory",
    };

    let body = ReadinessResponse { db: db.to_string() };
    if db == "not_connected" {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}
