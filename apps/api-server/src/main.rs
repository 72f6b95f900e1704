//! # Eventix API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod background;
mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::headers::security_headers;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    tracing::info!(
        "Starting Eventix API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    #[cfg(feature = "scheduler")]
    let scheduler = start_scheduler(&config, &state).await;

    let upload_dir = config.upload_dir.clone();
    let cors = config.cors.clone();
    let app_state = state.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors.middleware())
            .wrap(RequestIdMiddleware)
            .wrap(security_headers())
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(app_state.clone()))
            .configure(|cfg| handlers::configure_routes(cfg, &app_state, &upload_dir))
            .default_service(web::to(handlers::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    #[cfg(feature = "scheduler")]
    if let Some(mut scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!("Scheduler shutdown failed: {}", e);
        }
    }

    Ok(())
}

/// Start the periodic rate-limit purge. Failures are logged, not fatal.
#[cfg(feature = "scheduler")]
async fn start_scheduler(config: &AppConfig, state: &AppState) -> Option<background::Scheduler> {
    let mut scheduler = match background::Scheduler::new(config.scheduler.clone()).await {
        Ok(scheduler) => scheduler,
        Err(e) => {
            tracing::error!("Failed to create scheduler: {}", e);
            return None;
        }
    };

    if let Err(e) = scheduler
        .add_rate_limit_purge(&config.rate_limit.purge_cron, state.limiters.clone())
        .await
    {
        tracing::error!("Failed to register rate limit purge: {}", e);
        return None;
    }

    if let Err(e) = scheduler.start().await {
        tracing::error!("Failed to start scheduler: {}", e);
        return None;
    }

    Some(scheduler)
}
