//! # Scribe Blog Server
//!
//! Actix-web entry point: configuration, telemetry, state, routes.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        host = %config.host,
        port = config.port,
        "Starting blog server"
    );

    let state = web::Data::new(AppState::new(&config).await);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
