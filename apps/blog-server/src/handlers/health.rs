//! Health check endpoint.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::observability::assigned_request_id;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// GET /health
///
/// 200 while the store answers, 503 otherwise.
pub async fn health_check(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let reachable = state.storage.is_reachable().await;

    let response = HealthResponse {
        status: if reachable { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage.name(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        request_id: assigned_request_id(&req),
    };

    if reachable {
        HttpResponse::Ok().json(response)
    } else {
        tracing::warn!(storage = response.storage, "Health check: store unreachable");
        HttpResponse::ServiceUnavailable().json(response)
    }
}
