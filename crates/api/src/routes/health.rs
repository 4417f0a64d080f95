//! Service health endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Body returned by the health probe.
#[derive(Serialize)]
pub struct HealthStatus {
    /// Always `ok` while the process is serving requests.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Build version.
    pub version: &'static str,
}

/// GET `/health` - Liveness probe. Deliberately does not touch the database:
/// a saturated pool should not fail the probe.
async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        service: "centra",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates the health routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_body_shape() {
        let body = serde_json::to_value(HealthStatus {
            status: "ok",
            service: "centra",
            version: "0.0.0",
        })
        .unwrap();

        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "centra");
        assert!(body["version"].is_string());
    }
}
