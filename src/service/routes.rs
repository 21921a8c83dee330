//! HTTP endpoints
//!
//! Public leaderboard and battle history, password-gated admin actions, and
//! health/metrics endpoints, served with Axum.

use crate::import::EXPORT_FILE_NAME;
use crate::service::app::AppState;
use crate::service::health::{HealthCheck, HealthStatus};
use crate::types::BattleResult;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Header carrying the admin shared secret
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Admin battle submission
#[derive(Debug, Clone, Deserialize)]
pub struct BattleRequest {
    #[serde(default)]
    pub results: Vec<BattleResult>,
    /// Apply a decay step to the whole roster after the results
    #[serde(default)]
    pub decay: bool,
}

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/leaderboard", get(leaderboard_handler))
        .route("/battles", get(battles_handler))
        .route("/battles/{sequence}", get(battle_handler))
        .route("/admin/battle", post(battle_batch_handler))
        .route("/admin/decay", post(decay_handler))
        .route("/admin/import/csv", post(import_csv_handler))
        .route("/admin/import/names", post(import_names_handler))
        .route("/admin/export", get(export_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

fn json_error(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "error": msg }))).into_response()
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let attempt = headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok());

    if state.authorize_admin(attempt) {
        Ok(())
    } else {
        Err(json_error(
            StatusCode::UNAUTHORIZED,
            "Enter a valid admin password to access this panel.",
        ))
    }
}

/// Root endpoint handler - shows service information
async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "service": state.config().service.name,
        "season": state.config().service.season_title,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/leaderboard",
            "/battles",
            "/admin/battle",
            "/admin/decay",
            "/admin/import/csv",
            "/admin/import/names",
            "/admin/export",
            "/health",
            "/metrics"
        ]
    }))
}

async fn leaderboard_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.leaderboard().await)
}

async fn battles_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.battles().await)
}

async fn battle_handler(
    State(state): State<Arc<AppState>>,
    Path(sequence): Path<u64>,
) -> Response {
    match state.battle(sequence).await {
        Some(event) => Json(event).into_response(),
        None => json_error(StatusCode::NOT_FOUND, "Battle not found"),
    }
}

async fn battle_batch_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<BattleRequest>, JsonRejection>,
) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }

    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_error(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };

    let outcome = state.run_battle(&request.results, request.decay).await;
    Json(outcome).into_response()
}

async fn decay_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }

    let outcome = state.run_battle(&[], true).await;
    info!("Rank decay applied to {} participants", outcome.applied.len());
    Json(outcome).into_response()
}

async fn import_csv_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }

    match state.import_csv(&body).await {
        Ok(imported) => Json(json!({ "imported": imported })).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string(), "kind": e.kind() })),
        )
            .into_response(),
    }
}

async fn import_names_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }

    let added = state.import_names(&body).await;
    Json(json!({ "added": added })).into_response()
}

async fn export_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }

    match state.export_csv().await {
        Ok(csv) => (
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to export roster: {:#}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to export roster")
        }
    }
}

/// Lightweight health check endpoint handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    debug!("Health check requested");

    let health = HealthCheck::check(&state);
    if health.status == HealthStatus::Degraded {
        debug!("Reporting degraded health while a batch is running");
    }
    (StatusCode::OK, Json(health)).into_response()
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    debug!("Metrics endpoint requested");

    let registry = state.metrics().registry();
    let metric_families = registry.gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(metrics_output) => (
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            metrics_output,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    fn create_test_app() -> Router {
        let state = Arc::new(AppState::new(AppConfig::default()).unwrap());
        create_router(state)
    }

    fn admin_request(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(ADMIN_PASSWORD_HEADER, "admin123")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["season"], "SEASON 0 - INIT PRESET (OPEN BETA)");
    }

    #[tokio::test]
    async fn test_admin_routes_require_password() {
        let app = create_test_app();

        for (method, uri) in [
            ("POST", "/admin/battle"),
            ("POST", "/admin/decay"),
            ("POST", "/admin/import/csv"),
            ("POST", "/admin/import/names"),
            ("GET", "/admin/export"),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .header(ADMIN_PASSWORD_HEADER, "not-it")
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_battle_flow() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(admin_request("POST", "/admin/import/names", "Alice\nBob\n"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["added"], json!(["Alice", "Bob"]));

        let request = json!({
            "results": [
                { "name": "Alice", "grade": "Winner" },
                { "name": "Ghost", "grade": "Red" }
            ]
        });
        let response = app
            .clone()
            .oneshot(admin_request("POST", "/admin/battle", request.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let outcome = body_json(response).await;
        assert_eq!(outcome["battle"], 1);
        assert_eq!(outcome["applied"][0]["rating_after"], 1100);
        assert_eq!(outcome["failures"][0]["kind"], "unknown_participant");

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/leaderboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let board = body_json(response).await;
        assert_eq!(board[0]["Name"], "Alice");
        assert_eq!(board[0]["Rank"], "more");
        assert_eq!(board[1]["Name"], "Bob");

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/battles/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["sequence"], 1);

        let response = app
            .oneshot(Request::builder().uri("/battles/7").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_battle_payload() {
        let response = create_test_app()
            .oneshot(admin_request("POST", "/admin/battle", "not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_import_and_export_csv() {
        let app = create_test_app();
        let csv = "Name,ELO,Rank,Battles Missed,Placements Remaining\nAlice,1250,plat,1,0\n";

        let response = app
            .clone()
            .oneshot(admin_request("POST", "/admin/import/csv", csv))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["imported"], 1);

        let response = app
            .oneshot(admin_request("GET", "/admin/export", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/csv");
        assert!(response.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .contains("elo_data.csv"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), csv);
    }

    #[tokio::test]
    async fn test_malformed_csv_rejected() {
        let response = create_test_app()
            .oneshot(admin_request(
                "POST",
                "/admin/import/csv",
                "Name,ELO,Rank,Battles Missed,Placements Remaining\nAlice,abc,,0,0\n",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "malformed_import_row");
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().contains("text/plain"));
    }

    #[tokio::test]
    async fn test_health_degraded_while_batch_runs() {
        let state = Arc::new(AppState::new(AppConfig::default()).unwrap());
        let app = create_router(state.clone());
        let session = state.session();
        let _guard = session.write().await;

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "degraded");
        assert!(body["stats"].is_null());
    }

    #[tokio::test]
    async fn test_404_handling() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
