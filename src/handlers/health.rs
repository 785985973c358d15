use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{instrument, warn};

use crate::schemas::{ApiError, ApiResponse, AppState, HealthResponse, ServiceInfo, api_error};

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service information", body = ApiResponse<ServiceInfo>)
    )
)]
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<ApiResponse<ServiceInfo>> {
    Json(ApiResponse::ok(
        ServiceInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            login: state.settings.routes.login.clone(),
        },
        "Welcome",
    ))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 500, description = "Service is unhealthy", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    // Test database connection
    let db_status = match state.db.ping().await {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            warn!("Database ping failed: {}", e);
            "disconnected".to_string()
        }
    };

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    };

    Ok(Json(response))
}

/// Answer for paths no route matches.
pub async fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
}
