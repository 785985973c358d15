use axum::{http::StatusCode, response::Json};
use common::{
    CashierCounts, LoginFormDto, PageLink, ProfileDto, ProfilePage, Role, RoleCounts, SessionDto,
    TerminalSnapshot,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa::ToSchema;

pub use common::ApiResponse;

use crate::config::Settings;
use crate::identity::IdentityProvider;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Credential checks and sessions
    pub identity: Arc<dyn IdentityProvider>,
    /// Loaded configuration
    pub settings: Arc<Settings>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }
    }
}

/// What handlers return on failure.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(code, error)))
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Landing response of `/`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    /// Where to sign in
    pub login: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::index,
        crate::handlers::health::health_check,
        crate::handlers::auth::login_form,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::sign_up,
        crate::handlers::auth::session,
        crate::handlers::superadmin::dashboard,
        crate::handlers::superadmin::list_accounts,
        crate::handlers::superadmin::create_account,
        crate::handlers::superadmin::rename_account,
        crate::handlers::superadmin::delete_account,
        crate::handlers::superadmin::toggle_account,
        crate::handlers::admin::dashboard,
        crate::handlers::admin::list_cashiers,
        crate::handlers::admin::create_cashier,
        crate::handlers::admin::rename_cashier,
        crate::handlers::admin::delete_cashier,
        crate::handlers::admin::toggle_cashier,
        crate::handlers::cashier::terminal,
        crate::handlers::cashier::rename_self,
    ),
    components(
        schemas(
            ApiResponse<ProfileDto>,
            ApiResponse<ProfilePage>,
            ApiResponse<SessionDto>,
            ApiResponse<RoleCounts>,
            ApiResponse<CashierCounts>,
            ApiResponse<TerminalSnapshot>,
            ErrorResponse,
            HealthResponse,
            ServiceInfo,
            ProfileDto,
            ProfilePage,
            PageLink,
            Role,
            SessionDto,
            LoginFormDto,
            RoleCounts,
            CashierCounts,
            TerminalSnapshot,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::SignUpRequest,
            crate::handlers::CreateAccountRequest,
            crate::handlers::RenameRequest,
        )
    ),
    tags(
        (name = "health", description = "Service status endpoints"),
        (name = "auth", description = "Sign in, sign out and registration"),
        (name = "superadmin", description = "Management of every account"),
        (name = "admin", description = "Management of the caller's cashiers"),
        (name = "cashier", description = "Terminal view of a signed-in user"),
    ),
    info(
        title = "posgate API",
        description = "Role-gated administration of a point-of-sale system",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
