use axum::{extract::State, http::StatusCode, response::Json};
use common::{ProfileDto, TerminalSnapshot};
use tracing::{instrument, warn};

use crate::directory;
use crate::gate::RequestContext;
use crate::handlers::{RenameRequest, directory_failure};
use crate::schemas::{ApiError, ApiResponse, AppState, api_error};

/// Terminal view of the caller
#[utoipa::path(
    get,
    path = "/dashboard/cashier",
    tag = "cashier",
    responses(
        (status = 200, description = "Caller's profile and today's figures", body = ApiResponse<TerminalSnapshot>),
        (status = 307, description = "No session or unrecognized role"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn terminal(
    State(state): State<AppState>,
    caller: RequestContext,
) -> Result<Json<ApiResponse<TerminalSnapshot>>, ApiError> {
    let Some(profile) = directory::find_profile(&state.db, &caller.user_id)
        .await
        .map_err(directory_failure)?
    else {
        warn!("Signed-in user {} has no profile", caller.user_id);
        return Err(api_error(StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND", "Profile not found"));
    };

    let snapshot = TerminalSnapshot::idle(ProfileDto::from(profile));
    Ok(Json(ApiResponse::ok(snapshot, "Terminal ready")))
}

/// Rename the caller's own profile
#[utoipa::path(
    put,
    path = "/dashboard/cashier/profile",
    tag = "cashier",
    request_body = RenameRequest,
    responses(
        (status = 200, description = "Profile renamed", body = ApiResponse<ProfileDto>),
        (status = 400, description = "Missing full name", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn rename_self(
    State(state): State<AppState>,
    caller: RequestContext,
    Json(request): Json<RenameRequest>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let profile = directory::rename_own(&state.db, &caller.user_id, &request.fullname)
        .await
        .map_err(directory_failure)?;
    Ok(Json(ApiResponse::ok(ProfileDto::from(profile), "Profile updated successfully")))
}
