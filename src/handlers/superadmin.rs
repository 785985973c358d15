use access::ListingScope;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{ProfileDto, ProfilePage, RoleCounts};
use tracing::{debug, info, instrument, trace};

use crate::directory;
use crate::gate::RequestContext;
use crate::handlers::{CreateAccountRequest, ListingQuery, RenameRequest, directory_failure};
use crate::schemas::{ApiError, ApiResponse, AppState};

/// Superadmin dashboard
#[utoipa::path(
    get,
    path = "/dashboard/superadmin",
    tag = "superadmin",
    responses(
        (status = 200, description = "Profiles per role", body = ApiResponse<RoleCounts>),
        (status = 307, description = "Caller is not a superadmin"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<ApiResponse<RoleCounts>>, ApiError> {
    trace!("Entering superadmin dashboard");
    let counts = directory::role_counts(&state.db).await.map_err(directory_failure)?;
    debug!("Role counts: {:?}", counts);
    Ok(Json(ApiResponse::ok(counts, "Role counts retrieved successfully")))
}

/// List every account
#[utoipa::path(
    get,
    path = "/dashboard/superadmin/accounts",
    tag = "superadmin",
    params(ListingQuery),
    responses(
        (status = 200, description = "One page of accounts, newest first", body = ApiResponse<ProfilePage>),
        (status = 400, description = "Invalid paging parameters"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_accounts(
    Valid(Query(query)): Valid<Query<ListingQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProfilePage>>, ApiError> {
    let profiles = directory::list_profiles(&state.db, &ListingScope::Everyone)
        .await
        .map_err(directory_failure)?;

    let page = query.paginate(profiles.into_iter().map(ProfileDto::from).collect());
    info!(
        "Showing {} to {} of {} accounts",
        page.showing_from, page.showing_to, page.total_items
    );
    Ok(Json(ApiResponse::ok(page, "Accounts retrieved successfully")))
}

/// Create an account with any role
#[utoipa::path(
    post,
    path = "/dashboard/superadmin/accounts",
    tag = "superadmin",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<ProfileDto>),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, caller, request))]
pub async fn create_account(
    State(state): State<AppState>,
    caller: RequestContext,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProfileDto>>), ApiError> {
    debug!("Superadmin {} creating a {:?} account", caller.user_id, request.role);
    let profile = directory::create_account(
        &state.db,
        state.identity.as_ref(),
        &ListingScope::Everyone,
        &caller.user_id,
        request.into(),
    )
    .await
    .map_err(directory_failure)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ProfileDto::from(profile), "Account created successfully")),
    ))
}

/// Rename any account
#[utoipa::path(
    put,
    path = "/dashboard/superadmin/accounts/{id}",
    tag = "superadmin",
    params(("id" = String, Path, description = "Profile ID")),
    request_body = RenameRequest,
    responses(
        (status = 200, description = "Account renamed", body = ApiResponse<ProfileDto>),
        (status = 400, description = "Missing full name", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn rename_account(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let profile = directory::rename(&state.db, &ListingScope::Everyone, &id, &request.fullname)
        .await
        .map_err(directory_failure)?;
    Ok(Json(ApiResponse::ok(ProfileDto::from(profile), "Account updated successfully")))
}

/// Delete any account but one's own
#[utoipa::path(
    delete,
    path = "/dashboard/superadmin/accounts/{id}",
    tag = "superadmin",
    params(("id" = String, Path, description = "Profile ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 409, description = "Caller tried to delete itself", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn delete_account(
    Path(id): Path<String>,
    State(state): State<AppState>,
    caller: RequestContext,
) -> Result<StatusCode, ApiError> {
    directory::delete_account(&state.db, &ListingScope::Everyone, &caller.user_id, &id)
        .await
        .map_err(directory_failure)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Activate or deactivate any account
#[utoipa::path(
    post,
    path = "/dashboard/superadmin/accounts/{id}/toggle-active",
    tag = "superadmin",
    params(("id" = String, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Active flag flipped", body = ApiResponse<ProfileDto>),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn toggle_account(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let profile = directory::toggle_active(&state.db, &ListingScope::Everyone, &id)
        .await
        .map_err(directory_failure)?;
    Ok(Json(ApiResponse::ok(ProfileDto::from(profile), "Account status updated")))
}
