use access::ListingScope;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{CashierCounts, ProfileDto, ProfilePage};
use tracing::{debug, info, instrument, trace};

use crate::directory;
use crate::gate::RequestContext;
use crate::handlers::{CreateAccountRequest, ListingQuery, RenameRequest, directory_failure};
use crate::schemas::{ApiError, ApiResponse, AppState};

/// Rows an admin manages: the cashiers it created.
fn own_cashiers(caller: &RequestContext) -> ListingScope {
    ListingScope::CashiersCreatedBy(caller.user_id.clone())
}

/// Admin dashboard
#[utoipa::path(
    get,
    path = "/dashboard/admin",
    tag = "admin",
    responses(
        (status = 200, description = "Cashiers managed by the caller", body = ApiResponse<CashierCounts>),
        (status = 307, description = "Caller is not an admin"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn dashboard(
    State(state): State<AppState>,
    caller: RequestContext,
) -> Result<Json<ApiResponse<CashierCounts>>, ApiError> {
    trace!("Entering admin dashboard for {}", caller.user_id);
    let counts = directory::cashier_counts(&state.db, &caller.user_id)
        .await
        .map_err(directory_failure)?;
    Ok(Json(ApiResponse::ok(counts, "Cashier counts retrieved successfully")))
}

/// List the caller's cashiers
#[utoipa::path(
    get,
    path = "/dashboard/admin/cashiers",
    tag = "admin",
    params(ListingQuery),
    responses(
        (status = 200, description = "One page of cashiers, newest first", body = ApiResponse<ProfilePage>),
        (status = 400, description = "Invalid paging parameters"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn list_cashiers(
    Valid(Query(query)): Valid<Query<ListingQuery>>,
    State(state): State<AppState>,
    caller: RequestContext,
) -> Result<Json<ApiResponse<ProfilePage>>, ApiError> {
    let profiles = directory::list_profiles(&state.db, &own_cashiers(&caller))
        .await
        .map_err(directory_failure)?;

    let page = query.paginate(profiles.into_iter().map(ProfileDto::from).collect());
    info!(
        "Admin {} sees {} of {} cashiers",
        caller.user_id,
        page.items.len(),
        page.total_items
    );
    Ok(Json(ApiResponse::ok(page, "Cashiers retrieved successfully")))
}

/// Create a cashier
#[utoipa::path(
    post,
    path = "/dashboard/admin/cashiers",
    tag = "admin",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Cashier created", body = ApiResponse<ProfileDto>),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 403, description = "Requested role other than CASHIER", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, caller, request))]
pub async fn create_cashier(
    State(state): State<AppState>,
    caller: RequestContext,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProfileDto>>), ApiError> {
    debug!("Admin {} creating a cashier", caller.user_id);
    let profile = directory::create_account(
        &state.db,
        state.identity.as_ref(),
        &own_cashiers(&caller),
        &caller.user_id,
        request.into(),
    )
    .await
    .map_err(directory_failure)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ProfileDto::from(profile), "Cashier created successfully")),
    ))
}

/// Rename one of the caller's cashiers
#[utoipa::path(
    put,
    path = "/dashboard/admin/cashiers/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Profile ID")),
    request_body = RenameRequest,
    responses(
        (status = 200, description = "Cashier renamed", body = ApiResponse<ProfileDto>),
        (status = 400, description = "Missing full name", body = ErrorResponse),
        (status = 404, description = "Not one of the caller's cashiers", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn rename_cashier(
    Path(id): Path<String>,
    State(state): State<AppState>,
    caller: RequestContext,
    Json(request): Json<RenameRequest>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let profile = directory::rename(&state.db, &own_cashiers(&caller), &id, &request.fullname)
        .await
        .map_err(directory_failure)?;
    Ok(Json(ApiResponse::ok(ProfileDto::from(profile), "Cashier updated successfully")))
}

/// Delete one of the caller's cashiers
#[utoipa::path(
    delete,
    path = "/dashboard/admin/cashiers/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Profile ID")),
    responses(
        (status = 204, description = "Cashier deleted"),
        (status = 404, description = "Not one of the caller's cashiers", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn delete_cashier(
    Path(id): Path<String>,
    State(state): State<AppState>,
    caller: RequestContext,
) -> Result<StatusCode, ApiError> {
    directory::delete_account(&state.db, &own_cashiers(&caller), &caller.user_id, &id)
        .await
        .map_err(directory_failure)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Activate or deactivate one of the caller's cashiers
#[utoipa::path(
    post,
    path = "/dashboard/admin/cashiers/{id}/toggle-active",
    tag = "admin",
    params(("id" = String, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Active flag flipped", body = ApiResponse<ProfileDto>),
        (status = 404, description = "Not one of the caller's cashiers", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn toggle_cashier(
    Path(id): Path<String>,
    State(state): State<AppState>,
    caller: RequestContext,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let profile = directory::toggle_active(&state.db, &own_cashiers(&caller), &id)
        .await
        .map_err(directory_failure)?;
    Ok(Json(ApiResponse::ok(ProfileDto::from(profile), "Cashier status updated")))
}
