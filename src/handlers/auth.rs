use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Json,
};
use common::{LoginFormDto, ProfileDto, SessionDto};
use access::RoleClaim;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::config::AuthSettings;
use crate::directory::{self, NewAccount};
use crate::gate::RequestContext;
use crate::handlers::{directory_failure, identity_failure};
use crate::schemas::{ApiError, ApiResponse, AppState, api_error};

/// Request body for signing in
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest").field("email", &self.email).finish_non_exhaustive()
    }
}

/// Request body for self registration
#[derive(Deserialize, Serialize, ToSchema)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub fullname: String,
}

fn session_cookie(settings: &AuthSettings, token: &str, max_age: u64) -> Option<HeaderValue> {
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        settings.cookie_name, token, max_age
    );
    HeaderValue::from_str(&cookie).ok()
}

fn with_cookie(cookie: Option<HeaderValue>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(cookie) = cookie {
        headers.insert(header::SET_COOKIE, cookie);
    }
    headers
}

/// Describe the sign-in form
#[utoipa::path(
    get,
    path = "/auth/login",
    tag = "auth",
    responses(
        (status = 200, description = "Sign-in form description", body = ApiResponse<LoginFormDto>)
    )
)]
#[instrument(skip(state))]
pub async fn login_form(State(state): State<AppState>) -> Json<ApiResponse<LoginFormDto>> {
    Json(ApiResponse::ok(
        LoginFormDto {
            action: state.settings.routes.login.clone(),
            fields: vec!["email".to_string(), "password".to_string()],
            sign_up_enabled: state.settings.auth.allow_self_registration,
        },
        "Sign in with email and password",
    ))
}

/// Sign in
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<SessionDto>),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Wrong email or password", body = ErrorResponse),
        (status = 403, description = "Account deactivated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<ApiResponse<SessionDto>>), ApiError> {
    trace!("Entering login function");
    if request.email.trim().is_empty() || request.password.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "All fields are required"));
    }

    let (token, identity) = state
        .identity
        .sign_in(&request.email, &request.password)
        .await
        .map_err(identity_failure)?;

    let record = directory::role_record(&state.db, &identity.user_id)
        .await
        .map_err(directory_failure)?;

    let claim = match &record {
        Some((role, is_active)) => {
            if !is_active && state.settings.auth.enforce_active_flag {
                warn!("Deactivated account {} tried to sign in", identity.user_id);
                state.identity.sign_out(&token).await;
                return Err(api_error(
                    StatusCode::FORBIDDEN,
                    "ACCOUNT_DEACTIVATED",
                    "This account has been deactivated",
                ));
            }
            RoleClaim::from_raw(Some(role))
        }
        None => RoleClaim::from_raw(None),
    };

    let home = state.settings.routes.home_for(&claim).to_string();
    info!("User {} signed in, home {}", identity.user_id, home);

    let cookie = session_cookie(&state.settings.auth, &token, state.settings.auth.session_ttl_secs);
    let session = SessionDto {
        token,
        user_id: identity.user_id,
        email: identity.email,
        role: claim.role(),
        home,
    };
    Ok((with_cookie(cookie), Json(ApiResponse::ok(session, "Signed in successfully"))))
}

/// Sign out
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Signed out", body = ApiResponse<String>)
    )
)]
#[instrument(skip(state, caller))]
pub async fn logout(
    State(state): State<AppState>,
    caller: Option<RequestContext>,
) -> (HeaderMap, Json<ApiResponse<String>>) {
    match caller {
        Some(ctx) => {
            state.identity.sign_out(&ctx.token).await;
            info!("User {} signed out", ctx.user_id);
        }
        None => debug!("Sign out without a session"),
    }
    let cookie = session_cookie(&state.settings.auth, "", 0);
    (
        with_cookie(cookie),
        Json(ApiResponse::ok(state.settings.routes.login.clone(), "Signed out")),
    )
}

/// Register a cashier account
#[utoipa::path(
    post,
    path = "/auth/sign-up",
    tag = "auth",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<ProfileDto>),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 403, description = "Registration disabled", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProfileDto>>), ApiError> {
    trace!("Entering sign_up function");
    if !state.settings.auth.allow_self_registration {
        debug!("Self registration attempted while disabled");
        return Err(api_error(
            StatusCode::FORBIDDEN,
            "REGISTRATION_DISABLED",
            "Self registration is disabled",
        ));
    }

    let new = NewAccount {
        email: request.email,
        password: request.password,
        fullname: request.fullname,
        role: None,
    };
    match directory::register_account(&state.db, state.identity.as_ref(), new).await {
        Ok(profile) => {
            info!("Self registered account {}", profile.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::ok(ProfileDto::from(profile), "Account created successfully")),
            ))
        }
        Err(e) => {
            error!("Self registration failed: {}", e);
            Err(directory_failure(e))
        }
    }
}

/// Describe the current session
#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionDto>),
        (status = 401, description = "No active session", body = ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn session(
    State(state): State<AppState>,
    caller: RequestContext,
) -> Json<ApiResponse<SessionDto>> {
    let home = state.settings.routes.home_for(&caller.claim).to_string();
    Json(ApiResponse::ok(
        SessionDto {
            token: caller.token,
            user_id: caller.user_id,
            email: caller.email,
            role: caller.claim.role(),
            home,
        },
        "Session is active",
    ))
}
