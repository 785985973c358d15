//! Access gate run in front of every route.
//!
//! Resolves the session of the request into a [`Viewer`], asks the route table
//! for a decision and either forwards the request with a [`RequestContext`]
//! attached or answers with a temporary redirect.

use access::{AccessDecision, RoleClaim, Viewer};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, error, trace};

use crate::directory;
use crate::schemas::{ApiError, AppState, api_error};

/// The signed-in caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: String,
    pub email: String,
    pub claim: RoleClaim,
    pub token: String,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", "No active session"))
    }
}

/// Session token from `Authorization: Bearer ...`, falling back to the cookie.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Looks up who holds `token`. Returns `None` for unknown or expired tokens
/// and, when the active flag is enforced, for deactivated profiles.
async fn resolve_caller(state: &AppState, token: &str) -> Option<RequestContext> {
    let identity = match state.identity.current_user(token).await {
        Ok(Some(identity)) => identity,
        Ok(None) => return None,
        Err(e) => {
            error!("Session lookup failed: {}", e);
            return None;
        }
    };

    let claim = match directory::role_record(&state.db, &identity.user_id).await {
        Ok(Some((role, is_active))) => {
            if !is_active && state.settings.auth.enforce_active_flag {
                debug!("Profile {} is deactivated, treating as signed out", identity.user_id);
                return None;
            }
            RoleClaim::from_raw(Some(&role))
        }
        Ok(None) => {
            debug!("Identity {} has no profile", identity.user_id);
            RoleClaim::from_raw(None)
        }
        Err(e) => {
            error!("Role lookup for {} failed: {}", identity.user_id, e);
            RoleClaim::Unrecognized(None)
        }
    };

    Some(RequestContext {
        user_id: identity.user_id,
        email: identity.email,
        claim,
        token: token.to_string(),
    })
}

pub async fn access_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    trace!("Gate checking {}", path);

    let caller = match session_token(request.headers(), &state.settings.auth.cookie_name) {
        Some(token) => resolve_caller(&state, &token).await,
        None => None,
    };
    let viewer = match &caller {
        Some(ctx) => Viewer::Signed(ctx.claim.clone()),
        None => Viewer::Anonymous,
    };

    match state.settings.routes.evaluate(&viewer, &path) {
        AccessDecision::Allow => {
            if let Some(ctx) = caller {
                request.extensions_mut().insert(ctx);
            }
            next.run(request).await
        }
        AccessDecision::Redirect(target) => {
            debug!("Redirecting {:?} from {} to {}", viewer, path, target);
            Redirect::temporary(&target).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_bearer_token_wins_over_cookie() {
        let map = headers(&[
            (header::AUTHORIZATION, "Bearer abc"),
            (header::COOKIE, "posgate_session=def"),
        ]);
        assert_eq!(session_token(&map, "posgate_session").as_deref(), Some("abc"));
    }

    #[test]
    fn test_cookie_is_found_among_others() {
        let map = headers(&[(header::COOKIE, "theme=dark; posgate_session=def; lang=en")]);
        assert_eq!(session_token(&map, "posgate_session").as_deref(), Some("def"));

        let split = headers(&[(header::COOKIE, "theme=dark"), (header::COOKIE, "posgate_session=xyz")]);
        assert_eq!(session_token(&split, "posgate_session").as_deref(), Some("xyz"));
    }

    #[test]
    fn test_missing_or_empty_tokens() {
        assert_eq!(session_token(&HeaderMap::new(), "posgate_session"), None);
        let map = headers(&[
            (header::AUTHORIZATION, "Basic Zm9vOmJhcg=="),
            (header::COOKIE, "posgate_session="),
        ]);
        assert_eq!(session_token(&map, "posgate_session"), None);
    }
}
