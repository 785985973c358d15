pub mod admin;
pub mod auth;
pub mod cashier;
pub mod health;
pub mod superadmin;

use access::ScopeError;
use axum::{http::StatusCode, response::Json};
use common::{ListingState, ProfilePage, Role};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::directory::{DirectoryError, NewAccount};
use crate::identity::IdentityError;
use crate::schemas::{ApiError, ErrorResponse, api_error};

/// Query parameters of the account listings
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ListingQuery {
    /// Case-insensitive fragment of the full name
    pub search: Option<String>,
    /// Page number (default: 1)
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    /// Rows per page (default: 10)
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<u64>,
}

impl ListingQuery {
    pub fn paginate(self, profiles: Vec<common::ProfileDto>) -> ProfilePage {
        ListingState::new(self.search, self.page, self.page_size).apply(profiles)
    }
}

/// Request body for creating an account from a management area
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    pub fullname: String,
    /// Defaults to CASHIER
    pub role: Option<Role>,
}

impl From<CreateAccountRequest> for NewAccount {
    fn from(request: CreateAccountRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            fullname: request.fullname,
            role: request.role,
        }
    }
}

/// Request body for changing a full name
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RenameRequest {
    pub fullname: String,
}

/// Maps store and policy failures onto HTTP errors.
pub(crate) fn directory_failure(err: DirectoryError) -> ApiError {
    match err {
        DirectoryError::MissingFields => {
            api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
        }
        DirectoryError::NotFound(_) | DirectoryError::Scope(ScopeError::OutOfScope { .. }) => {
            api_error(StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND", "Profile not found")
        }
        DirectoryError::Scope(ScopeError::RoleNotAssignable { .. }) => {
            api_error(StatusCode::FORBIDDEN, "ROLE_NOT_ASSIGNABLE", err.to_string())
        }
        DirectoryError::SelfDeletion(_) => {
            api_error(StatusCode::CONFLICT, "SELF_DELETION", "You cannot delete your own account")
        }
        DirectoryError::Identity(identity) => identity_failure(identity),
        DirectoryError::Database(db_error) => {
            error!("Database error: {}", db_error);
            database_error()
        }
    }
}

pub(crate) fn identity_failure(err: IdentityError) -> ApiError {
    match err {
        IdentityError::EmailTaken { .. } => {
            api_error(StatusCode::CONFLICT, "EMAIL_ALREADY_REGISTERED", err.to_string())
        }
        IdentityError::InvalidCredentials => {
            api_error(StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", err.to_string())
        }
        IdentityError::Hashing(_) => {
            error!("{}", err);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Failed to process credentials")
        }
        IdentityError::Database(db_error) => {
            error!("Database error: {}", db_error);
            database_error()
        }
    }
}

pub(crate) fn database_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("DATABASE_ERROR", "Internal server error while accessing the database")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_error_codes() {
        let cases = [
            (DirectoryError::MissingFields, StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (DirectoryError::NotFound("x".into()), StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND"),
            (
                DirectoryError::Scope(ScopeError::OutOfScope { profile_id: "x".into() }),
                StatusCode::NOT_FOUND,
                "PROFILE_NOT_FOUND",
            ),
            (
                DirectoryError::Scope(ScopeError::RoleNotAssignable { requested: Role::Admin }),
                StatusCode::FORBIDDEN,
                "ROLE_NOT_ASSIGNABLE",
            ),
            (DirectoryError::SelfDeletion("x".into()), StatusCode::CONFLICT, "SELF_DELETION"),
            (
                DirectoryError::Identity(IdentityError::EmailTaken { email: "e".into() }),
                StatusCode::CONFLICT,
                "EMAIL_ALREADY_REGISTERED",
            ),
            (
                DirectoryError::Database(DbErr::Custom("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            let (got_status, Json(body)) = directory_failure(err);
            assert_eq!(got_status, status);
            assert_eq!(body.code, code);
            assert!(!body.success);
        }
    }

    #[test]
    fn test_missing_fields_message() {
        let (_, Json(body)) = directory_failure(DirectoryError::MissingFields);
        assert_eq!(body.error, "All fields are required");
    }
}
