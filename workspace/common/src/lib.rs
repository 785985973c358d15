//! Common transport-layer types of the point-of-sale service.
//! These structs are the payloads of the dashboard handlers, shared so that
//! clients can deserialize responses without duplicating shapes.

mod listing;

pub use listing::{
    DEFAULT_PAGE_SIZE, ListingState, MAX_PAGE_SIZE, PAGE_LINK_SIBLINGS, PageLink, PageWindow,
    ProfilePage, filter_by_fullname, page_links,
};
pub use model::entities::profile::Role;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

// ===================== Profiles =====================

/// A profile row as shown in the account management panels.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProfileDto {
    pub id: String,
    pub fullname: String,
    /// `None` when the stored role is none of the known tiers.
    pub role: Option<Role>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<model::entities::profile::Model> for ProfileDto {
    fn from(model: model::entities::profile::Model) -> Self {
        Self {
            id: model.id,
            fullname: model.fullname,
            role: Some(model.role),
            created_by: model.created_by,
            created_at: model.created_at,
            is_active: model.is_active,
        }
    }
}

// ===================== Sessions =====================

/// Issued on sign in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SessionDto {
    /// Bearer token, also set as the session cookie.
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub role: Option<Role>,
    /// Dashboard the client should navigate to.
    pub home: String,
}

/// Description of the sign-in form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LoginFormDto {
    pub action: String,
    pub fields: Vec<String>,
    pub sign_up_enabled: bool,
}

// ===================== Dashboards =====================

/// Superadmin dashboard: profiles per role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
pub struct RoleCounts {
    pub superadmins: u64,
    pub admins: u64,
    pub cashiers: u64,
    /// Profiles whose stored role is none of the known tiers.
    pub unrecognized: u64,
    pub total: u64,
}

impl RoleCounts {
    pub fn new(superadmins: u64, admins: u64, cashiers: u64) -> Self {
        Self {
            superadmins,
            admins,
            cashiers,
            unrecognized: 0,
            total: superadmins + admins + cashiers,
        }
    }

    pub fn with_unrecognized(mut self, unrecognized: u64) -> Self {
        self.unrecognized = unrecognized;
        self.total += unrecognized;
        self
    }
}

/// Admin dashboard: the cashiers managed by the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
pub struct CashierCounts {
    pub cashiers: u64,
    pub active_cashiers: u64,
}

/// Cashier dashboard. Sales figures are not tracked yet and stay at zero.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TerminalSnapshot {
    pub profile: ProfileDto,
    pub transactions_today: u64,
    pub sales_today: String,
    pub status: String,
}

impl TerminalSnapshot {
    pub fn idle(profile: ProfileDto) -> Self {
        Self {
            profile,
            transactions_today: 0,
            sales_today: "0.00".to_string(),
            status: "ready".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_counts_total() {
        let counts = RoleCounts::new(1, 2, 7);
        assert_eq!(counts.total, 10);

        let counts = counts.with_unrecognized(2);
        assert_eq!(counts.unrecognized, 2);
        assert_eq!(counts.total, 12);
    }

    #[test]
    fn test_profile_dto_wire_format() {
        let dto = ProfileDto {
            id: "C1".to_string(),
            fullname: "Cora Cashier".to_string(),
            role: Some(Role::Cashier),
            created_by: Some("A1".to_string()),
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            is_active: true,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["role"], "CASHIER");
        assert_eq!(json["created_by"], "A1");
        assert_eq!(json["is_active"], true);

        let back: ProfileDto = serde_json::from_value(json).unwrap();
        assert_eq!(back, dto);
    }

    #[test]
    fn test_idle_terminal_is_zeroed() {
        let profile = ProfileDto {
            id: "C1".to_string(),
            fullname: "Cora".to_string(),
            role: Some(Role::Cashier),
            created_by: None,
            created_at: Utc::now(),
            is_active: true,
        };
        let snapshot = TerminalSnapshot::idle(profile);
        assert_eq!(snapshot.transactions_today, 0);
        assert_eq!(snapshot.sales_today, "0.00");
        assert_eq!(snapshot.status, "ready");
    }
}
