use serde::{Deserialize, Serialize};
use sea_orm::entity::prelude::*;
use std::{fmt, str::FromStr};
use thiserror::Error;
use utoipa::ToSchema;

/// The three account tiers of the point-of-sale system, highest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "SUPERADMIN")]
    Superadmin,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "CASHIER")]
    Cashier,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Superadmin, Role::Admin, Role::Cashier];

    /// Stored representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "SUPERADMIN",
            Role::Admin => "ADMIN",
            Role::Cashier => "CASHIER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored or submitted role is none of the known tiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SUPERADMIN" => Ok(Role::Superadmin),
            "ADMIN" => Ok(Role::Admin),
            "CASHIER" => Ok(Role::Cashier),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Per-account record holding the role and display metadata.
/// The primary key is the id of the credential it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub fullname: String,
    pub role: Role,
    /// Profile that created this one; `None` for self-registered and bootstrap accounts.
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::credential::Entity",
        from = "Column::Id",
        to = "super::credential::Column::Id"
    )]
    Credential,
    #[sea_orm(belongs_to = "Entity", from = "Column::CreatedBy", to = "Column::Id")]
    Creator,
}

impl Related<super::credential::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Credential.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_its_stored_name() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_role_parsing_is_case_sensitive() {
        assert_eq!("cashier".parse::<Role>(), Err(UnknownRole("cashier".to_string())));
        assert!("MANAGER".parse::<Role>().is_err());
    }
}
