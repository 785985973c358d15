//! Profile store operations behind the dashboards and management panels.

use access::{ListingScope, ScopeError};
use common::{CashierCounts, ProfileDto, RoleCounts};
use model::entities::{credential, profile, profile::Role};
use sea_orm::prelude::DateTimeUtc;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::identity::{IdentityError, IdentityProvider};

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Profile {0} not found")]
    NotFound(String),

    #[error("Account {0} cannot delete itself")]
    SelfDeletion(String),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Input of every account creation path.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub fullname: String,
    /// `None` means the default role, CASHIER.
    pub role: Option<Role>,
}

impl NewAccount {
    fn ensure_complete(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.trim().is_empty() || self.fullname.trim().is_empty() {
            return Err(DirectoryError::MissingFields);
        }
        Ok(())
    }
}

/// Registers the identity and inserts its profile in one transaction.
async fn insert_account(
    db: &DatabaseConnection,
    identity: &dyn IdentityProvider,
    new: NewAccount,
    role: Role,
    created_by: Option<String>,
) -> Result<profile::Model> {
    let txn = db.begin().await?;

    let id = identity.register(&txn, &new.email, &new.password).await?;
    let row = profile::ActiveModel {
        id: Set(id),
        fullname: Set(new.fullname.trim().to_string()),
        role: Set(role),
        created_by: Set(created_by),
        created_at: Set(chrono::Utc::now()),
        is_active: Set(true),
    };
    let created = row.insert(&txn).await?;

    txn.commit().await?;
    info!(
        "Account {} created with role {} by {:?}",
        created.id, created.role, created.created_by
    );
    Ok(created)
}

/// Creates an account from a management area. The role is checked against
/// what `scope` may hand out and `created_by` records the creator.
pub async fn create_account(
    db: &DatabaseConnection,
    identity: &dyn IdentityProvider,
    scope: &ListingScope,
    creator_id: &str,
    new: NewAccount,
) -> Result<profile::Model> {
    trace!("Creating account from {:?}", scope);
    new.ensure_complete()?;
    let role = scope.assignable_role(new.role)?;
    insert_account(db, identity, new, role, Some(creator_id.to_string())).await
}

/// Self sign-up and bootstrap path. Without a role the account is a cashier.
pub async fn register_account(
    db: &DatabaseConnection,
    identity: &dyn IdentityProvider,
    new: NewAccount,
) -> Result<profile::Model> {
    new.ensure_complete()?;
    let role = new.role.unwrap_or(Role::Cashier);
    insert_account(db, identity, new, role, None).await
}

/// A profile row with the role read as text. Rows holding a role outside the
/// known tiers still load, list and can be managed from the superadmin area.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ProfileRecord {
    pub id: String,
    pub fullname: String,
    pub role: String,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub is_active: bool,
}

impl ProfileRecord {
    /// `None` when the stored role is none of the known tiers.
    pub fn known_role(&self) -> Option<Role> {
        match self.role.parse() {
            Ok(role) => Some(role),
            Err(err) => {
                warn!("Profile {} holds an {}", self.id, err);
                None
            }
        }
    }
}

impl From<ProfileRecord> for ProfileDto {
    fn from(record: ProfileRecord) -> Self {
        Self {
            role: record.known_role(),
            id: record.id,
            fullname: record.fullname,
            created_by: record.created_by,
            created_at: record.created_at,
            is_active: record.is_active,
        }
    }
}

/// Every profile admitted by `scope`, newest first.
pub async fn list_profiles(db: &DatabaseConnection, scope: &ListingScope) -> Result<Vec<ProfileRecord>> {
    let mut query = profile::Entity::find();
    if let ListingScope::CashiersCreatedBy(owner) = scope {
        query = query
            .filter(profile::Column::Role.eq(Role::Cashier))
            .filter(profile::Column::CreatedBy.eq(owner.as_str()));
    }

    let rows = query
        .order_by_desc(profile::Column::CreatedAt)
        .order_by_asc(profile::Column::Id)
        .into_model::<ProfileRecord>()
        .all(db)
        .await?;
    debug!("Listed {} profiles for {:?}", rows.len(), scope);
    Ok(rows)
}

pub async fn find_profile(db: &DatabaseConnection, id: &str) -> Result<Option<profile::Model>> {
    Ok(profile::Entity::find_by_id(id.to_string()).one(db).await?)
}

/// Raw role and active flag of a profile. The role is read as text so a
/// value outside the known tiers still comes back.
pub async fn role_record(db: &DatabaseConnection, id: &str) -> Result<Option<(String, bool)>> {
    Ok(profile::Entity::find_by_id(id.to_string())
        .select_only()
        .column(profile::Column::Role)
        .column(profile::Column::IsActive)
        .into_tuple::<(String, bool)>()
        .one(db)
        .await?)
}

/// Looks a profile up and checks it lies in `scope`.
pub async fn find_in_scope(db: &DatabaseConnection, scope: &ListingScope, id: &str) -> Result<ProfileRecord> {
    let Some(found) = profile::Entity::find_by_id(id.to_string())
        .into_model::<ProfileRecord>()
        .one(db)
        .await?
    else {
        debug!("Profile {} does not exist", id);
        return Err(DirectoryError::NotFound(id.to_string()));
    };
    scope.ensure_admits(&found.id, found.known_role(), found.created_by.as_deref())?;
    Ok(found)
}

/// Writes one column of a profile without decoding the rest of the row.
async fn update_column(db: &DatabaseConnection, id: &str, column: profile::Column, value: SimpleExpr) -> Result<()> {
    profile::Entity::update_many()
        .col_expr(column, value)
        .filter(profile::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Flips `is_active` on one profile.
pub async fn toggle_active(db: &DatabaseConnection, scope: &ListingScope, id: &str) -> Result<ProfileRecord> {
    let found = find_in_scope(db, scope, id).await?;
    let next = !found.is_active;

    update_column(db, &found.id, profile::Column::IsActive, Expr::value(next)).await?;
    info!("Profile {} is now {}", found.id, if next { "active" } else { "inactive" });
    Ok(ProfileRecord { is_active: next, ..found })
}

pub async fn rename(db: &DatabaseConnection, scope: &ListingScope, id: &str, fullname: &str) -> Result<ProfileRecord> {
    let fullname = fullname.trim();
    if fullname.is_empty() {
        return Err(DirectoryError::MissingFields);
    }
    let found = find_in_scope(db, scope, id).await?;

    update_column(db, &found.id, profile::Column::Fullname, Expr::value(fullname)).await?;
    debug!("Profile {} renamed", found.id);
    Ok(ProfileRecord {
        fullname: fullname.to_string(),
        ..found
    })
}

/// Renames the caller's own profile.
pub async fn rename_own(db: &DatabaseConnection, id: &str, fullname: &str) -> Result<ProfileRecord> {
    rename(db, &ListingScope::Everyone, id, fullname).await
}

/// Removes a profile and its credentials together.
pub async fn delete_account(db: &DatabaseConnection, scope: &ListingScope, actor_id: &str, id: &str) -> Result<()> {
    if actor_id == id {
        warn!("Profile {} tried to delete itself", id);
        return Err(DirectoryError::SelfDeletion(id.to_string()));
    }
    let found = find_in_scope(db, scope, id).await?;

    let txn = db.begin().await?;
    profile::Entity::delete_by_id(found.id.clone()).exec(&txn).await?;
    credential::Entity::delete_by_id(found.id.clone()).exec(&txn).await?;
    txn.commit().await?;

    info!("Account {} deleted by {}", found.id, actor_id);
    Ok(())
}

/// Profiles per role, for the superadmin dashboard. Rows with a role outside
/// the known tiers are counted apart and still make up the total.
pub async fn role_counts(db: &DatabaseConnection) -> Result<RoleCounts> {
    let mut counts = [0u64; 3];
    for (slot, role) in counts.iter_mut().zip(Role::ALL) {
        *slot = profile::Entity::find()
            .filter(profile::Column::Role.eq(role))
            .count(db)
            .await?;
    }
    let all = profile::Entity::find().count(db).await?;
    let known: u64 = counts.iter().sum();
    if all > known {
        warn!("{} profiles hold an unrecognized role", all - known);
    }

    let [superadmins, admins, cashiers] = counts;
    Ok(RoleCounts::new(superadmins, admins, cashiers).with_unrecognized(all.saturating_sub(known)))
}

/// Cashiers created by `owner`, for the admin dashboard.
pub async fn cashier_counts(db: &DatabaseConnection, owner: &str) -> Result<CashierCounts> {
    let owned = profile::Entity::find()
        .filter(profile::Column::Role.eq(Role::Cashier))
        .filter(profile::Column::CreatedBy.eq(owner));

    let cashiers = owned.clone().count(db).await?;
    let active_cashiers = owned
        .filter(profile::Column::IsActive.eq(true))
        .count(db)
        .await?;
    Ok(CashierCounts {
        cashiers,
        active_cashiers,
    })
}
