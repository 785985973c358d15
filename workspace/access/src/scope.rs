use model::entities::profile::Role;
use tracing::debug;

use crate::error::{Result, ScopeError};

/// Which profile rows an account management area lists and may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingScope {
    /// The superadmin area: every profile.
    Everyone,
    /// The admin area: cashiers created by the given profile id.
    CashiersCreatedBy(String),
}

impl ListingScope {
    /// Whether a profile with this role and creator is visible in the scope.
    /// A `None` role is a stored value outside the known tiers; only the
    /// superadmin area sees such rows.
    pub fn admits(&self, role: Option<Role>, created_by: Option<&str>) -> bool {
        match self {
            ListingScope::Everyone => true,
            ListingScope::CashiersCreatedBy(owner) => {
                role == Some(Role::Cashier) && created_by == Some(owner.as_str())
            }
        }
    }

    /// Like [`ListingScope::admits`] but reports the refusal.
    pub fn ensure_admits(&self, profile_id: &str, role: Option<Role>, created_by: Option<&str>) -> Result<()> {
        if self.admits(role, created_by) {
            Ok(())
        } else {
            debug!("Profile {} is outside {:?}", profile_id, self);
            Err(ScopeError::OutOfScope {
                profile_id: profile_id.to_string(),
            })
        }
    }

    /// Role given to an account created from this area. Accounts default to
    /// cashiers; only the superadmin area hands out other roles.
    pub fn assignable_role(&self, requested: Option<Role>) -> Result<Role> {
        match (self, requested) {
            (_, None) => Ok(Role::Cashier),
            (ListingScope::Everyone, Some(role)) => Ok(role),
            (ListingScope::CashiersCreatedBy(_), Some(Role::Cashier)) => Ok(Role::Cashier),
            (ListingScope::CashiersCreatedBy(_), Some(requested)) => {
                Err(ScopeError::RoleNotAssignable { requested })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everyone_admits_every_row() {
        let scope = ListingScope::Everyone;
        for role in Role::ALL {
            assert!(scope.admits(Some(role), None));
            assert!(scope.admits(Some(role), Some("anyone")));
        }
        assert!(scope.admits(None, Some("anyone")));
    }

    #[test]
    fn test_admin_scope_admits_only_own_cashiers() {
        let scope = ListingScope::CashiersCreatedBy("A1".to_string());
        assert!(scope.admits(Some(Role::Cashier), Some("A1")));
        assert!(!scope.admits(Some(Role::Cashier), Some("A2")));
        assert!(!scope.admits(Some(Role::Cashier), None));
        assert!(!scope.admits(Some(Role::Admin), Some("A1")));
        assert!(!scope.admits(Some(Role::Superadmin), Some("A1")));
        assert!(!scope.admits(None, Some("A1")));
    }

    #[test]
    fn test_ensure_admits_names_the_profile() {
        let scope = ListingScope::CashiersCreatedBy("A1".to_string());
        assert_eq!(scope.ensure_admits("C1", Some(Role::Cashier), Some("A1")), Ok(()));
        assert_eq!(
            scope.ensure_admits("C9", Some(Role::Cashier), Some("A2")),
            Err(ScopeError::OutOfScope { profile_id: "C9".to_string() })
        );
    }

    #[test]
    fn test_assignable_roles() {
        let everyone = ListingScope::Everyone;
        assert_eq!(everyone.assignable_role(None), Ok(Role::Cashier));
        for role in Role::ALL {
            assert_eq!(everyone.assignable_role(Some(role)), Ok(role));
        }

        let admin = ListingScope::CashiersCreatedBy("A1".to_string());
        assert_eq!(admin.assignable_role(None), Ok(Role::Cashier));
        assert_eq!(admin.assignable_role(Some(Role::Cashier)), Ok(Role::Cashier));
        assert_eq!(
            admin.assignable_role(Some(Role::Admin)),
            Err(ScopeError::RoleNotAssignable { requested: Role::Admin })
        );
        assert_eq!(
            admin.assignable_role(Some(Role::Superadmin)),
            Err(ScopeError::RoleNotAssignable { requested: Role::Superadmin })
        );
    }
}
