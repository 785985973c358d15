use model::entities::profile::Role;
use thiserror::Error;

/// Violations of the row-level management rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// The caller may not hand out this role.
    #[error("Role {requested} cannot be assigned from this area")]
    RoleNotAssignable { requested: Role },

    /// The profile exists but lies outside what the caller manages.
    #[error("Profile {profile_id} is not managed from this area")]
    OutOfScope { profile_id: String },
}

/// Type alias for Result with ScopeError
pub type Result<T> = std::result::Result<T, ScopeError>;
