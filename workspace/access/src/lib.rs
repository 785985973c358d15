//! Role-based access policy of the point-of-sale service.
//!
//! Everything here is pure: the caller resolves who is asking (a [`Viewer`])
//! and the [`RouteTable`] decides whether the requested path is served or
//! redirected. [`ListingScope`] carries the row-level rules applied by the
//! account management panels.

pub mod claim;
pub mod error;
pub mod policy;
pub mod scope;

pub use claim::{RoleClaim, Viewer};
pub use error::ScopeError;
pub use policy::{AccessDecision, RouteTable};
pub use scope::ListingScope;
pub use model::entities::profile::Role;
