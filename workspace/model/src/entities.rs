//! SeaORM entities of the point-of-sale account store.
//! A credential row belongs to the identity side, a profile row carries the
//! role-related metadata; both share the same id.

pub mod credential;
pub mod profile;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::credential::Entity as Credential;
    pub use super::profile::Entity as Profile;
    pub use super::profile::Role;
}
