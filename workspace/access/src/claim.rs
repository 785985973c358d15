use model::entities::profile::Role;
use tracing::warn;

/// The role a signed-in identity presents, as read from its profile row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleClaim {
    Known(Role),
    /// The identity has no profile, or the stored role is not one of the
    /// known tiers. Keeps the raw value for logging.
    Unrecognized(Option<String>),
}

impl RoleClaim {
    /// Builds a claim from the raw role column, `None` meaning no profile row.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(value) => match value.parse::<Role>() {
                Ok(role) => RoleClaim::Known(role),
                Err(err) => {
                    warn!("Profile carries an unrecognized role: {}", err);
                    RoleClaim::Unrecognized(Some(value.to_string()))
                }
            },
            None => RoleClaim::Unrecognized(None),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            RoleClaim::Known(role) => Some(*role),
            RoleClaim::Unrecognized(_) => None,
        }
    }
}

impl From<Role> for RoleClaim {
    fn from(role: Role) -> Self {
        RoleClaim::Known(role)
    }
}

/// Who is asking for a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    Signed(RoleClaim),
}

impl Viewer {
    pub fn signed(role: Role) -> Self {
        Viewer::Signed(RoleClaim::Known(role))
    }

    pub fn unrecognized() -> Self {
        Viewer::Signed(RoleClaim::Unrecognized(None))
    }
}
