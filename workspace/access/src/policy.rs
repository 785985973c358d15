use model::entities::profile::Role;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::claim::{RoleClaim, Viewer};

/// Outcome of evaluating a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Redirect(String),
}

/// Route namespaces gated by the access policy.
///
/// The three role homes are disjoint prefixes; a path belongs to at most one
/// of them. Matching is segment aware: `/dashboard/admin` covers
/// `/dashboard/admin` and `/dashboard/admin/cashiers`, not `/dashboard/administrator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    pub login: String,
    pub superadmin_home: String,
    pub admin_home: String,
    pub cashier_home: String,
    /// Redirect-only paths that send a viewer to its role home.
    pub entry_points: Vec<String>,
    /// Paths served to everyone when matched exactly.
    pub public_paths: Vec<String>,
    /// Namespaces served to everyone.
    pub public_prefixes: Vec<String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            login: "/auth/login".to_string(),
            superadmin_home: "/dashboard/superadmin".to_string(),
            admin_home: "/dashboard/admin".to_string(),
            cashier_home: "/dashboard/cashier".to_string(),
            entry_points: vec!["/dashboard".to_string(), "/protected".to_string()],
            public_paths: vec!["/".to_string()],
            public_prefixes: vec![
                "/auth".to_string(),
                "/assets".to_string(),
                "/health".to_string(),
                "/swagger-ui".to_string(),
                "/api-docs".to_string(),
            ],
        }
    }
}

impl RouteTable {
    /// Whether the path is reachable without a session.
    pub fn is_public(&self, path: &str) -> bool {
        let path = normalize(path);
        self.public_paths.iter().any(|public| normalize(public) == path)
            || self.public_prefixes.iter().any(|prefix| is_under(path, prefix))
    }

    /// Home namespace of a claim. Anything that is not a known admin tier lands
    /// in the cashier area, the least privileged dashboard.
    pub fn home_for(&self, claim: &RoleClaim) -> &str {
        match claim {
            RoleClaim::Known(Role::Superadmin) => &self.superadmin_home,
            RoleClaim::Known(Role::Admin) => &self.admin_home,
            RoleClaim::Known(Role::Cashier) => &self.cashier_home,
            RoleClaim::Unrecognized(_) => &self.cashier_home,
        }
    }

    /// Decides whether `viewer` may see `path`.
    ///
    /// Order matters: public paths, then the session check, then the
    /// superadmin, admin and cashier namespaces, then the entry points.
    /// Anything left over is allowed.
    pub fn evaluate(&self, viewer: &Viewer, path: &str) -> AccessDecision {
        trace!("Evaluating access for {:?} on {}", viewer, path);
        let path = normalize(path);

        if self.is_public(path) {
            return AccessDecision::Allow;
        }

        let claim = match viewer {
            Viewer::Anonymous => {
                debug!("Anonymous request to {} sent to login", path);
                return self.redirect(&self.login);
            }
            Viewer::Signed(claim) => claim,
        };

        if is_under(path, &self.superadmin_home) {
            return match claim {
                RoleClaim::Known(Role::Superadmin) => AccessDecision::Allow,
                RoleClaim::Known(Role::Admin) => self.redirect(&self.admin_home),
                RoleClaim::Known(Role::Cashier) => self.redirect(&self.cashier_home),
                RoleClaim::Unrecognized(_) => self.redirect(&self.cashier_home),
            };
        }

        if is_under(path, &self.admin_home) {
            return match claim {
                RoleClaim::Known(Role::Superadmin | Role::Admin) => AccessDecision::Allow,
                RoleClaim::Known(Role::Cashier) => self.redirect(&self.cashier_home),
                RoleClaim::Unrecognized(_) => self.redirect(&self.cashier_home),
            };
        }

        if is_under(path, &self.cashier_home) {
            // Lowest tier: there is no dashboard below to fall back to.
            return match claim {
                RoleClaim::Known(_) => AccessDecision::Allow,
                RoleClaim::Unrecognized(_) => self.redirect(&self.login),
            };
        }

        if self.entry_points.iter().any(|entry| normalize(entry) == path) {
            return self.redirect(self.home_for(claim));
        }

        AccessDecision::Allow
    }

    fn redirect(&self, target: &str) -> AccessDecision {
        AccessDecision::Redirect(target.to_string())
    }
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = normalize(prefix);
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix == "/",
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN: &str = "/auth/login";
    const SUPERADMIN: &str = "/dashboard/superadmin";
    const ADMIN: &str = "/dashboard/admin";
    const CASHIER: &str = "/dashboard/cashier";

    fn allow() -> Option<&'static str> {
        None
    }

    fn to(target: &'static str) -> Option<&'static str> {
        Some(target)
    }

    fn viewers() -> [(&'static str, Viewer); 5] {
        [
            ("anonymous", Viewer::Anonymous),
            ("superadmin", Viewer::signed(Role::Superadmin)),
            ("admin", Viewer::signed(Role::Admin)),
            ("cashier", Viewer::signed(Role::Cashier)),
            ("unrecognized", Viewer::unrecognized()),
        ]
    }

    fn check(table: &RouteTable, path: &str, expected: [Option<&'static str>; 5]) {
        for ((label, viewer), expected) in viewers().iter().zip(expected) {
            let decision = table.evaluate(viewer, path);
            let wanted = match expected {
                None => AccessDecision::Allow,
                Some(target) => AccessDecision::Redirect(target.to_string()),
            };
            assert_eq!(decision, wanted, "viewer {} on {}", label, path);
        }
    }

    #[test]
    fn test_policy_table() {
        let table = RouteTable::default();
        // Columns: anonymous, superadmin, admin, cashier, unrecognized.
        let cases: Vec<(&str, [Option<&'static str>; 5])> = vec![
            ("/", [allow(), allow(), allow(), allow(), allow()]),
            ("/auth/login", [allow(), allow(), allow(), allow(), allow()]),
            ("/auth/sign-up", [allow(), allow(), allow(), allow(), allow()]),
            ("/assets/logo.svg", [allow(), allow(), allow(), allow(), allow()]),
            ("/health", [allow(), allow(), allow(), allow(), allow()]),
            (SUPERADMIN, [to(LOGIN), allow(), to(ADMIN), to(CASHIER), to(CASHIER)]),
            (
                "/dashboard/superadmin/accounts",
                [to(LOGIN), allow(), to(ADMIN), to(CASHIER), to(CASHIER)],
            ),
            (ADMIN, [to(LOGIN), allow(), allow(), to(CASHIER), to(CASHIER)]),
            (
                "/dashboard/admin/cashiers",
                [to(LOGIN), allow(), allow(), to(CASHIER), to(CASHIER)],
            ),
            (CASHIER, [to(LOGIN), allow(), allow(), allow(), to(LOGIN)]),
            ("/dashboard/cashier/profile", [to(LOGIN), allow(), allow(), allow(), to(LOGIN)]),
            ("/dashboard", [to(LOGIN), to(SUPERADMIN), to(ADMIN), to(CASHIER), to(CASHIER)]),
            ("/protected", [to(LOGIN), to(SUPERADMIN), to(ADMIN), to(CASHIER), to(CASHIER)]),
            ("/settings", [to(LOGIN), allow(), allow(), allow(), allow()]),
        ];

        for (path, expected) in cases {
            check(&table, path, expected);
        }
    }

    #[test]
    fn test_redirect_scenarios() {
        let table = RouteTable::default();
        assert_eq!(
            table.evaluate(&Viewer::Anonymous, "/dashboard/admin"),
            AccessDecision::Redirect(LOGIN.to_string())
        );
        assert_eq!(
            table.evaluate(&Viewer::signed(Role::Cashier), "/dashboard/superadmin"),
            AccessDecision::Redirect(CASHIER.to_string())
        );
        assert_eq!(
            table.evaluate(&Viewer::signed(Role::Superadmin), "/dashboard"),
            AccessDecision::Redirect(SUPERADMIN.to_string())
        );
    }

    #[test]
    fn test_trailing_slashes_are_ignored() {
        let table = RouteTable::default();
        check(&table, "/dashboard/", [to(LOGIN), to(SUPERADMIN), to(ADMIN), to(CASHIER), to(CASHIER)]);
        check(&table, "/dashboard/admin/", [to(LOGIN), allow(), allow(), to(CASHIER), to(CASHIER)]);
    }

    #[test]
    fn test_prefixes_match_whole_segments() {
        let table = RouteTable::default();
        // Not under any role namespace, so a signed-in cashier is let through.
        assert_eq!(
            table.evaluate(&Viewer::signed(Role::Cashier), "/dashboard/administrator"),
            AccessDecision::Allow
        );
        assert!(!table.is_public("/authors"));
        assert!(table.is_public("/auth"));
        assert!(table.is_public("/"));
        assert!(!table.is_public("/dashboard"));
    }

    #[test]
    fn test_home_for_every_claim() {
        let table = RouteTable::default();
        assert_eq!(table.home_for(&Role::Superadmin.into()), SUPERADMIN);
        assert_eq!(table.home_for(&Role::Admin.into()), ADMIN);
        assert_eq!(table.home_for(&Role::Cashier.into()), CASHIER);
        assert_eq!(table.home_for(&RoleClaim::Unrecognized(Some("MANAGER".into()))), CASHIER);
    }

    #[test]
    fn test_custom_table_is_honoured() {
        let table = RouteTable {
            login: "/signin".to_string(),
            public_prefixes: vec!["/signin".to_string()],
            ..RouteTable::default()
        };
        assert_eq!(
            table.evaluate(&Viewer::Anonymous, "/dashboard/cashier"),
            AccessDecision::Redirect("/signin".to_string())
        );
        assert_eq!(table.evaluate(&Viewer::Anonymous, "/signin"), AccessDecision::Allow);
        assert_eq!(
            table.evaluate(&Viewer::Anonymous, "/auth/login"),
            AccessDecision::Redirect("/signin".to_string())
        );
    }
}
