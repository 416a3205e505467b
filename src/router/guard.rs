//! Navigation guard: decides whether a route transition may proceed.
//!
//! Evaluation order for a target route:
//!
//! 1. public route: allow
//! 2. no session: redirect to login with `redirect=<full path>`
//! 3. password change pending and target is not change-password: redirect
//!    to change-password (ahead of any role check)
//! 4. role-restricted route and role not listed: redirect to dashboard
//! 5. allow
//!
//! The decision reads only its arguments, so it runs synchronously on every
//! transition and never waits on in-flight requests.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::routes::{self, Access, RouteTable};
use crate::net::types::Role;

/// Query parameter carrying the originally requested location.
pub const REDIRECT_PARAM: &str = "redirect";

/// The parts of the session the guard reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub logged_in: bool,
    pub role: Option<Role>,
    pub password_change_required: bool,
}

/// The route a transition is heading to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target<'a> {
    /// Route name, `None` for locations no route matches.
    pub name: Option<&'a str>,
    /// Requested location including query string.
    pub full_path: &'a str,
    pub access: Access,
}

impl<'a> Target<'a> {
    /// Resolve `full_path` against `table`. Unmatched locations require a
    /// session but no particular role.
    #[must_use]
    pub fn resolve(table: &'a RouteTable, full_path: &'a str) -> Self {
        match table.resolve(full_path) {
            Some(route) => Self { name: Some(route.name), full_path, access: route.access },
            None => Self { name: None, full_path, access: Access::Authenticated },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    /// Name of the destination route.
    pub route: &'static str,
    pub query: Vec<(String, String)>,
}

impl Redirect {
    #[must_use]
    pub fn to(route: &'static str) -> Self {
        Self { route, query: Vec::new() }
    }

    /// Value of a query parameter on this redirect.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Location string for the router, with a form-encoded query.
    #[must_use]
    pub fn href(&self, table: &RouteTable) -> String {
        let path = table.path_of(self.route);
        if self.query.is_empty() {
            return path.to_owned();
        }
        match serde_urlencoded::to_string(&self.query) {
            Ok(query) => format!("{path}?{query}"),
            Err(_) => path.to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Redirect),
}

impl Decision {
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decide a transition to `target` for a session in state `session`.
#[must_use]
pub fn evaluate(target: &Target<'_>, session: &SessionSnapshot) -> Decision {
    if target.access.is_public() {
        return Decision::Allow;
    }

    if !session.logged_in {
        return Decision::Redirect(Redirect {
            route: routes::LOGIN,
            query: vec![(REDIRECT_PARAM.to_owned(), target.full_path.to_owned())],
        });
    }

    if session.password_change_required && target.name != Some(routes::CHANGE_PASSWORD) {
        return Decision::Redirect(Redirect::to(routes::CHANGE_PASSWORD));
    }

    if let Some(roles) = target.access.roles() {
        let permitted = session.role.is_some_and(|role| roles.contains(&role));
        if !permitted {
            return Decision::Redirect(Redirect::to(routes::DASHBOARD));
        }
    }

    Decision::Allow
}

/// Resolve `full_path` in `table` and evaluate it.
#[must_use]
pub fn check(table: &RouteTable, full_path: &str, session: &SessionSnapshot) -> Decision {
    evaluate(&Target::resolve(table, full_path), session)
}

/// Where to go once a login form succeeds.
///
/// A locked session always lands on change-password. Otherwise the
/// redirect hint is used only when it is a local absolute path.
#[must_use]
pub fn post_login_path(table: &RouteTable, redirect_hint: Option<&str>, session: &SessionSnapshot) -> String {
    if session.password_change_required {
        return table.path_of(routes::CHANGE_PASSWORD).to_owned();
    }
    match redirect_hint {
        Some(hint) if is_local_path(hint) => hint.to_owned(),
        _ => table.path_of(routes::DASHBOARD).to_owned(),
    }
}

fn is_local_path(hint: &str) -> bool {
    hint.starts_with('/') && !hint.starts_with("//") && !hint.contains('\\')
}
