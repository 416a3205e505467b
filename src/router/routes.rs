//! Route metadata for the diary application.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::net::types::Role;

pub const LOGIN: &str = "login";
pub const SIGNUP: &str = "signup";
pub const PENDING_APPROVAL: &str = "pending-approval";
pub const CHANGE_PASSWORD: &str = "change-password";
pub const DASHBOARD: &str = "dashboard";
pub const STUDENTS: &str = "students";
pub const ATTENDANCE: &str = "attendance";
pub const COUNSEL: &str = "counsel";
pub const GRADES: &str = "grades";
pub const ADMIN_USERS: &str = "admin-users";

const STAFF: &[Role] = &[Role::Teacher, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Who may enter a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Access {
    /// Anyone, logged in or not.
    Public,
    /// Any logged-in user.
    #[default]
    Authenticated,
    /// Logged-in users holding one of these roles.
    Roles(&'static [Role]),
}

impl Access {
    #[must_use]
    pub fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }

    /// Role restriction, if any.
    #[must_use]
    pub fn roles(self) -> Option<&'static [Role]> {
        match self {
            Self::Roles(roles) => Some(roles),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub access: Access,
}

impl Route {
    #[must_use]
    pub const fn new(name: &'static str, path: &'static str, access: Access) -> Self {
        Self { name, path, access }
    }
}

/// Ordered set of routes, looked up by path or name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::diary()
    }
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The teacher diary's routes.
    #[must_use]
    pub fn diary() -> Self {
        Self::new(vec![
            Route::new(LOGIN, "/login", Access::Public),
            Route::new(SIGNUP, "/signup", Access::Public),
            Route::new(PENDING_APPROVAL, "/pending-approval", Access::Public),
            Route::new(CHANGE_PASSWORD, "/change-password", Access::Authenticated),
            Route::new(DASHBOARD, "/", Access::Authenticated),
            Route::new(STUDENTS, "/students", Access::Roles(STAFF)),
            Route::new(ATTENDANCE, "/attendance", Access::Roles(STAFF)),
            Route::new(COUNSEL, "/counsel", Access::Roles(STAFF)),
            Route::new(GRADES, "/grades", Access::Roles(STAFF)),
            Route::new(ADMIN_USERS, "/admin/users", Access::Roles(ADMIN_ONLY)),
        ])
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Match a location (path with optional query/fragment) to a route.
    ///
    /// Matching ignores ASCII case and trailing slashes, so `/Students/`
    /// matches `/students`.
    #[must_use]
    pub fn resolve(&self, location: &str) -> Option<&Route> {
        let path = path_of(location);
        self.routes.iter().find(|r| r.path.eq_ignore_ascii_case(path))
    }

    /// Path for a named route; unknown names fall back to `/`.
    #[must_use]
    pub fn path_of(&self, name: &str) -> &str {
        self.by_name(name).map_or("/", |r| r.path)
    }
}

/// Path component of a location, without query, fragment, or trailing `/`.
#[must_use]
pub fn path_of(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    let path = &location[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
