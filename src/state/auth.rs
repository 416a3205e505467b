//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route guard and the HTTP client's bearer hook; written by
//! login, logout, the forced password change, and the 401 hook.
//!
//! PERSISTENCE
//! ===========
//! Three storage entries mirror the session: `token` (raw string), `me`
//! (JSON profile or `null`) and `pwdreq` (JSON boolean). Every mutation
//! writes through before returning. Restore treats anything unreadable or
//! inconsistent as "no session".

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{ApiError, LoginError, StorageError};
use crate::net::api;
use crate::net::http::HttpClient;
use crate::net::types::{DEFAULT_DISPLAY_NAME, Profile, Role};
use crate::router::guard::SessionSnapshot;
use crate::storage::KeyValueStore;

pub const TOKEN_KEY: &str = "token";
pub const PROFILE_KEY: &str = "me";
pub const PASSWORD_CHANGE_KEY: &str = "pwdreq";

/// Message shown when a failed login carries no server detail.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// In-memory session plus transient request status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Bearer token; empty means no session.
    pub token: String,
    pub profile: Option<Profile>,
    pub password_change_required: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|p| p.role)
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.profile.as_ref().map_or(DEFAULT_DISPLAY_NAME, Profile::display_name)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            logged_in: self.is_logged_in(),
            role: self.role(),
            password_change_required: self.is_logged_in() && self.password_change_required,
        }
    }
}

enum Attempt {
    Committed,
    /// Another login or a logout replaced the token mid-flight.
    Superseded,
}

/// Shared handle to the auth session.
///
/// Clones refer to the same session. All reads and writes go through the
/// methods here so persistence stays in step with memory.
#[derive(Clone)]
pub struct AuthStore {
    state: Rc<RefCell<AuthState>>,
    storage: Rc<dyn KeyValueStore>,
}

impl AuthStore {
    /// Rebuild the session from persisted storage.
    pub fn restore(storage: Rc<dyn KeyValueStore>) -> Self {
        let token = storage.get(TOKEN_KEY).unwrap_or_default();
        let profile = read_json::<Option<Profile>>(storage.as_ref(), PROFILE_KEY).flatten();
        let password_change_required = read_json::<bool>(storage.as_ref(), PASSWORD_CHANGE_KEY).unwrap_or(false);

        let store = Self { state: Rc::new(RefCell::new(AuthState::default())), storage };
        match (token.is_empty(), profile) {
            (false, Some(profile)) => {
                let mut state = store.state.borrow_mut();
                state.token = token;
                state.profile = Some(profile);
                state.password_change_required = password_change_required;
            }
            (true, None) => {}
            _ => {
                log::warn!("persisted session is incomplete; starting logged out");
                store.logout();
            }
        }
        store
    }

    /// Copy of the full state, including transient status.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// What the route guard needs to know, as of now.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().snapshot()
    }

    #[must_use]
    pub fn token(&self) -> String {
        self.state.borrow().token.clone()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.state.borrow().profile.clone()
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        self.state.borrow().display_name().to_owned()
    }

    #[must_use]
    pub fn password_change_required(&self) -> bool {
        self.state.borrow().password_change_required
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Log in with the password grant, then load the profile.
    ///
    /// Returns `false` on any failure, including a session that could not be
    /// written to storage, with [`AuthStore::error`] set and the session
    /// fully cleared. Concurrent calls are not serialized; an attempt
    /// whose token was replaced before its profile arrived returns `false`
    /// and leaves the newer session alone.
    pub async fn login(&self, http: &HttpClient, username: &str, password: &str) -> bool {
        {
            let mut state = self.state.borrow_mut();
            state.loading = true;
            state.error = None;
        }

        let succeeded = match self.attempt_login(http, username, password).await {
            Ok(Attempt::Committed) => {
                log::info!("logged in as {username}");
                true
            }
            Ok(Attempt::Superseded) => {
                log::debug!("login for {username} superseded by a newer session change");
                false
            }
            Err(err) => {
                log::warn!("login for {username} failed: {err}");
                let message = err.detail().unwrap_or(LOGIN_FAILED_MESSAGE).to_owned();
                // A 401 was already handled by the client's invalidation hook.
                if !err.is_unauthorized() || self.is_logged_in() {
                    self.logout();
                }
                self.state.borrow_mut().error = Some(message);
                false
            }
        };

        self.state.borrow_mut().loading = false;
        succeeded
    }

    async fn attempt_login(&self, http: &HttpClient, username: &str, password: &str) -> Result<Attempt, LoginError> {
        let grant = api::request_token(http, username, password).await?;
        let token = grant.access_token;
        self.commit_token(&token, grant.password_change_required)?;

        let profile = api::fetch_me(http).await?;
        if self.state.borrow().token != token {
            return Ok(Attempt::Superseded);
        }
        self.commit_profile(&profile)?;
        Ok(Attempt::Committed)
    }

    /// Change the password server-side, then lift the forced-change lock.
    ///
    /// # Errors
    ///
    /// Returns the request error; the lock stays in place on failure.
    pub async fn change_password(&self, http: &HttpClient, old_password: &str, new_password: &str) -> Result<(), ApiError> {
        api::change_password(http, old_password, new_password).await?;
        self.mark_password_changed();
        Ok(())
    }

    /// Clear the forced password-change flag. Idempotent.
    ///
    /// Storage is only touched while a session exists, so a logged-out
    /// store stays fully cleared.
    pub fn mark_password_changed(&self) {
        self.state.borrow_mut().password_change_required = false;
        if self.is_logged_in() {
            if let Err(e) = self.storage.set(PASSWORD_CHANGE_KEY, "false") {
                log::warn!("failed to persist {PASSWORD_CHANGE_KEY}: {e}");
            }
        }
    }

    /// Drop the session in memory and in storage. Never fails.
    pub fn logout(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.token.clear();
            state.profile = None;
            state.password_change_required = false;
        }
        for key in [TOKEN_KEY, PROFILE_KEY, PASSWORD_CHANGE_KEY] {
            if let Err(e) = self.storage.remove(key) {
                log::warn!("failed to clear persisted {key}: {e}");
            }
        }
    }

    fn commit_token(&self, token: &str, password_change_required: bool) -> Result<(), StorageError> {
        {
            let mut state = self.state.borrow_mut();
            state.token = token.to_owned();
            state.password_change_required = password_change_required;
        }
        self.storage.set(TOKEN_KEY, token)?;
        self.storage
            .set(PASSWORD_CHANGE_KEY, if password_change_required { "true" } else { "false" })
    }

    fn commit_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        self.state.borrow_mut().profile = Some(profile.clone());
        let raw = serde_json::to_string(profile)?;
        self.storage.set(PROFILE_KEY, &raw)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = storage.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("ignoring corrupt persisted {key}: {e}");
            None
        }
    }
}
