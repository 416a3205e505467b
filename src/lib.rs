//! # diary-client
//!
//! Session and navigation-guard core for the teacher diary web client.
//!
//! The crate owns three pieces that run on every navigation and request:
//! the [`state::auth::AuthStore`] (token, profile and forced-password-change
//! flag with write-through persistence), the [`net::http::HttpClient`]
//! (bearer injection and 401 invalidation hooks around a transport), and the
//! [`router::guard`] decision function. Views live elsewhere and only call
//! into these.

pub mod config;
pub mod error;
pub mod net;
pub mod router;
pub mod state;
pub mod storage;
pub mod util;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use error::{ApiError, FailureKind, LoginError, StorageError};
pub use net::http::HttpClient;
pub use router::guard::{Decision, Redirect, SessionSnapshot};
pub use router::routes::{Access, Route, RouteTable};
pub use state::auth::AuthStore;
pub use storage::KeyValueStore;

/// Install browser console logging and the panic hook.
///
/// Call once from the hydrate entry point before mounting the app.
#[cfg(feature = "hydrate")]
pub fn init_browser_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}
