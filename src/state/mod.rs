//! Shared client-side state.
//!
//! DESIGN
//! ======
//! The auth session is the only state this crate owns. It lives behind a
//! cloneable handle that the route guard and the HTTP client hooks share.

pub mod auth;
