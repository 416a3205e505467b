//! Route table and navigation guard.
//!
//! The guard is a pure decision over route metadata and a session snapshot;
//! `util::nav_guard` wires it into the Leptos router.

pub mod guard;
pub mod routes;
