//! Framework glue helpers.

pub mod nav_guard;
