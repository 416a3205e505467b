//! Networking: request pipeline, transports, auth endpoint helpers, DTOs.

pub mod api;
pub mod http;
pub mod transport;
pub mod types;
