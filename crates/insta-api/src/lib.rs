//! insta-api: HTTP API for insta-gateway
//!
//! REST endpoints forwarding Instagram requests to the client shim.
//! Built with axum for async HTTP handling.

pub mod handlers;
pub mod routes;
pub mod server;

pub use server::{start_server, AppState};
