//! Embalse HTTP server.
//!
//! Wires together the core library, the content store, and HTTP routes into
//! a running Axum server. Serves the public site at `/`, the admin panel at
//! `/admin`, and a small JSON API at `/api/*`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod templates;
