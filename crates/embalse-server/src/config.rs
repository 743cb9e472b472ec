//! Server configuration for Embalse.
//!
//! Loads configuration from environment variables with sensible defaults.
//! A `.env` file in the working directory is read first by the binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use embalse_store::RestStoreConfig;

const DEFAULT_PORT: u16 = 3000;

/// Static assets shipped with this crate.
pub const DEFAULT_ASSETS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Content store endpoint. `None` runs the site without a store.
    pub store: Option<RestStoreConfig>,
    /// Local admin password; also enables `/api/admin/auth`.
    pub admin_password: Option<String>,
    /// Remote password-check endpoint, preferred over the local password.
    pub admin_auth_url: Option<String>,
    /// Session ticket signing key. Random per process when absent.
    pub session_secret: Option<String>,
    /// Directory holding `images/` for the site and its fallback content.
    pub assets_dir: PathBuf,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("store", &self.store.as_ref().map(|s| s.url.as_str()))
            .field("admin_password", &self.admin_password.as_ref().map(|_| "[REDACTED]"))
            .field("admin_auth_url", &self.admin_auth_url)
            .field("session_secret", &self.session_secret.as_ref().map(|_| "[REDACTED]"))
            .field("assets_dir", &self.assets_dir)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on (binds to `0.0.0.0`)
    /// - `EMBALSE_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:3000`)
    /// - `EMBALSE_LOG_LEVEL` — log filter (default: `info`)
    /// - `SUPABASE_URL`, `SUPABASE_ANON_KEY` — content store endpoint and key
    /// - `ADMIN_PASSWORD` — local admin password
    /// - `ADMIN_AUTH_URL` — remote password-check endpoint
    /// - `SESSION_SECRET` — session ticket signing key
    /// - `EMBALSE_ASSETS_DIR` — static assets directory (default: the crate's `assets/`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`. Blank values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Priority: EMBALSE_BIND_ADDR > PORT > default 127.0.0.1:3000
        let bind_addr = if let Some(addr) = var("EMBALSE_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))
        } else if let Some(port) = var("PORT") {
            let port: u16 = port.parse().unwrap_or(DEFAULT_PORT);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
        };

        let log_level = var("EMBALSE_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let store = match (var("SUPABASE_URL"), var("SUPABASE_ANON_KEY")) {
            (Some(url), Some(key)) => Some(RestStoreConfig::new(url, key)),
            _ => None,
        };

        Self {
            bind_addr,
            log_level,
            store,
            admin_password: var("ADMIN_PASSWORD"),
            admin_auth_url: var("ADMIN_AUTH_URL"),
            session_secret: var("SESSION_SECRET"),
            assets_dir: var("EMBALSE_ASSETS_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR), PathBuf::from),
        }
    }
}
