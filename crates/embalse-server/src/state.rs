//! Shared application state for the Embalse server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use embalse_core::content::Content;
use embalse_core::gate::{PasswordCheck, RemotePasswordCheck, SessionGate, StaticPassword};
use embalse_store::RestStore;

use crate::config::{DEFAULT_ASSETS_DIR, ServerConfig};

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Data access layer; unconfigured when no store is reachable by config.
    pub content: Content,
    /// Admin session gate.
    pub gate: SessionGate,
    /// Password served by `/api/admin/auth`, if any.
    pub admin_password: Option<StaticPassword>,
    /// Served under `/images` from its `images/` subdirectory.
    pub assets_dir: PathBuf,
}

impl AppState {
    #[must_use]
    pub fn new(content: Content, gate: SessionGate, admin_password: Option<StaticPassword>) -> Self {
        Self {
            content,
            gate,
            admin_password,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
        }
    }

    /// Serve static assets from `dir` instead of the default.
    #[must_use]
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Build the state from configuration.
    ///
    /// Missing or invalid store settings leave the content layer in no-op
    /// mode; the site still renders its fallback data.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let content = match &config.store {
            Some(store_config) => match RestStore::connect(store_config) {
                Ok(store) => {
                    info!(url = %store_config.url, "content store configured");
                    Content::new(Arc::new(store))
                }
                Err(e) => {
                    warn!(error = %e, "content store misconfigured, running without it");
                    Content::unconfigured()
                }
            },
            None => {
                warn!("SUPABASE_URL / SUPABASE_ANON_KEY not set, running without a content store");
                Content::unconfigured()
            }
        };

        let admin_password = config.admin_password.as_deref().map(StaticPassword::new);

        let check: Option<Arc<dyn PasswordCheck>> = if let Some(url) = &config.admin_auth_url {
            match RemotePasswordCheck::new(url.clone()) {
                Ok(remote) => {
                    info!(endpoint = %url, "admin login delegated to remote check");
                    Some(Arc::new(remote))
                }
                Err(e) => {
                    warn!(error = %e, "failed to build remote password check");
                    None
                }
            }
        } else if let Some(local) = &admin_password {
            Some(Arc::new(local.clone()))
        } else {
            warn!("no admin password configured, admin login disabled");
            None
        };

        let key = match &config.session_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => random_key(),
        };

        Self::new(content, SessionGate::new(check, key), admin_password)
            .with_assets_dir(config.assets_dir.clone())
    }
}

/// Two UUID v4s = 32 bytes of OS CSPRNG randomness.
fn random_key() -> Vec<u8> {
    let a = uuid::Uuid::new_v4();
    let b = uuid::Uuid::new_v4();
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(a.as_bytes());
    key.extend_from_slice(b.as_bytes());
    key
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("content", &self.content)
            .field("gate", &self.gate)
            .field("assets_dir", &self.assets_dir)
            .finish_non_exhaustive()
    }
}
