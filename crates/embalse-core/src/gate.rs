//! Admin session gate.
//!
//! A password check decides whether a submission authenticates. An
//! authenticated session is represented by a signed ticket,
//! `<nonce>.<hmac-sha256 hex>`, which the browser presents again on reload.
//! The gate keeps no per-session state; a ticket is valid for as long as the
//! signing key is.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::error::LoginError;

type HmacSha256 = Hmac<Sha256>;

const WRONG_PASSWORD: &str = "Contraseña incorrecta.";
const REJECTED_FALLBACK: &str = "Error de autenticación.";

/// Decides whether a candidate password is the admin password.
#[async_trait]
pub trait PasswordCheck: Send + Sync + 'static {
    /// # Errors
    ///
    /// [`LoginError::Rejected`] with a human-readable reason, or
    /// [`LoginError::Unreachable`] when the check itself failed.
    async fn verify(&self, candidate: &str) -> Result<(), LoginError>;
}

/// Compares against a password held in process configuration.
#[derive(Clone)]
pub struct StaticPassword {
    password: String,
}

impl StaticPassword {
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// Constant-time comparison.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.password
            .as_bytes()
            .ct_eq(candidate.as_bytes())
            .into()
    }
}

impl std::fmt::Debug for StaticPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticPassword")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl PasswordCheck for StaticPassword {
    async fn verify(&self, candidate: &str) -> Result<(), LoginError> {
        if self.matches(candidate) {
            Ok(())
        } else {
            Err(LoginError::Rejected(WRONG_PASSWORD.to_owned()))
        }
    }
}

/// Asks an HTTP endpoint: `POST {endpoint}` with `{"password": ...}`.
///
/// A 2xx answer accepts. Any other status rejects, with the body's `error`
/// string as the reason when there is one.
#[derive(Debug, Clone)]
pub struct RemotePasswordCheck {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl RemotePasswordCheck {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PasswordCheck for RemotePasswordCheck {
    async fn verify(&self, candidate: &str) -> Result<(), LoginError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "password": candidate }))
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "password check unreachable");
                LoginError::Unreachable
            })?;

        if resp.status().is_success() {
            return Ok(());
        }

        let reason = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| REJECTED_FALLBACK.to_owned());
        Err(LoginError::Rejected(reason))
    }
}

/// Whether the admin UI is unlocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminSession {
    Unauthenticated,
    /// Unlocked; `ticket` is what the browser keeps for the rest of its session.
    Authenticated { ticket: String },
}

impl AdminSession {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    #[must_use]
    pub fn ticket(&self) -> Option<&str> {
        match self {
            Self::Authenticated { ticket } => Some(ticket),
            Self::Unauthenticated => None,
        }
    }
}

/// Issues and checks session tickets.
#[derive(Clone)]
pub struct SessionGate {
    check: Option<Arc<dyn PasswordCheck>>,
    key: Vec<u8>,
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("configured", &self.check.is_some())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl SessionGate {
    /// `key` signs tickets; a ticket only resumes under the key that issued it.
    #[must_use]
    pub fn new(check: Option<Arc<dyn PasswordCheck>>, key: impl Into<Vec<u8>>) -> Self {
        Self {
            check,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.check.is_some()
    }

    /// Submit a password.
    ///
    /// # Errors
    ///
    /// [`LoginError::NotConfigured`] with no password check, otherwise
    /// whatever the check answers.
    pub async fn submit(&self, password: &str) -> Result<AdminSession, LoginError> {
        let check = self.check.as_ref().ok_or(LoginError::NotConfigured)?;
        check.verify(password).await?;

        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let signature = self.sign(&nonce).ok_or(LoginError::NotConfigured)?;
        debug!("admin session opened");
        Ok(AdminSession::Authenticated {
            ticket: format!("{nonce}.{signature}"),
        })
    }

    /// Rebuild the session from the ticket the browser presents, if any.
    #[must_use]
    pub fn resume(&self, ticket: Option<&str>) -> AdminSession {
        let Some(ticket) = ticket else {
            return AdminSession::Unauthenticated;
        };
        if self.verify(ticket) {
            AdminSession::Authenticated {
                ticket: ticket.to_owned(),
            }
        } else {
            AdminSession::Unauthenticated
        }
    }

    fn mac(&self) -> Option<HmacSha256> {
        HmacSha256::new_from_slice(&self.key).ok()
    }

    fn sign(&self, nonce: &str) -> Option<String> {
        let mut mac = self.mac()?;
        mac.update(nonce.as_bytes());
        Some(hex::encode(mac.finalize().into_bytes()))
    }

    fn verify(&self, ticket: &str) -> bool {
        let Some((nonce, signature)) = ticket.split_once('.') else {
            return false;
        };
        let (Ok(signature), Some(mut mac)) = (hex::decode(signature), self.mac()) else {
            return false;
        };
        if nonce.is_empty() {
            return false;
        }
        mac.update(nonce.as_bytes());
        mac.verify_slice(&signature).is_ok()
    }
}
