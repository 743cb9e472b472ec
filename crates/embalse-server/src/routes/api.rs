//! JSON routes: `/api/*`
//!
//! Read access to cards and events, and the password-check endpoint the
//! admin login can be pointed at.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use embalse_core::error::LoginError;
use embalse_core::gate::PasswordCheck;
use embalse_core::models::{Event, HighlightCard, Section};

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cards", get(list_cards))
        .route("/events", get(list_events))
        .route("/admin/auth", post(check_password))
}

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CardsParams {
    section: Option<String>,
}

#[derive(Deserialize)]
struct AuthRequest {
    password: String,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Cards of one section, by display order.
async fn list_cards(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CardsParams>,
) -> Result<Json<Vec<HighlightCard>>, AppError> {
    let section: Section = params
        .section
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("missing 'section' parameter".to_owned()))?
        .parse()?;
    Ok(Json(state.content.list_cards(section).await))
}

/// All stored events, by date.
async fn list_events(State(state): State<Arc<AppState>>) -> Json<Vec<Event>> {
    let mut events = state.content.list_events().await;
    events.sort_by_key(|e| e.date);
    Json(events)
}

/// `{password}` → 200 `{"ok": true}` or 401 `{"error": reason}`.
async fn check_password(State(state): State<Arc<AppState>>, Json(body): Json<AuthRequest>) -> Response {
    let Some(password) = &state.admin_password else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": LoginError::NotConfigured.to_string() })),
        )
            .into_response();
    };

    match password.verify(&body.password).await {
        Ok(()) => Json(json!({ "ok": true })).into_response(),
        Err(e) => (StatusCode::UNAUTHORIZED, Json(json!({ "error": e.to_string() }))).into_response(),
    }
}
