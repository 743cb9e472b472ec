//! Admin routes: `/admin/*`
//!
//! Login, the two management tabs, create (multipart) and delete (with a
//! confirmation step). Every mutation first resumes the session from the
//! `admin_auth` cookie and answers with the login page when it does not.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use embalse_core::calendar::CalendarMonth;
use embalse_core::error::SubmitError;
use embalse_core::forms::{CardForm, EventForm};
use embalse_core::gate::AdminSession;
use embalse_core::models::{ImageFile, Section};
use embalse_core::panels::{CardsPanel, DeleteOutcome, EventsPanel};

use super::{ADMIN_CONCURRENCY, MAX_UPLOAD_BYTES};
use crate::state::AppState;
use crate::templates::Notice;
use crate::templates::admin::{render_cards, render_confirm, render_events, render_login};

/// Cookie carrying the session ticket.
pub const SESSION_COOKIE: &str = "admin_auth";

/// Build the admin router.
pub fn router() -> Router<Arc<AppState>> {
    let mutations = Router::new()
        .route("/admin/cards", post(create_card))
        .route("/admin/cards/{id}/delete", post(delete_card))
        .route("/admin/events", post(create_event))
        .route("/admin/events/{id}/delete", post(delete_event))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(tower::limit::ConcurrencyLimitLayer::new(ADMIN_CONCURRENCY));

    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/login", post(login))
        .merge(mutations)
}

// ── Session ──────────────────────────────────────────────────────────

/// Value of the session cookie, if the request carries one.
fn session_ticket(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

fn session(state: &AppState, headers: &HeaderMap) -> AdminSession {
    state.gate.resume(session_ticket(headers))
}

fn session_cookie(ticket: &str) -> String {
    // No Max-Age: the cookie lives as long as the browser session.
    format!("{SESSION_COOKIE}={ticket}; Path=/admin; HttpOnly; SameSite=Strict")
}

fn login_required() -> Response {
    (StatusCode::UNAUTHORIZED, Html(render_login(None))).into_response()
}

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DashboardParams {
    tab: Option<String>,
    section: Option<String>,
    month: Option<String>,
}

#[derive(Deserialize)]
struct LoginForm {
    password: String,
}

#[derive(Debug, Deserialize)]
struct DeleteForm {
    section: Option<String>,
    confirmed: Option<String>,
}

impl DeleteForm {
    fn confirmed(&self) -> bool {
        self.confirmed.as_deref() == Some("yes")
    }

    fn section(&self) -> Section {
        parse_section(self.section.as_deref())
    }
}

fn parse_section(value: Option<&str>) -> Section {
    value.and_then(|s| s.parse().ok()).unwrap_or(Section::Raices)
}

/// Text fields and the optional `image` file of a multipart form.
#[derive(Debug, Default)]
struct UploadForm {
    fields: HashMap<String, String>,
    image: Option<ImageFile>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_owned();
            if name == "image" {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen.
                if !file_name.is_empty() || !bytes.is_empty() {
                    form.image = Some(ImageFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let text = field.text().await?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }

    fn take(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }
}

fn multipart_rejected(e: &MultipartError) -> Response {
    warn!(error = %e, "rejected multipart body");
    (e.status(), e.body_text()).into_response()
}

fn submit_status(e: &SubmitError) -> StatusCode {
    match e {
        SubmitError::Invalid(_) => StatusCode::BAD_REQUEST,
        SubmitError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        SubmitError::Upload | SubmitError::CardNotCreated | SubmitError::EventNotCreated => {
            StatusCode::BAD_GATEWAY
        }
        SubmitError::Unconfirmed => StatusCode::CREATED,
    }
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Login page, or the requested tab when the session resumes.
async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<DashboardParams>,
) -> Response {
    if !session(&state, &headers).is_authenticated() {
        return Html(render_login(None)).into_response();
    }

    if matches!(params.tab.as_deref(), Some("events" | "eventos")) {
        let month = params
            .month
            .as_deref()
            .and_then(|m| m.parse::<CalendarMonth>().ok())
            .unwrap_or_else(|| CalendarMonth::containing(Utc::now()));
        let mut panel = EventsPanel::new(state.content.clone());
        panel.load().await;
        return Html(render_events(&panel, month, None, None)).into_response();
    }

    let section = parse_section(params.section.as_deref());
    let mut panel = CardsPanel::with_section(state.content.clone(), section);
    panel.load().await;
    Html(render_cards(&panel, None, None)).into_response()
}

/// Check the password; on success set the session cookie and go to `/admin`.
async fn login(State(state): State<Arc<AppState>>, Form(form): Form<LoginForm>) -> Response {
    match state.gate.submit(&form.password).await {
        Ok(AdminSession::Authenticated { ticket }) => {
            info!("admin logged in");
            (
                AppendHeaders([(header::SET_COOKIE, session_cookie(&ticket))]),
                Redirect::to("/admin"),
            )
                .into_response()
        }
        Ok(AdminSession::Unauthenticated) => login_required(),
        Err(e) => {
            warn!(reason = %e, "admin login failed");
            (StatusCode::UNAUTHORIZED, Html(render_login(Some(&e.to_string())))).into_response()
        }
    }
}

/// Multipart `section,title,description,image`.
async fn create_card(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if !session(&state, &headers).is_authenticated() {
        return login_required();
    }
    let mut upload = match UploadForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => return multipart_rejected(&e),
    };

    let section = parse_section(Some(&upload.take("section")));
    let form = CardForm {
        title: upload.take("title"),
        description: upload.take("description"),
        image: upload.image.take(),
    };
    let values = form.without_image();

    let mut panel = CardsPanel::with_section(state.content.clone(), section);
    match panel.submit(form).await {
        Ok(card) => {
            info!(id = %card.id, section = %section, "card created");
            let notice = Notice::Success(format!("Tarjeta \"{}\" agregada.", card.title));
            (StatusCode::CREATED, Html(render_cards(&panel, Some(&notice), None))).into_response()
        }
        Err(SubmitError::Unconfirmed) => {
            warn!(section = %section, "card stored without a readable reply");
            let notice = Notice::Success(SubmitError::Unconfirmed.to_string());
            let page = render_cards(&panel, Some(&notice), None);
            (submit_status(&SubmitError::Unconfirmed), Html(page)).into_response()
        }
        Err(e) => {
            panel.load().await;
            let notice = Notice::Error(e.to_string());
            let page = render_cards(&panel, Some(&notice), Some(&values));
            (submit_status(&e), Html(page)).into_response()
        }
    }
}

/// Form `section,confirmed`. Without `confirmed=yes` this only asks.
async fn delete_card(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    if !session(&state, &headers).is_authenticated() {
        return login_required();
    }
    let section = form.section();
    let mut panel = CardsPanel::with_section(state.content.clone(), section);
    panel.load().await;

    if !form.confirmed() {
        return match panel.confirmation_prompt(&id) {
            Some(prompt) => Html(render_confirm(
                &prompt,
                &format!("/admin/cards/{id}/delete"),
                Some(section),
                &format!("/admin?tab=cards&section={section}"),
            ))
            .into_response(),
            None => {
                let notice = Notice::Error("La tarjeta ya no existe.".to_owned());
                (StatusCode::NOT_FOUND, Html(render_cards(&panel, Some(&notice), None))).into_response()
            }
        };
    }

    match panel.delete(&id, true).await {
        DeleteOutcome::Deleted => {
            info!(id = %id, "card deleted");
            let notice = Notice::Success("Tarjeta eliminada.".to_owned());
            Html(render_cards(&panel, Some(&notice), None)).into_response()
        }
        DeleteOutcome::Failed => {
            let notice = Notice::Error("Error al eliminar la tarjeta.".to_owned());
            (StatusCode::BAD_GATEWAY, Html(render_cards(&panel, Some(&notice), None))).into_response()
        }
        DeleteOutcome::Cancelled => Html(render_cards(&panel, None, None)).into_response(),
    }
}

/// Multipart `title,description,date,category,tags,image`.
async fn create_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if !session(&state, &headers).is_authenticated() {
        return login_required();
    }
    let mut upload = match UploadForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => return multipart_rejected(&e),
    };

    let form = EventForm {
        title: upload.take("title"),
        description: upload.take("description"),
        date: upload.take("date"),
        category: upload.take("category"),
        tags: upload.take("tags"),
        image: upload.image.take(),
    };
    let values = form.without_image();

    let mut panel = EventsPanel::new(state.content.clone());
    match panel.submit(form).await {
        Ok(event) => {
            info!(id = %event.id, category = %event.category, "event created");
            let month = CalendarMonth::containing(event.date);
            let notice = Notice::Success(format!("Evento \"{}\" agregado.", event.title));
            (StatusCode::CREATED, Html(render_events(&panel, month, Some(&notice), None))).into_response()
        }
        Err(SubmitError::Unconfirmed) => {
            warn!("event stored without a readable reply");
            let month = CalendarMonth::containing(Utc::now());
            let notice = Notice::Success(SubmitError::Unconfirmed.to_string());
            let page = render_events(&panel, month, Some(&notice), None);
            (submit_status(&SubmitError::Unconfirmed), Html(page)).into_response()
        }
        Err(e) => {
            panel.load().await;
            let month = CalendarMonth::containing(Utc::now());
            let notice = Notice::Error(e.to_string());
            let page = render_events(&panel, month, Some(&notice), Some(&values));
            (submit_status(&e), Html(page)).into_response()
        }
    }
}

/// Form `confirmed`. Without `confirmed=yes` this only asks.
async fn delete_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    if !session(&state, &headers).is_authenticated() {
        return login_required();
    }
    let mut panel = EventsPanel::new(state.content.clone());
    panel.load().await;
    let month = CalendarMonth::containing(Utc::now());

    if !form.confirmed() {
        return match panel.confirmation_prompt(&id) {
            Some(prompt) => Html(render_confirm(
                &prompt,
                &format!("/admin/events/{id}/delete"),
                None,
                "/admin?tab=events",
            ))
            .into_response(),
            None => {
                let notice = Notice::Error("El evento ya no existe.".to_owned());
                (StatusCode::NOT_FOUND, Html(render_events(&panel, month, Some(&notice), None)))
                    .into_response()
            }
        };
    }

    match panel.delete(&id, true).await {
        DeleteOutcome::Deleted => {
            info!(id = %id, "event deleted");
            let notice = Notice::Success("Evento eliminado.".to_owned());
            Html(render_events(&panel, month, Some(&notice), None)).into_response()
        }
        DeleteOutcome::Failed => {
            let notice = Notice::Error("Error al eliminar el evento.".to_owned());
            (StatusCode::BAD_GATEWAY, Html(render_events(&panel, month, Some(&notice), None)))
                .into_response()
        }
        DeleteOutcome::Cancelled => Html(render_events(&panel, month, None, None)).into_response(),
    }
}
