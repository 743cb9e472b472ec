//! Public site route: `/`.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use serde::Deserialize;

use embalse_core::display;
use embalse_core::models::Category;

use crate::state::AppState;
use crate::templates::site::render_home;

/// Build the site router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(home))
}

#[derive(Debug, Deserialize)]
struct HomeParams {
    category: Option<String>,
}

/// Render the home page. An unknown `category` shows every event.
async fn home(State(state): State<Arc<AppState>>, Query(params): Query<HomeParams>) -> Html<String> {
    let filter = params
        .category
        .as_deref()
        .and_then(|c| c.parse::<Category>().ok());

    let (sections, events) = tokio::join!(
        display::load_highlights(&state.content),
        display::load_events(&state.content),
    );

    Html(render_home(&sections, &events, filter))
}
