//! Integration tests for the admin routes.

mod common;

use axum::http::{StatusCode, header};

use common::{
    Part, PASSWORD, body_text, build_test_app, build_unconfigured_app, get, get_with_cookie, login,
    post_form, post_multipart,
};
use embalse_core::content::{CARDS_TABLE, EVENTS_TABLE, IMAGES_BUCKET};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

fn image_part() -> Part<'static> {
    Part::File {
        name: "image",
        file_name: "Hongos.PNG",
        content_type: "image/png",
        bytes: PNG,
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_shows_login_without_session() {
    let (app, _) = build_test_app();
    let response = get(&app, "/admin").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Contraseña de administrador"));
    assert!(!html.contains("Tarjetas actuales"));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (app, _) = build_test_app();
    let response = post_form(&app, "/admin/login", "password=wrong", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(response).await.contains("Contraseña incorrecta."));
}

#[tokio::test]
async fn session_survives_reload() {
    let (app, _) = build_test_app();
    let cookie = login(&app).await;

    // A reload is a fresh request carrying only the cookie.
    for _ in 0..2 {
        let html = body_text(get_with_cookie(&app, "/admin", &cookie).await).await;
        assert!(html.contains("Tarjetas actuales"));
    }

    let html = body_text(get_with_cookie(&app, "/admin?tab=events&month=2026-03", &cookie).await).await;
    assert!(html.contains("marzo 2026"));
}

#[tokio::test]
async fn login_cookie_has_no_expiry() {
    let (app, _) = build_test_app();
    let response = post_form(&app, "/admin/login", &format!("password={PASSWORD}"), None).await;
    assert_eq!(response.headers()[header::LOCATION], "/admin");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("admin_auth="));
    assert!(!cookie.contains("Max-Age"));
}

#[tokio::test]
async fn forged_cookie_is_ignored() {
    let (app, _) = build_test_app();
    let html = body_text(get_with_cookie(&app, "/admin", "admin_auth=true").await).await;
    assert!(html.contains("Contraseña de administrador"));
}

#[tokio::test]
async fn login_without_configured_password() {
    let app = build_unconfigured_app(None);
    let response = post_form(&app, "/admin/login", "password=x", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(response).await.contains("Autenticación no configurada."));
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mutations_require_session() {
    let (app, store) = build_test_app();
    let response = post_multipart(
        &app,
        "/admin/cards",
        &[
            Part::Text("section", "raices"),
            Part::Text("title", "t"),
            Part::Text("description", "d"),
            image_part(),
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(store.rows(CARDS_TABLE).await.is_empty());

    let response = post_form(&app, "/admin/events/x/delete", "confirmed=yes", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_card_uploads_and_lists() {
    let (app, store) = build_test_app();
    let cookie = login(&app).await;

    let response = post_multipart(
        &app,
        "/admin/cards",
        &[
            Part::Text("section", "preservacion"),
            Part::Text("title", "Biodiversidad: Hongos"),
            Part::Text("description", "Bosque de niebla"),
            image_part(),
        ],
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let html = body_text(response).await;
    assert!(html.contains("1 tarjeta"));
    assert!(html.contains("Biodiversidad: Hongos"));

    let rows = store.rows(CARDS_TABLE).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["section"], "preservacion");
    assert_eq!(rows[0]["display_order"], 0);

    let objects = store.object_names(IMAGES_BUCKET).await;
    assert_eq!(objects.len(), 1);
    assert!(objects[0].ends_with(".png"));
    let (content_type, bytes) = store.object(IMAGES_BUCKET, &objects[0]).await.unwrap();
    assert_eq!(content_type, "image/png");
    assert_eq!(bytes, PNG);
}

#[tokio::test]
async fn card_without_image_is_rejected_before_store() {
    let (app, store) = build_test_app();
    let cookie = login(&app).await;

    let response = post_multipart(
        &app,
        "/admin/cards",
        &[
            Part::Text("section", "raices"),
            Part::Text("title", "Lengua"),
            Part::Text("description", "Talleres"),
            Part::File {
                name: "image",
                file_name: "",
                content_type: "application/octet-stream",
                bytes: b"",
            },
        ],
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Por favor selecciona una imagen."));
    assert!(store.rows(CARDS_TABLE).await.is_empty());
    assert!(store.object_names(IMAGES_BUCKET).await.is_empty());
}

#[tokio::test]
async fn delete_card_asks_first() {
    let (app, store) = build_test_app();
    let cookie = login(&app).await;
    post_multipart(
        &app,
        "/admin/cards",
        &[
            Part::Text("section", "raices"),
            Part::Text("title", "Medicina Tradicional"),
            Part::Text("description", "Herbolaria"),
            image_part(),
        ],
        Some(&cookie),
    )
    .await;
    let id = store.rows(CARDS_TABLE).await[0]["id"]
        .as_str()
        .unwrap()
        .to_owned();
    let uri = format!("/admin/cards/{id}/delete");

    // Unconfirmed: only the question, nothing deleted.
    let response = post_form(&app, &uri, "section=raices", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("¿Eliminar &quot;Medicina Tradicional&quot;? Esta acción no se puede deshacer."));
    assert_eq!(store.rows(CARDS_TABLE).await.len(), 1);

    let response = post_form(&app, &uri, "section=raices&confirmed=yes", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Tarjeta eliminada."));
    assert!(html.contains("0 tarjetas"));
    assert!(store.rows(CARDS_TABLE).await.is_empty());
}

#[tokio::test]
async fn create_card_without_store() {
    let app = build_unconfigured_app(Some(PASSWORD));
    let cookie = login(&app).await;
    let response = post_multipart(
        &app,
        "/admin/cards",
        &[
            Part::Text("section", "raices"),
            Part::Text("title", "t"),
            Part::Text("description", "d"),
            image_part(),
        ],
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(
        body_text(response)
            .await
            .contains("El almacenamiento de contenido no está configurado.")
    );
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_event_parses_tags_and_date() {
    let (app, store) = build_test_app();
    let cookie = login(&app).await;

    let response = post_multipart(
        &app,
        "/admin/events",
        &[
            Part::Text("title", "Senderismo nocturno"),
            Part::Text("description", "Recorrido guiado"),
            Part::Text("date", "2026-03-15"),
            Part::Text("category", "ecoturismo"),
            Part::Text("tags", "senderismo, naturaleza"),
            Part::File {
                name: "image",
                file_name: "",
                content_type: "application/octet-stream",
                bytes: b"",
            },
        ],
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let html = body_text(response).await;
    assert!(html.contains("1 evento"));
    assert!(html.contains("marzo 2026"));
    assert!(html.contains(r#"<td class="has-event">15</td>"#));

    let rows = store.rows(EVENTS_TABLE).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["tags"], serde_json::json!(["senderismo", "naturaleza"]));
    assert!(rows[0]["image_url"].is_null());
    let date = chrono::DateTime::parse_from_rfc3339(rows[0]["date"].as_str().unwrap()).unwrap();
    assert_eq!(date.to_rfc3339(), "2026-03-15T06:00:00+00:00");
    // No image chosen, nothing uploaded.
    assert!(store.object_names(IMAGES_BUCKET).await.is_empty());
}

#[tokio::test]
async fn event_with_unknown_category_is_rejected() {
    let (app, store) = build_test_app();
    let cookie = login(&app).await;
    let response = post_multipart(
        &app,
        "/admin/events",
        &[
            Part::Text("title", "t"),
            Part::Text("description", "d"),
            Part::Text("date", "2026-03-15"),
            Part::Text("category", "deportes"),
        ],
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.rows(EVENTS_TABLE).await.is_empty());
}

#[tokio::test]
async fn delete_event_after_confirmation() {
    let (app, store) = build_test_app();
    let cookie = login(&app).await;
    post_multipart(
        &app,
        "/admin/events",
        &[
            Part::Text("title", "Taller de Lengua Otomí"),
            Part::Text("description", "Sesión introductoria"),
            Part::Text("date", "2026-03-22"),
            Part::Text("category", "cultura"),
            Part::Text("tags", ""),
        ],
        Some(&cookie),
    )
    .await;
    let id = store.rows(EVENTS_TABLE).await[0]["id"]
        .as_str()
        .unwrap()
        .to_owned();
    let uri = format!("/admin/events/{id}/delete");

    let html = body_text(post_form(&app, &uri, "confirmed=", Some(&cookie)).await).await;
    assert!(html.contains(r#"name="confirmed" value="yes""#));
    assert_eq!(store.rows(EVENTS_TABLE).await.len(), 1);

    let html = body_text(post_form(&app, &uri, "confirmed=yes", Some(&cookie)).await).await;
    assert!(html.contains("Evento eliminado."));
    assert!(store.rows(EVENTS_TABLE).await.is_empty());
}

#[tokio::test]
async fn failed_delete_keeps_event() {
    let (app, store) = build_test_app();
    let cookie = login(&app).await;
    post_multipart(
        &app,
        "/admin/events",
        &[
            Part::Text("title", "Jornada"),
            Part::Text("description", "d"),
            Part::Text("date", "2026-04-05"),
            Part::Text("category", "activismo"),
        ],
        Some(&cookie),
    )
    .await;
    let id = store.rows(EVENTS_TABLE).await[0]["id"]
        .as_str()
        .unwrap()
        .to_owned();

    store.set_offline(true);
    let response = post_form(
        &app,
        &format!("/admin/events/{id}/delete"),
        "confirmed=yes",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    store.set_offline(false);
    assert_eq!(store.rows(EVENTS_TABLE).await.len(), 1);
}

#[tokio::test]
async fn failed_event_keeps_typed_values() {
    let (app, store) = build_test_app();
    let cookie = login(&app).await;
    let response = post_multipart(
        &app,
        "/admin/events",
        &[
            Part::Text("title", "Mi Evento Largo"),
            Part::Text("description", "Caminata <nocturna>"),
            Part::Text("date", ""),
            Part::Text("category", "talleres"),
            Part::Text("tags", "noche, río"),
        ],
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("La fecha es obligatoria."));
    assert!(html.contains(r#"value="Mi Evento Largo""#));
    assert!(html.contains("Caminata &lt;nocturna&gt;</textarea>"));
    assert!(html.contains(r#"value="noche, río""#));
    assert!(html.contains(r#"<option value="talleres" selected>"#));
    assert!(store.rows(EVENTS_TABLE).await.is_empty());
}

#[tokio::test]
async fn failed_card_keeps_typed_values_and_success_resets() {
    let (app, _) = build_test_app();
    let cookie = login(&app).await;

    let fields = [
        Part::Text("section", "raices"),
        Part::Text("title", "Gastronomía"),
        Part::Text("description", "Recetas de la abuela"),
    ];
    let html = body_text(post_multipart(&app, "/admin/cards", &fields, Some(&cookie)).await).await;
    assert!(html.contains(r#"value="Gastronomía""#));
    assert!(html.contains("Recetas de la abuela</textarea>"));

    let response = post_multipart(
        &app,
        "/admin/cards",
        &[
            Part::Text("section", "raices"),
            Part::Text("title", "Gastronomía"),
            Part::Text("description", "Recetas de la abuela"),
            image_part(),
        ],
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let html = body_text(response).await;
    assert!(html.contains(r#"name="title" value="" required"#));
}
