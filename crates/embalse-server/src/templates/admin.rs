//! Admin pages: login, dashboard tabs, delete confirmation.

use std::fmt::Write as _;

use embalse_core::calendar::{date_label, CalendarMonth, WEEKDAYS};
use embalse_core::forms::{CardForm, EventForm};
use embalse_core::models::{Category, Section};
use embalse_core::panels::{CardsPanel, EventsPanel};

use super::{build_page, escape, js_string_attr, render_notice, Notice};

const BRAND: &str = r#"<h1 style="text-align:center"><span style="color:#4ade80">Agua</span> Barranca</h1>"#;

/// The password form, with the last error if any.
pub fn render_login(error: Option<&str>) -> String {
    let error = error
        .map(|e| format!(r#"<p class="notice err">{}</p>"#, escape(e)))
        .unwrap_or_default();
    let content = format!(
        r#"<main class="wrap" style="max-width:420px;padding-top:15vh">
    {BRAND}
    <p class="muted" style="text-align:center">Panel de Administración</p>
    <form class="stack" method="post" action="/admin/login">
        <label for="password">Contraseña de administrador</label>
        <input id="password" type="password" name="password" placeholder="Ingresa la contraseña" required autofocus>
        {error}
        <p style="margin-top:16px"><button type="submit" style="width:100%">Entrar</button></p>
    </form>
</main>"#
    );
    build_page("Administración · Agua Barranca", "dark", &content)
}

fn render_shell(active_cards: bool, inner: &str) -> String {
    let (cards, events) = if active_cards {
        (" class=\"active\"", "")
    } else {
        ("", " class=\"active\"")
    };
    let content = format!(
        r#"<nav class="top"><span class="brand"><b>Agua</b> Barranca · Admin</span><a href="/">Ver sitio</a></nav>
<main class="wrap" style="padding-top:32px;padding-bottom:64px">
    <div class="tabs" style="margin-bottom:24px"><a href="/admin?tab=cards"{cards}>Tarjetas</a><a href="/admin?tab=events"{events}>Eventos</a></div>
    {inner}
</main>"#
    );
    build_page("Administración · Agua Barranca", "dark", &content)
}

fn delete_form(action: &str, section: Option<Section>, prompt: &str) -> String {
    let section = section
        .map(|s| format!(r#"<input type="hidden" name="section" value="{}">"#, s.as_str()))
        .unwrap_or_default();
    format!(
        r#"<form method="post" action="{action}" onsubmit="if(!confirm({prompt}))return false;this.confirmed.value='yes';">{section}<input type="hidden" name="confirmed" value=""><button class="danger" type="submit">Eliminar</button></form>"#,
        action = escape(action),
        prompt = js_string_attr(prompt),
    )
}

/// Cards tab: section switch, list, and add form.
///
/// `values` refills the add form after a failed submission; the file input
/// always starts empty.
pub fn render_cards(
    panel: &CardsPanel,
    notice: Option<&Notice>,
    values: Option<&CardForm>,
) -> String {
    let active = panel.section();

    let mut switch = String::new();
    for section in Section::ALL {
        let _ = write!(
            switch,
            r#"<a href="/admin?tab=cards&amp;section={value}"{class}>{label}</a>"#,
            value = section.as_str(),
            class = if section == active { " class=\"active\"" } else { "" },
            label = section.label(),
        );
    }

    let list = if panel.cards().is_empty() {
        r#"<p class="muted">No hay tarjetas en esta sección.</p>"#.to_owned()
    } else {
        panel
            .cards()
            .iter()
            .map(|card| {
                let prompt = panel.confirmation_prompt(&card.id).unwrap_or_default();
                format!(
                    r#"<div class="row"><img src="{src}" alt="{title}"><div class="grow"><b>{title}</b><div class="muted">{description}</div></div>{delete}</div>"#,
                    src = escape(&card.image_url),
                    title = escape(&card.title),
                    description = escape(&card.description),
                    delete = delete_form(
                        &format!("/admin/cards/{}/delete", card.id),
                        Some(active),
                        &prompt
                    ),
                )
            })
            .collect()
    };

    let inner = format!(
        r#"<div class="tabs" style="margin-bottom:24px">{switch}</div>
{notice}
<div class="panel">
    <div>
        <h2 style="font-size:20px">Tarjetas actuales <span class="chip">{count}</span></h2>
        {list}
    </div>
    <form class="stack" method="post" action="/admin/cards" enctype="multipart/form-data">
        <h2 style="font-size:20px">Nueva tarjeta · {section_label}</h2>
        <input type="hidden" name="section" value="{section}">
        <label for="title">Título</label>
        <input id="title" name="title" value="{title}" required>
        <label for="description">Descripción</label>
        <textarea id="description" name="description" rows="4" required>{description}</textarea>
        <label for="image">Imagen</label>
        <input id="image" type="file" name="image" accept="image/*" required>
        <p style="margin-top:16px"><button type="submit">Agregar Tarjeta</button></p>
    </form>
</div>"#,
        notice = render_notice(notice),
        count = panel.count_label(),
        section_label = active.label(),
        section = active.as_str(),
        title = escape(values.map_or("", |v| v.title.as_str())),
        description = escape(values.map_or("", |v| v.description.as_str())),
    );
    render_shell(true, &inner)
}

fn render_calendar(panel: &EventsPanel, month: CalendarMonth) -> String {
    let days = month.event_days(panel.events());
    let mut grid = String::from("<tr>");
    for name in WEEKDAYS {
        let _ = write!(grid, "<th>{name}</th>");
    }
    grid.push_str("</tr><tr>");

    let lead = month.first_weekday();
    for _ in 0..lead {
        grid.push_str("<td></td>");
    }
    for day in 1..=month.days_in_month() {
        if (lead + day - 1) % 7 == 0 && day != 1 {
            grid.push_str("</tr><tr>");
        }
        if days.contains(&day) {
            let _ = write!(grid, r#"<td class="has-event">{day}</td>"#);
        } else {
            let _ = write!(grid, "<td>{day}</td>");
        }
    }
    grid.push_str("</tr>");

    format!(
        r#"<div style="margin-bottom:24px">
    <div style="display:flex;justify-content:space-between;align-items:center">
        <a class="chip" href="/admin?tab=events&amp;month={prev}">‹</a>
        <b>{label}</b>
        <a class="chip" href="/admin?tab=events&amp;month={next}">›</a>
    </div>
    <table class="cal">{grid}</table>
</div>"#,
        prev = month.prev(),
        next = month.next(),
        label = month.label(),
    )
}

/// Events tab: month calendar, list, and add form.
///
/// `values` refills the add form after a failed submission.
pub fn render_events(
    panel: &EventsPanel,
    month: CalendarMonth,
    notice: Option<&Notice>,
    values: Option<&EventForm>,
) -> String {
    let list = if panel.events().is_empty() {
        r#"<p class="muted">No hay eventos registrados.</p>"#.to_owned()
    } else {
        panel
            .events()
            .iter()
            .map(|event| {
                let prompt = panel.confirmation_prompt(&event.id).unwrap_or_default();
                let tags: String = event
                    .tags
                    .iter()
                    .map(|t| format!(r#"<span class="tag">#{}</span>"#, escape(t)))
                    .collect();
                format!(
                    r#"<div class="row"><div class="grow"><span class="chip">{category}</span> <b>{title}</b><div class="muted">{date}</div><div>{tags}</div></div>{delete}</div>"#,
                    category = event.category.label(),
                    title = escape(&event.title),
                    date = date_label(event.date),
                    delete = delete_form(&format!("/admin/events/{}/delete", event.id), None, &prompt),
                )
            })
            .collect()
    };

    let chosen = values.and_then(|v| v.category.parse::<Category>().ok());
    let mut options = String::new();
    for category in Category::ALL {
        let _ = write!(
            options,
            r#"<option value="{}"{}>{}</option>"#,
            category.as_str(),
            if chosen == Some(category) { " selected" } else { "" },
            category.label()
        );
    }
    let field = |pick: fn(&EventForm) -> &str| escape(values.map_or("", pick));

    let inner = format!(
        r#"{notice}
<div class="panel">
    <div>
        {calendar}
        <h2 style="font-size:20px">Eventos <span class="chip">{count}</span></h2>
        {list}
    </div>
    <form class="stack" method="post" action="/admin/events" enctype="multipart/form-data">
        <h2 style="font-size:20px">Nuevo evento</h2>
        <label for="title">Título</label>
        <input id="title" name="title" value="{title}" required>
        <label for="description">Descripción</label>
        <textarea id="description" name="description" rows="4" required>{description}</textarea>
        <label for="date">Fecha</label>
        <input id="date" type="date" name="date" value="{date}" required>
        <label for="category">Categoría</label>
        <select id="category" name="category">{options}</select>
        <label for="tags">Etiquetas (separadas por coma)</label>
        <input id="tags" name="tags" value="{tags}" placeholder="senderismo, naturaleza">
        <label for="image">Imagen (opcional)</label>
        <input id="image" type="file" name="image" accept="image/*">
        <p style="margin-top:16px"><button type="submit">Agregar Evento</button></p>
    </form>
</div>"#,
        notice = render_notice(notice),
        calendar = render_calendar(panel, month),
        count = panel.count_label(),
        title = field(|v| v.title.as_str()),
        description = field(|v| v.description.as_str()),
        date = field(|v| v.date.as_str()),
        tags = field(|v| v.tags.as_str()),
    );
    render_shell(false, &inner)
}

/// Ask before deleting. `action` receives the confirmed form.
pub fn render_confirm(prompt: &str, action: &str, section: Option<Section>, back: &str) -> String {
    let section = section
        .map(|s| format!(r#"<input type="hidden" name="section" value="{}">"#, s.as_str()))
        .unwrap_or_default();
    let content = format!(
        r#"<main class="wrap" style="max-width:520px;padding-top:15vh">
    {BRAND}
    <p style="margin:24px 0">{prompt}</p>
    <form method="post" action="{action}">{section}<input type="hidden" name="confirmed" value="yes">
        <button class="danger" type="submit">Eliminar</button> <a class="chip" href="{back}">Cancelar</a>
    </form>
</main>"#,
        prompt = escape(prompt),
        action = escape(action),
        back = escape(back),
    );
    build_page("Confirmar · Agua Barranca", "dark", &content)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embalse_core::content::Content;

    #[test]
    fn login_shows_error() {
        let html = render_login(Some("Contraseña incorrecta."));
        assert!(html.contains("Contraseña incorrecta."));
        assert!(html.contains(r#"action="/admin/login""#));
    }

    #[tokio::test]
    async fn empty_cards_panel() {
        let mut panel = CardsPanel::new(Content::unconfigured());
        panel.load().await;
        let html = render_cards(
            &panel,
            Some(&Notice::Error("Error al crear la tarjeta.".to_owned())),
            None,
        );
        assert!(html.contains("0 tarjetas"));
        assert!(html.contains("notice err"));
        assert!(html.contains(r#"name="section" value="raices""#));
    }

    #[tokio::test]
    async fn calendar_grid_marks_nothing_without_events() {
        let panel = EventsPanel::new(Content::unconfigured());
        let html = render_events(&panel, CalendarMonth::new(2026, 3).unwrap(), None, None);
        assert!(html.contains("marzo 2026"));
        assert!(html.contains("month=2026-02"));
        assert!(html.contains("month=2026-04"));
        assert!(!html.contains("has-event\">"));
        assert!(html.contains("<td>31</td>"));
    }

    #[test]
    fn failed_event_form_keeps_values() {
        let panel = EventsPanel::new(Content::unconfigured());
        let values = EventForm {
            title: "Noche de \"estrellas\"".to_owned(),
            description: "<b>Observación</b>".to_owned(),
            date: String::new(),
            category: "cultura".to_owned(),
            tags: "cielo, noche".to_owned(),
            image: None,
        };
        let html = render_events(&panel, CalendarMonth::new(2026, 3).unwrap(), None, Some(&values));
        assert!(html.contains(r#"value="Noche de &quot;estrellas&quot;""#));
        assert!(html.contains(">&lt;b&gt;Observación&lt;/b&gt;</textarea>"));
        assert!(html.contains(r#"value="cielo, noche""#));
        assert!(html.contains(r#"<option value="cultura" selected>"#));
    }

    #[tokio::test]
    async fn fresh_card_form_is_empty() {
        let panel = CardsPanel::new(Content::unconfigured());
        let html = render_cards(&panel, None, None);
        assert!(html.contains(r#"name="title" value="" required"#));
        assert!(html.contains("required></textarea>"));
    }

    #[test]
    fn confirm_page_carries_confirmation() {
        let html = render_confirm(
            "¿Eliminar \"Agua\"? Esta acción no se puede deshacer.",
            "/admin/cards/abc/delete",
            Some(Section::Preservacion),
            "/admin?tab=cards&section=preservacion",
        );
        assert!(html.contains(r#"name="confirmed" value="yes""#));
        assert!(html.contains("¿Eliminar &quot;Agua&quot;?"));
        assert!(html.contains(r#"value="preservacion""#));
    }
}
