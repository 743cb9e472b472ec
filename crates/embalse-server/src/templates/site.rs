//! The public one-page site.

use std::fmt::Write as _;

use embalse_core::calendar::{month_short, site_date};
use embalse_core::display::{self, HighlightSections, HERO, PILLARS, TESTIMONIALS};
use embalse_core::models::{Category, Event, HighlightCard, Section};

use super::{build_page, escape};

/// Render the home page.
///
/// `events` is the full list; `filter` picks which of them are shown.
pub fn render_home(sections: &HighlightSections, events: &[Event], filter: Option<Category>) -> String {
    let mut content = String::new();
    content.push_str(&render_nav());
    content.push_str(&render_hero());
    content.push_str(&render_pillars());
    for section in Section::ALL {
        content.push_str(&render_highlights(section, sections.get(section)));
    }
    content.push_str(&render_events(events, filter));
    content.push_str(&render_testimonials());
    content.push_str(
        r"<footer>Agua Barranca · Reserva Natural Otomí</footer>",
    );

    build_page("Agua Barranca", "", &content)
}

fn render_nav() -> String {
    r##"<nav class="top">
    <span class="brand"><b>Agua</b> Barranca</span>
    <span><a href="#quienes-somos">Quiénes Somos</a><a href="#raices">Raíces</a><a href="#preservacion">Preservación</a><a href="#eventos">Eventos</a></span>
</nav>"##
        .to_owned()
}

fn render_hero() -> String {
    format!(
        r##"<header class="hero">
    <span class="badge">{badge}</span>
    <h1>{title}</h1>
    <p>{subtitle}</p>
    <p style="margin-top:24px"><a href="#quienes-somos" class="chip">Descubre Nuestra Misión</a> <a href="#eventos" class="chip">Próximos Eventos</a></p>
</header>"##,
        badge = escape(HERO.badge),
        title = escape(HERO.title),
        subtitle = escape(HERO.subtitle),
    )
}

fn render_pillars() -> String {
    let mut items = String::new();
    for pillar in &PILLARS {
        let _ = write!(
            items,
            r#"<div class="card"><div class="body"><h3>{}</h3><p>{}</p></div></div>"#,
            escape(pillar.title),
            escape(pillar.description),
        );
    }
    format!(
        r#"<section id="quienes-somos"><div class="wrap">
    <span class="label">Quiénes Somos</span>
    <h2>Guardianes del Embalse</h2>
    <div class="grid">{items}</div>
</div></section>"#
    )
}

fn render_card(card: &HighlightCard) -> String {
    format!(
        r#"<article class="card"><img src="{src}" alt="{alt}" loading="lazy"><div class="body"><h3>{title}</h3><p>{description}</p></div></article>"#,
        src = escape(&card.image_url),
        alt = escape(&card.title),
        title = escape(&card.title),
        description = escape(&card.description),
    )
}

fn render_highlights(section: Section, cards: &[HighlightCard]) -> String {
    let intro = display::section_intro(section);
    let cards: String = cards.iter().map(render_card).collect();
    format!(
        r#"<section id="{id}"><div class="wrap">
    <span class="label">{label}</span>
    <h2>{heading}</h2>
    <p>{subtitle}</p>
    <div class="grid">{cards}</div>
</div></section>"#,
        id = section.as_str(),
        label = escape(intro.label),
        heading = escape(intro.heading),
        subtitle = escape(intro.subtitle),
    )
}

fn render_event(event: &Event) -> String {
    let day = site_date(event.date);
    let tags: String = event
        .tags
        .iter()
        .map(|t| format!(r#"<span class="tag">#{}</span>"#, escape(t)))
        .collect();
    let image = event
        .image_url
        .as_deref()
        .map(|src| {
            format!(
                r#"<img src="{}" alt="" loading="lazy" style="width:120px;height:80px;object-fit:cover;border-radius:8px">"#,
                escape(src)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<article class="event" data-category="{category}">
    <div class="date"><b>{day}</b>{month}</div>
    <div style="flex:1"><span class="chip">{label}</span><h3>{title}</h3><p>{description}</p><div>{tags}</div></div>
    {image}
</article>"#,
        category = event.category.as_str(),
        day = chrono::Datelike::day(&day),
        month = month_short(day),
        label = event.category.label(),
        title = escape(&event.title),
        description = escape(&event.description),
    )
}

fn render_events(events: &[Event], filter: Option<Category>) -> String {
    let mut chips = format!(
        r##"<a class="chip{}" href="/#eventos">Todos</a>"##,
        if filter.is_none() { " active" } else { "" }
    );
    for category in Category::ALL {
        let _ = write!(
            chips,
            r##"<a class="chip{active}" href="/?category={value}#eventos">{label}</a>"##,
            active = if filter == Some(category) { " active" } else { "" },
            value = category.as_str(),
            label = category.label(),
        );
    }

    let shown = display::filter_events(events, filter);
    let list = if shown.is_empty() {
        r#"<p class="muted">No hay eventos en esta categoría.</p>"#.to_owned()
    } else {
        shown.iter().map(render_event).collect()
    };

    format!(
        r#"<section id="eventos" class="events"><div class="wrap">
    <span class="label">Calendario</span>
    <h2>Próximos Eventos</h2>
    <p>Únete a nuestras actividades de ecoturismo, cultura, talleres y activismo.</p>
    <div style="margin:24px 0">{chips}</div>
    <div class="grid">{list}</div>
</div></section>"#
    )
}

fn render_testimonials() -> String {
    let mut items = String::new();
    for t in &TESTIMONIALS {
        let _ = write!(
            items,
            r#"<blockquote class="quote"><p>“{content}”</p><footer style="background:none;color:inherit;text-align:left;padding:12px 0 0"><span class="avatar">{initials}</span> <b>{author}</b> <span class="muted">{role}</span></footer></blockquote>"#,
            content = escape(t.content),
            initials = escape(t.initials),
            author = escape(t.author),
            role = escape(t.role),
        );
    }
    format!(
        r#"<section id="testimonios"><div class="wrap">
    <span class="label">Testimonios</span>
    <h2>Lo Que Dicen</h2>
    <div class="grid">{items}</div>
</div></section>"#
    )
}
