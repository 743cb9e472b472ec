//! Public page content.
//!
//! Records load once per render. A section or event list that comes back
//! empty (including every failure, which the data access layer already turns
//! into an empty list) is replaced by fixed fallback data, so the page is
//! never blank.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::calendar::site_offset;
use crate::content::Content;
use crate::models::{Category, Event, HighlightCard, Section};

/// Cards for both highlight sections.
#[derive(Debug, Clone)]
pub struct HighlightSections {
    pub raices: Vec<HighlightCard>,
    pub preservacion: Vec<HighlightCard>,
}

impl HighlightSections {
    #[must_use]
    pub fn get(&self, section: Section) -> &[HighlightCard] {
        match section {
            Section::Raices => &self.raices,
            Section::Preservacion => &self.preservacion,
        }
    }
}

/// Fetch both sections concurrently, each falling back on its own.
pub async fn load_highlights(content: &Content) -> HighlightSections {
    let (raices, preservacion) = tokio::join!(
        content.list_cards(Section::Raices),
        content.list_cards(Section::Preservacion),
    );
    HighlightSections {
        raices: or_fallback_cards(raices, Section::Raices),
        preservacion: or_fallback_cards(preservacion, Section::Preservacion),
    }
}

fn or_fallback_cards(cards: Vec<HighlightCard>, section: Section) -> Vec<HighlightCard> {
    if cards.is_empty() {
        debug!(section = %section, "no cards stored, showing fallback");
        fallback_cards(section)
    } else {
        cards
    }
}

/// Events by date, earliest first; the fallback set when none are stored.
pub async fn load_events(content: &Content) -> Vec<Event> {
    let mut events = content.list_events().await;
    if events.is_empty() {
        debug!("no events stored, showing fallback");
        events = fallback_events();
    }
    events.sort_by_key(|e| e.date);
    events
}

/// Keep the events of `category`; `None` keeps all. No store call.
#[must_use]
pub fn filter_events(events: &[Event], category: Option<Category>) -> Vec<Event> {
    events
        .iter()
        .filter(|e| category.is_none_or(|c| e.category == c))
        .cloned()
        .collect()
}

// ── Fallback data ────────────────────────────────────────────────────

fn card(id: &str, section: Section, order: i32, image: &str, title: &str, description: &str) -> HighlightCard {
    HighlightCard {
        id: id.to_owned(),
        section,
        title: title.to_owned(),
        description: description.to_owned(),
        image_url: image.to_owned(),
        display_order: order,
        created_at: None,
    }
}

/// The three built-in cards of `section`.
#[must_use]
pub fn fallback_cards(section: Section) -> Vec<HighlightCard> {
    match section {
        Section::Raices => vec![
            card(
                "f-1",
                section,
                1,
                "/images/lengua.png",
                "Lengua Hñähñu",
                "Preservamos la lengua Otomí a través de talleres, materiales educativos y programas intergeneracionales.",
            ),
            card(
                "f-2",
                section,
                2,
                "/images/gastronomia.png",
                "Gastronomía Ancestral",
                "La cocina Otomí refleja siglos de sabiduría: ingredientes locales, técnicas prehispánicas y sabores únicos.",
            ),
            card(
                "f-3",
                section,
                3,
                "/images/medicina.png",
                "Medicina Tradicional",
                "Herbolaria y conocimientos medicinales transmitidos de generación en generación para el bienestar comunitario.",
            ),
        ],
        Section::Preservacion => vec![
            card(
                "f-4",
                section,
                1,
                "/images/hongos.png",
                "Biodiversidad: Hongos",
                "Documentamos y protegemos la extraordinaria diversidad de hongos del bosque de niebla.",
            ),
            card(
                "f-5",
                section,
                2,
                "/images/reforestacion.png",
                "Reforestación",
                "Programas activos de reforestación con árboles nativos para restaurar los ecosistemas.",
            ),
            card(
                "f-6",
                section,
                3,
                "/images/agua.png",
                "Conservación del Agua",
                "Protegemos los manantiales, ríos y el embalse natural que abastecen a toda la región.",
            ),
        ],
    }
}

/// Site-local wall clock time as UTC.
fn site_time(y: i32, m: u32, d: u32, hour: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(y, m, d)?
        .and_hms_opt(hour, 0, 0)?
        .and_local_timezone(site_offset())
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The four built-in events.
#[must_use]
pub fn fallback_events() -> Vec<Event> {
    let specs: [(&str, &str, &str, (i32, u32, u32, u32), Category, [&str; 2]); 4] = [
        (
            "1",
            "Senderismo en la Reserva",
            "Recorrido guiado por los senderos de la reserva natural, con avistamiento de aves y flora endémica.",
            (2026, 3, 15, 9),
            Category::Ecoturismo,
            ["senderismo", "avistamientos"],
        ),
        (
            "2",
            "Taller de Lengua Otomí",
            "Sesión introductoria a la lengua Hñähñu con hablantes nativos de la comunidad.",
            (2026, 3, 22, 10),
            Category::Cultura,
            ["lengua", "comunidad"],
        ),
        (
            "3",
            "Jornada de Reforestación",
            "Actividad comunitaria de plantación de árboles nativos en la zona de amortiguamiento.",
            (2026, 4, 5, 8),
            Category::Activismo,
            ["reforestación", "voluntariado"],
        ),
        (
            "4",
            "Taller de Medicina Tradicional",
            "Conoce las plantas medicinales de la región y sus usos ancestrales.",
            (2026, 4, 12, 11),
            Category::Talleres,
            ["medicina", "herbolaria"],
        ),
    ];

    specs
        .into_iter()
        .filter_map(|(id, title, description, (y, m, d, h), category, tags)| {
            Some(Event {
                id: id.to_owned(),
                title: title.to_owned(),
                description: description.to_owned(),
                date: site_time(y, m, d, h)?,
                category,
                image_url: None,
                tags: tags.iter().map(|t| (*t).to_owned()).collect(),
                created_at: None,
            })
        })
        .collect()
}

// ── Static copy ──────────────────────────────────────────────────────

/// Landing banner.
pub struct Hero {
    pub badge: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub const HERO: Hero = Hero {
    badge: "Zona Otomí • Reserva Natural",
    title: "Agua Barranca",
    subtitle: "Preservando el patrimonio natural y cultural de la zona Otomí. \
               Protegemos el agua, la tierra y las tradiciones que nos definen.",
};

/// Heading and lead paragraph of a highlight section.
pub struct SectionIntro {
    pub label: &'static str,
    pub heading: &'static str,
    pub subtitle: &'static str,
}

#[must_use]
pub const fn section_intro(section: Section) -> SectionIntro {
    match section {
        Section::Raices => SectionIntro {
            label: "Nuestras Raíces",
            heading: "Cultura Viva",
            subtitle: "Las tradiciones Otomíes son el corazón de nuestra identidad. \
                       Trabajamos para que su lengua, gastronomía y medicina continúen floreciendo.",
        },
        Section::Preservacion => SectionIntro {
            label: "Preservación",
            heading: "Protegiendo Nuestro Ecosistema",
            subtitle: "Cada acción cuenta. Desde la reforestación hasta la conservación del agua, \
                       trabajamos para garantizar un futuro sustentable.",
        },
    }
}

/// One of the "who we are" pillars.
pub struct Pillar {
    pub title: &'static str,
    pub description: &'static str,
}

pub const PILLARS: [Pillar; 3] = [
    Pillar {
        title: "Fundación",
        description: "Nacimos del compromiso comunitario por proteger el embalse natural y \
                      preservar las tradiciones Otomíes para las futuras generaciones.",
    },
    Pillar {
        title: "Misión",
        description: "Conservar el ecosistema del embalse, promover el ecoturismo responsable y \
                      empoderar a la comunidad Otomí a través de la educación y cultura.",
    },
    Pillar {
        title: "Valores",
        description: "Respeto por la naturaleza, identidad cultural, trabajo comunitario, \
                      transparencia y compromiso con el desarrollo sostenible.",
    },
];

pub struct Testimonial {
    pub author: &'static str,
    pub role: &'static str,
    pub content: &'static str,
    pub initials: &'static str,
}

pub const TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        author: "María González",
        role: "Asistente - Senderismo en la Reserva",
        content: "Una experiencia increíble. Aprendí tanto sobre la flora y fauna de nuestra reserva. \
                  Los guías son apasionados y conocedores. ¡Volveré pronto!",
        initials: "MG",
    },
    Testimonial {
        author: "Carlos Ramírez",
        role: "Asistente - Taller de Lengua Otomí",
        content: "El taller de lengua Otomí me conectó con mis raíces de una forma que nunca imaginé. \
                  Escuchar a los mayores hablar en Hñähñu fue conmovedor.",
        initials: "CR",
    },
    Testimonial {
        author: "Ana Martínez",
        role: "Voluntaria - Jornada de Reforestación",
        content: "Plantar árboles con la comunidad fue una experiencia transformadora. \
                  La organización es excelente y el impacto es real y visible.",
        initials: "AM",
    },
];
