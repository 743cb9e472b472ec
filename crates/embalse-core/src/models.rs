//! Content model: highlight cards and events.
//!
//! Both record types are create/delete only. The store assigns `id` and
//! `created_at`; everything else comes from an admin submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

// ── Sections ─────────────────────────────────────────────────────────

/// The site section a highlight card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Culture: language, food, traditional medicine.
    Raices,
    /// Conservation: biodiversity, reforestation, water.
    Preservacion,
}

impl Section {
    /// Both sections, in page order.
    pub const ALL: [Self; 2] = [Self::Raices, Self::Preservacion];

    /// Value stored in the `section` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raices => "raices",
            Self::Preservacion => "preservacion",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Raices => "Raíces",
            Self::Preservacion => "Preservación",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Section {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raices" => Ok(Self::Raices),
            "preservacion" => Ok(Self::Preservacion),
            other => Err(ValidationError::UnknownSection {
                value: other.to_owned(),
            }),
        }
    }
}

// ── Categories ───────────────────────────────────────────────────────

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ecoturismo,
    Cultura,
    Talleres,
    Activismo,
}

impl Category {
    /// All categories, in filter-bar order.
    pub const ALL: [Self; 4] = [
        Self::Ecoturismo,
        Self::Cultura,
        Self::Talleres,
        Self::Activismo,
    ];

    /// Value stored in the `category` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ecoturismo => "ecoturismo",
            Self::Cultura => "cultura",
            Self::Talleres => "talleres",
            Self::Activismo => "activismo",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ecoturismo => "Ecoturismo",
            Self::Cultura => "Cultura",
            Self::Talleres => "Talleres",
            Self::Activismo => "Activismo",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| ValidationError::UnknownCategory {
                value: s.to_owned(),
            })
    }
}

// ── Records ──────────────────────────────────────────────────────────

/// A promotional card shown in one of the two highlight sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightCard {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub section: Section,
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_order: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A calendared activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category: Category,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a highlight card.
#[derive(Debug, Clone, Serialize)]
pub struct NewCard {
    pub section: Section,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub display_order: i32,
}

/// Insert payload for an event.
#[derive(Debug, Clone, Serialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category: Category,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
}

/// An uploaded image file.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Name as the browser sent it, e.g. `reforestacion.png`.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Whether the declared content type is an image type.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Accept string or numeric identifiers and keep them as opaque strings.
fn opaque_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Read an explicit `null` column the same as a missing one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
