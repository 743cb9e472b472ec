//! Admin form input and its validation.
//!
//! Validation runs before any store call. A form that passes becomes the
//! typed draft the data access layer inserts.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::calendar::site_offset;
use crate::error::ValidationError;
use crate::models::{Category, ImageFile, Section};

/// Raw "add card" form.
#[derive(Debug, Clone, Default)]
pub struct CardForm {
    pub title: String,
    pub description: String,
    pub image: Option<ImageFile>,
}

/// Raw "add event" form.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    /// Calendar date as entered, `YYYY-MM-DD`.
    pub date: String,
    pub category: String,
    /// Comma-separated tags, e.g. `senderismo, naturaleza`.
    pub tags: String,
    pub image: Option<ImageFile>,
}

/// A validated card ready for upload + insert.
#[derive(Debug, Clone)]
pub struct CardDraft {
    pub section: Section,
    pub title: String,
    pub description: String,
    pub image: ImageFile,
}

/// A validated event ready for (optional upload +) insert.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category: Category,
    pub tags: Vec<String>,
    pub image: Option<ImageFile>,
}

impl CardForm {
    /// The typed fields alone, for refilling the form.
    #[must_use]
    pub fn without_image(&self) -> Self {
        Self {
            title: self.title.clone(),
            description: self.description.clone(),
            image: None,
        }
    }

    /// Check required fields for a card in `section`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, in form order.
    pub fn validate(self, section: Section) -> Result<CardDraft, ValidationError> {
        let title = required(&self.title, ValidationError::MissingTitle)?;
        let description = required(&self.description, ValidationError::MissingDescription)?;
        let image = self.image.ok_or(ValidationError::MissingImage)?;
        if !image.is_image() {
            return Err(ValidationError::NotAnImage);
        }

        Ok(CardDraft {
            section,
            title,
            description,
            image,
        })
    }
}

impl EventForm {
    /// The typed fields alone, for refilling the form.
    #[must_use]
    pub fn without_image(&self) -> Self {
        Self {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            image: None,
        }
    }

    /// Check required fields, parse the date, category, and tags.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, in form order.
    pub fn validate(self) -> Result<EventDraft, ValidationError> {
        let title = required(&self.title, ValidationError::MissingTitle)?;
        let description = required(&self.description, ValidationError::MissingDescription)?;
        let date = parse_form_date(&self.date)?;
        let category = self.category.parse::<Category>()?;
        if let Some(image) = &self.image {
            if !image.is_image() {
                return Err(ValidationError::NotAnImage);
            }
        }

        Ok(EventDraft {
            title,
            description,
            date,
            category,
            tags: parse_tags(&self.tags),
            image: self.image,
        })
    }
}

/// Split a comma-separated tag input: trim each entry, drop empty ones,
/// keep the order given.
#[must_use]
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a `YYYY-MM-DD` form date as midnight at the site's UTC offset.
///
/// # Errors
///
/// Returns [`ValidationError::MissingDate`] for blank input and
/// [`ValidationError::InvalidDate`] for anything that is not a calendar date.
pub fn parse_form_date(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::MissingDate);
    }
    let invalid = || ValidationError::InvalidDate {
        value: input.to_owned(),
    };

    let day = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())?;
    site_offset()
        .from_local_datetime(&day.and_time(NaiveTime::MIN))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(invalid)
}

fn required(value: &str, missing: ValidationError) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(missing)
    } else {
        Ok(value.to_owned())
    }
}
