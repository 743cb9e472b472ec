//! Data access layer over the content store.
//!
//! Thin request/response wrappers: list by section, insert, delete, upload.
//! No retries, no transactions. When no store is configured every operation
//! is a no-op that answers empty / `None` / `false` instead of failing, so the
//! public site keeps rendering from fallback data.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use embalse_store::{ContentStore, Direction, Query, Row};

use crate::error::ContentError;
use crate::forms::{CardDraft, EventDraft};
use crate::models::{Event, HighlightCard, ImageFile, NewCard, NewEvent, Section};

/// Table holding highlight cards.
pub const CARDS_TABLE: &str = "highlight_cards";
/// Table holding events.
pub const EVENTS_TABLE: &str = "events";
/// Bucket holding every uploaded image.
pub const IMAGES_BUCKET: &str = "highlight-images";

/// Handle to the content store, or to nothing.
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone, Default)]
pub struct Content {
    store: Option<Arc<dyn ContentStore>>,
}

impl std::fmt::Debug for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Content")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl Content {
    /// Data access over a configured store.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Safe no-op mode: nothing is read or written.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { store: None }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    // ── Cards ────────────────────────────────────────────────────────

    /// Cards of `section`, ascending by display order. Empty on any failure.
    pub async fn list_cards(&self, section: Section) -> Vec<HighlightCard> {
        let query = Query::all()
            .eq("section", section.as_str())
            .order_by("display_order", Direction::Ascending);
        let mut cards: Vec<HighlightCard> = self.select(CARDS_TABLE, &query).await;
        cards.sort_by_key(|c| c.display_order);
        cards
    }

    /// Upload the image, then insert the card. `None` if either step fails.
    pub async fn create_card(
        &self,
        section: Section,
        title: &str,
        description: &str,
        image: &ImageFile,
    ) -> Option<HighlightCard> {
        self.try_create_card(section, title, description, image)
            .await
            .ok()
    }

    /// [`create_card`](Self::create_card) with the reason for failure.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Upload`] if the image is not stored (nothing is
    /// inserted) and [`ContentError::Insert`] if the row is not (the uploaded
    /// image stays in the bucket). [`ContentError::Unreadable`] means the row
    /// was stored but the store's copy of it could not be decoded.
    pub async fn try_create_card(
        &self,
        section: Section,
        title: &str,
        description: &str,
        image: &ImageFile,
    ) -> Result<HighlightCard, ContentError> {
        let store = self.store.as_ref().ok_or(ContentError::NotConfigured)?;
        let image_url = upload_to(store.as_ref(), image)
            .await
            .map_err(ContentError::Upload)?;

        let row = NewCard {
            section,
            title: title.to_owned(),
            description: description.to_owned(),
            image_url,
            display_order: 0,
        };
        let card = insert_into(store.as_ref(), CARDS_TABLE, &row).await?;
        debug!(section = %section, "highlight card created");
        Ok(card)
    }

    /// Create a card from a validated form draft.
    ///
    /// # Errors
    ///
    /// See [`try_create_card`](Self::try_create_card).
    pub async fn create_card_from(&self, draft: &CardDraft) -> Result<HighlightCard, ContentError> {
        self.try_create_card(draft.section, &draft.title, &draft.description, &draft.image)
            .await
    }

    /// Delete a card. `true` when the store accepted the delete.
    pub async fn delete_card(&self, id: &str) -> bool {
        self.delete(CARDS_TABLE, id).await
    }

    // ── Events ───────────────────────────────────────────────────────

    /// All events, in whatever order the store returns. Empty on any failure.
    pub async fn list_events(&self) -> Vec<Event> {
        self.select(EVENTS_TABLE, &Query::all()).await
    }

    /// Upload the image if one is given, then insert the event.
    /// `None` if either step fails.
    pub async fn create_event(&self, draft: &EventDraft) -> Option<Event> {
        self.try_create_event(draft).await.ok()
    }

    /// [`create_event`](Self::create_event) with the reason for failure.
    ///
    /// # Errors
    ///
    /// As for [`try_create_card`](Self::try_create_card).
    pub async fn try_create_event(&self, draft: &EventDraft) -> Result<Event, ContentError> {
        let store = self.store.as_ref().ok_or(ContentError::NotConfigured)?;
        let image_url = match &draft.image {
            Some(image) => Some(
                upload_to(store.as_ref(), image)
                    .await
                    .map_err(ContentError::Upload)?,
            ),
            None => None,
        };

        let row = NewEvent {
            title: draft.title.clone(),
            description: draft.description.clone(),
            date: draft.date,
            category: draft.category,
            tags: draft.tags.clone(),
            image_url,
        };
        let event = insert_into(store.as_ref(), EVENTS_TABLE, &row).await?;
        debug!(category = %draft.category, "event created");
        Ok(event)
    }

    /// Delete an event. `true` when the store accepted the delete.
    pub async fn delete_event(&self, id: &str) -> bool {
        self.delete(EVENTS_TABLE, id).await
    }

    // ── Images ───────────────────────────────────────────────────────

    /// Store an image under a fresh collision-resistant name and return its
    /// public URL, or `None` on failure.
    pub async fn upload_image(&self, image: &ImageFile) -> Option<String> {
        let store = self.store.as_ref()?;
        upload_to(store.as_ref(), image).await.ok()
    }

    // ── Private ──────────────────────────────────────────────────────

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Vec<T> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        match store.select(table, query).await {
            Ok(rows) => decode_rows(table, rows),
            Err(e) => {
                warn!(table, error = %e, "content list failed");
                Vec::new()
            }
        }
    }

    async fn delete(&self, table: &str, id: &str) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        match store.delete(table, id).await {
            Ok(()) => {
                debug!(table, id, "row deleted");
                true
            }
            Err(e) => {
                warn!(table, id, error = %e, "delete failed");
                false
            }
        }
    }
}

async fn upload_to(
    store: &dyn ContentStore,
    image: &ImageFile,
) -> Result<String, embalse_store::StoreError> {
    let name = object_name(&image.file_name, Utc::now().timestamp_millis());
    match store
        .upload(IMAGES_BUCKET, &name, &image.content_type, &image.bytes)
        .await
    {
        Ok(()) => {
            debug!(name = %name, bytes = image.bytes.len(), "image uploaded");
            Ok(store.public_url(IMAGES_BUCKET, &name))
        }
        Err(e) => {
            warn!(name = %name, error = %e, "image upload failed");
            Err(e)
        }
    }
}

async fn insert_into<T, R>(store: &dyn ContentStore, table: &str, row: &R) -> Result<T, ContentError>
where
    T: DeserializeOwned,
    R: serde::Serialize,
{
    let payload = serde_json::to_value(row)?;
    let stored = store.insert(table, payload).await.map_err(|e| {
        warn!(table, error = %e, "insert failed");
        ContentError::Insert(e)
    })?;
    serde_json::from_value(stored).map_err(|e| {
        warn!(table, error = %e, "row stored but the returned row could not be decoded");
        ContentError::Unreadable(e)
    })
}

/// Decode rows one by one; a row that does not fit the model is skipped.
fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Row>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(table, error = %e, "skipping undecodable row");
                None
            }
        })
        .collect()
}

/// Object name for an upload: `<millis>-<8 hex chars>.<ext>`.
///
/// The extension is the original file's last extension, lower-cased, or
/// `bin` when it has none.
#[must_use]
pub fn object_name(original: &str, millis: i64) -> String {
    let ext = original
        .rsplit_once('.')
        .map(|(stem, ext)| (stem, ext.trim()))
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty() && ext.chars().all(char::is_alphanumeric))
        .map_or_else(|| "bin".to_owned(), |(_, ext)| ext.to_lowercase());
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{millis}-{}.{ext}", &suffix[..8])
}
