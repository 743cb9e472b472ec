//! Admin panels for cards and events.
//!
//! Each panel holds the list it last loaded. Creating reloads the list from
//! the store; deleting removes the row locally once the store accepts it.
//! Other writers are not reconciled until the next load.

use crate::content::Content;
use crate::error::{ContentError, SubmitError};
use crate::forms::{CardForm, EventForm};
use crate::models::{Event, HighlightCard, Section};

/// Result of a delete request from a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The admin did not confirm; the store was not contacted.
    Cancelled,
    Deleted,
    /// The store refused or could not be reached; the list is unchanged.
    Failed,
}

fn count_label(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("1 {singular}")
    } else {
        format!("{n} {plural}")
    }
}

fn confirmation_prompt(title: &str) -> String {
    format!("¿Eliminar \"{title}\"? Esta acción no se puede deshacer.")
}

fn submit_error(e: ContentError, not_created: SubmitError) -> SubmitError {
    match e {
        ContentError::NotConfigured => SubmitError::NotConfigured,
        ContentError::Upload(_) => SubmitError::Upload,
        ContentError::Insert(_) | ContentError::Decode(_) => not_created,
        ContentError::Unreadable(_) => SubmitError::Unconfirmed,
    }
}

// ── Cards ────────────────────────────────────────────────────────────

/// Manage the highlight cards of one section at a time.
#[derive(Debug, Clone)]
pub struct CardsPanel {
    content: Content,
    section: Section,
    cards: Vec<HighlightCard>,
    loading: bool,
}

impl CardsPanel {
    /// A panel on the `raices` section, not yet loaded.
    #[must_use]
    pub fn new(content: Content) -> Self {
        Self::with_section(content, Section::Raices)
    }

    /// A panel on `section`, not yet loaded.
    #[must_use]
    pub fn with_section(content: Content, section: Section) -> Self {
        Self {
            content,
            section,
            cards: Vec::new(),
            loading: false,
        }
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    #[must_use]
    pub fn cards(&self) -> &[HighlightCard] {
        &self.cards
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn load(&mut self) {
        self.loading = true;
        self.cards = self.content.list_cards(self.section).await;
        self.loading = false;
    }

    /// Switch section. Reloads only when the section actually changes.
    pub async fn select_section(&mut self, section: Section) {
        if section != self.section {
            self.section = section;
            self.load().await;
        }
    }

    /// "1 tarjeta" / "N tarjetas".
    #[must_use]
    pub fn count_label(&self) -> String {
        count_label(self.cards.len(), "tarjeta", "tarjetas")
    }

    /// The question asked before deleting `id`, or `None` if it is not listed.
    #[must_use]
    pub fn confirmation_prompt(&self, id: &str) -> Option<String> {
        self.cards
            .iter()
            .find(|c| c.id == id)
            .map(|c| confirmation_prompt(&c.title))
    }

    pub async fn delete(&mut self, id: &str, confirmed: bool) -> DeleteOutcome {
        if !confirmed {
            return DeleteOutcome::Cancelled;
        }
        if self.content.delete_card(id).await {
            self.cards.retain(|c| c.id != id);
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::Failed
        }
    }

    /// Validate, upload the image, insert, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] whose message is shown next to the form.
    pub async fn submit(&mut self, form: CardForm) -> Result<HighlightCard, SubmitError> {
        let draft = form.validate(self.section)?;
        let created = self
            .content
            .create_card_from(&draft)
            .await
            .map_err(|e| submit_error(e, SubmitError::CardNotCreated));
        if matches!(created, Ok(_) | Err(SubmitError::Unconfirmed)) {
            self.load().await;
        }
        created
    }
}

// ── Events ───────────────────────────────────────────────────────────

/// Manage events.
#[derive(Debug, Clone)]
pub struct EventsPanel {
    content: Content,
    events: Vec<Event>,
    loading: bool,
}

impl EventsPanel {
    #[must_use]
    pub fn new(content: Content) -> Self {
        Self {
            content,
            events: Vec::new(),
            loading: false,
        }
    }

    /// Events ordered by date, earliest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn load(&mut self) {
        self.loading = true;
        let mut events = self.content.list_events().await;
        events.sort_by_key(|e| e.date);
        self.events = events;
        self.loading = false;
    }

    /// "1 evento" / "N eventos".
    #[must_use]
    pub fn count_label(&self) -> String {
        count_label(self.events.len(), "evento", "eventos")
    }

    #[must_use]
    pub fn confirmation_prompt(&self, id: &str) -> Option<String> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .map(|e| confirmation_prompt(&e.title))
    }

    pub async fn delete(&mut self, id: &str, confirmed: bool) -> DeleteOutcome {
        if !confirmed {
            return DeleteOutcome::Cancelled;
        }
        if self.content.delete_event(id).await {
            self.events.retain(|e| e.id != id);
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::Failed
        }
    }

    /// Validate, upload the image if any, insert, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] whose message is shown next to the form.
    pub async fn submit(&mut self, form: EventForm) -> Result<Event, SubmitError> {
        let draft = form.validate()?;
        let created = self
            .content
            .try_create_event(&draft)
            .await
            .map_err(|e| submit_error(e, SubmitError::EventNotCreated));
        if matches!(created, Ok(_) | Err(SubmitError::Unconfirmed)) {
            self.load().await;
        }
        created
    }
}
