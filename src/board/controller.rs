//! Board controller — the ordered lists, the title, and their URL.
//!
//! DESIGN
//! ======
//! The controller is a plain state machine. Each operation mutates state and
//! returns the `Effect`s the outside world has to carry out: replace the page
//! URL, retitle the page, run a fetch, re-render a list. Nothing here awaits
//! or talks to the network, which keeps every ordering rule testable without
//! a runtime.
//!
//! INVARIANTS
//! ==========
//! - `lists` order is the render order and the serialization order.
//! - Every change to title, membership, order, or a list's name/query emits
//!   exactly one `Effect::ReplaceUrl`. Fetch progress never does: the URL
//!   describes configuration, not loading state.
//! - No-op mutations (same value, self-drop, unknown target) emit nothing.

use reqwest::Url;
use tracing::{debug, info};

use super::list::{DragMarkers, FetchCompletion, FetchTicket, ListEntity, ListId, QueryChange};
use super::render::RenderMode;
use super::url::{self, BoardState, ListPreset};

/// Suffix of every page title, and the whole title for untitled boards.
pub const PAGE_TITLE_BASE: &str = "Bugzilla board";

// =============================================================================
// EFFECTS
// =============================================================================

/// Work the controller hands back to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace (not push) the current history entry with this URL.
    ReplaceUrl(String),
    SetPageTitle(String),
    /// Run this search and feed the result back via `complete_fetch`.
    Fetch(FetchTicket),
    /// The list's view changed and should be re-rendered.
    ListChanged(ListId),
    ListRemoved(ListId),
    /// The list order changed.
    OrderChanged,
    /// The list's drag markers changed.
    MarkersChanged(ListId),
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("list not found: {0}")]
    UnknownList(ListId),
    #[error("invalid board url: {0}")]
    InvalidUrl(String),
    #[error("no delete awaiting confirmation for list {0}")]
    NoPendingConfirmation(ListId),
}

impl crate::frame::ErrorCode for BoardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownList(_) => "E_UNKNOWN_LIST",
            Self::InvalidUrl(_) => "E_INVALID_URL",
            Self::NoPendingConfirmation(_) => "E_NO_PENDING_CONFIRMATION",
        }
    }
}

/// Result of a delete request. Declining is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Debug, Clone)]
pub struct BoardController {
    /// Page URL the board is encoded onto.
    base_url: Url,
    /// Tracker origin for issue links.
    tracker_url: String,
    mode: RenderMode,
    title: String,
    lists: Vec<ListEntity>,
}

impl BoardController {
    #[must_use]
    pub fn new(base_url: Url, tracker_url: impl Into<String>, mode: RenderMode) -> Self {
        Self { base_url, tracker_url: tracker_url.into(), mode, title: String::new(), lists: Vec::new() }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// `"<title> - Bugzilla board"`, or just `"Bugzilla board"` untitled.
    #[must_use]
    pub fn page_title(&self) -> String {
        if self.title.is_empty() {
            PAGE_TITLE_BASE.to_string()
        } else {
            format!("{} - {PAGE_TITLE_BASE}", self.title)
        }
    }

    #[must_use]
    pub fn lists(&self) -> &[ListEntity] {
        &self.lists
    }

    #[must_use]
    pub fn list(&self, id: ListId) -> Option<&ListEntity> {
        self.lists.iter().find(|list| list.id() == id)
    }

    #[must_use]
    pub fn position(&self, id: ListId) -> Option<usize> {
        self.lists.iter().position(|list| list.id() == id)
    }

    #[must_use]
    pub fn order(&self) -> Vec<ListId> {
        self.lists.iter().map(ListEntity::id).collect()
    }

    #[must_use]
    pub fn tracker_url(&self) -> &str {
        &self.tracker_url
    }

    /// The persisted part of the board.
    #[must_use]
    pub fn state(&self) -> BoardState {
        BoardState {
            title: self.title.clone(),
            lists: self
                .lists
                .iter()
                .map(|list| ListPreset::new(list.name(), list.query()))
                .collect(),
        }
    }

    #[must_use]
    pub fn url(&self) -> Url {
        url::encode(&self.base_url, &self.state())
    }

    // -------------------------------------------------------------------------
    // Board-level mutations
    // -------------------------------------------------------------------------

    /// Replace the whole board with a decoded state (page load or
    /// navigation). Starts a fetch for every list with a query.
    pub fn load(&mut self, state: &BoardState) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self
            .lists
            .drain(..)
            .map(|list| Effect::ListRemoved(list.id()))
            .collect();

        self.title.clone_from(&state.title);
        effects.push(Effect::SetPageTitle(self.page_title()));

        for preset in &state.lists {
            let (list, fetch) = self.instantiate(preset);
            effects.push(Effect::ListChanged(list));
            effects.extend(fetch.map(Effect::Fetch));
        }

        info!(title = %self.title, lists = self.lists.len(), "board: loaded");
        effects.push(Effect::OrderChanged);
        self.apply_state_change(&mut effects);
        effects
    }

    /// Decode a page URL and load it.
    pub fn load_url(&mut self, page_url: &Url) -> Vec<Effect> {
        self.load(&url::decode(page_url))
    }

    /// Decode a raw (possibly `?`-prefixed) query string and load it.
    pub fn load_query(&mut self, raw: &str) -> Vec<Effect> {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let page_url = url::with_raw_query(&self.base_url, Some(raw));
        self.load_url(&page_url)
    }

    /// Parse an absolute page URL and load it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidUrl`] if `href` is not an absolute URL.
    pub fn load_href(&mut self, href: &str) -> Result<Vec<Effect>, BoardError> {
        let page_url = Url::parse(href).map_err(|e| BoardError::InvalidUrl(format!("{href}: {e}")))?;
        Ok(self.load_url(&page_url))
    }

    pub fn set_title(&mut self, title: &str) -> Vec<Effect> {
        if self.title == title {
            return Vec::new();
        }
        self.title = title.to_string();
        let mut effects = vec![Effect::SetPageTitle(self.page_title())];
        self.apply_state_change(&mut effects);
        effects
    }

    /// Append a list at the end of the board.
    pub fn add_list(&mut self, name: &str, query: &str) -> (ListId, Vec<Effect>) {
        let (id, fetch) = self.instantiate(&ListPreset::new(name, query));
        let mut effects = vec![Effect::ListChanged(id)];
        effects.extend(fetch.map(Effect::Fetch));
        effects.push(Effect::OrderChanged);
        self.apply_state_change(&mut effects);
        info!(list_id = %id, position = self.lists.len() - 1, "board: list added");
        (id, effects)
    }

    // -------------------------------------------------------------------------
    // List-level mutations
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`BoardError::UnknownList`] if no list has this id.
    pub fn set_list_name(&mut self, id: ListId, name: &str) -> Result<Vec<Effect>, BoardError> {
        self.edit_list(id, Some(name), None)
    }

    /// # Errors
    ///
    /// Returns [`BoardError::UnknownList`] if no list has this id.
    pub fn set_list_query(&mut self, id: ListId, query: &str) -> Result<Vec<Effect>, BoardError> {
        self.edit_list(id, None, Some(query))
    }

    /// Apply the edit dialog: name and/or query. One URL replacement covers
    /// the whole edit; unchanged fields are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownList`] if no list has this id.
    pub fn edit_list(
        &mut self,
        id: ListId,
        name: Option<&str>,
        query: Option<&str>,
    ) -> Result<Vec<Effect>, BoardError> {
        let list = self.list_mut(id)?;

        let renamed = name.is_some_and(|name| list.set_name(name));
        let change = query.map_or(QueryChange::Unchanged, |query| list.set_query(query));

        let mut effects = Vec::new();
        if !renamed && change == QueryChange::Unchanged {
            return Ok(effects);
        }

        effects.push(Effect::ListChanged(id));
        if let QueryChange::Fetch(ticket) = change {
            effects.push(Effect::Fetch(ticket));
        }
        self.apply_state_change(&mut effects);
        Ok(effects)
    }

    /// Prompt shown before deleting a list.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownList`] if no list has this id.
    pub fn delete_prompt(&self, id: ListId) -> Result<String, BoardError> {
        let list = self.list(id).ok_or(BoardError::UnknownList(id))?;
        Ok(format!("Do you really want to delete \"{}\"?", list.name()))
    }

    /// Delete a list after asking `confirm`. Declining changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownList`] if no list has this id.
    pub fn delete_list(
        &mut self,
        id: ListId,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<(DeleteOutcome, Vec<Effect>), BoardError> {
        let prompt = self.delete_prompt(id)?;
        if !confirm(&prompt) {
            debug!(list_id = %id, "board: delete declined");
            return Ok((DeleteOutcome::Declined, Vec::new()));
        }

        self.lists.retain(|list| list.id() != id);
        info!(list_id = %id, remaining = self.lists.len(), "board: list deleted");

        let mut effects = vec![Effect::ListRemoved(id), Effect::OrderChanged];
        self.apply_state_change(&mut effects);
        Ok((DeleteOutcome::Deleted, effects))
    }

    /// Move `dragged` to sit directly before `target`.
    ///
    /// Self-drops, unknown ids, and moves that leave the order as it was are
    /// no-ops and emit nothing.
    pub fn move_before(&mut self, dragged: ListId, target: ListId) -> Vec<Effect> {
        if dragged == target {
            return Vec::new();
        }
        let (Some(from), Some(_)) = (self.position(dragged), self.position(target)) else {
            return Vec::new();
        };

        let before = self.order();
        let list = self.lists.remove(from);
        let to = self.position(target).unwrap_or(self.lists.len());
        self.lists.insert(to, list);

        if self.order() == before {
            return Vec::new();
        }

        info!(list_id = %dragged, from, to, "board: list moved");
        let mut effects = vec![Effect::OrderChanged];
        self.apply_state_change(&mut effects);
        effects
    }

    /// Feed a finished fetch back to its list. Stale or orphaned results are
    /// dropped without effects.
    pub fn complete_fetch(&mut self, completion: FetchCompletion) -> Vec<Effect> {
        let FetchCompletion { ticket, result } = completion;
        let tracker_url = self.tracker_url.clone();
        let Ok(list) = self.list_mut(ticket.list_id) else {
            debug!(list_id = %ticket.list_id, "board: fetch finished for deleted list");
            return Vec::new();
        };

        if list.apply_fetch(ticket.generation, result, &tracker_url) {
            vec![Effect::ListChanged(ticket.list_id)]
        } else {
            Vec::new()
        }
    }

    /// Update a list's drag markers. `None` if unknown or unchanged.
    pub(crate) fn set_markers(&mut self, id: ListId, markers: DragMarkers) -> Option<Effect> {
        let list = self.list_mut(id).ok()?;
        if list.markers == markers {
            return None;
        }
        list.markers = markers;
        Some(Effect::MarkersChanged(id))
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn list_mut(&mut self, id: ListId) -> Result<&mut ListEntity, BoardError> {
        self.lists
            .iter_mut()
            .find(|list| list.id() == id)
            .ok_or(BoardError::UnknownList(id))
    }

    /// Create a list from a preset at the end of the board. URL effects are
    /// the caller's job.
    fn instantiate(&mut self, preset: &ListPreset) -> (ListId, Option<FetchTicket>) {
        let id = uuid::Uuid::new_v4();
        let mut list = ListEntity::new(id, self.mode);
        list.set_name(&preset.name);
        let fetch = match list.set_query(&preset.query) {
            QueryChange::Fetch(ticket) => Some(ticket),
            QueryChange::Unchanged | QueryChange::Idle => None,
        };
        self.lists.push(list);
        (id, fetch)
    }

    /// Re-encode the board and queue the URL replacement.
    fn apply_state_change(&self, effects: &mut Vec<Effect>) {
        effects.push(Effect::ReplaceUrl(self.url().to_string()));
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
