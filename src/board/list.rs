//! List entity — one named, independently fetched column of issues.
//!
//! LIFECYCLE
//! =========
//! `Idle` (empty query) → `Loading` (fetch in flight) → `Loaded` or `Failed`
//! → back to `Loading` (or `Idle`) whenever the query changes.
//!
//! DESIGN
//! ======
//! Every query change bumps `generation` and hands out a `FetchTicket`
//! stamped with it. A completion is applied only if its ticket still carries
//! the current generation, so a slow response for an old query can never
//! overwrite a newer one no matter the order they land in. Nothing here does
//! I/O: the owner runs the ticket and feeds the result back.

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::render::{ListSummary, RenderMode, RenderedResults, render, summarize};
use crate::tracker::{Issue, TrackerError};

pub type ListId = Uuid;

pub const STATUS_LOADING: &str = "Loading";
pub const STATUS_EMPTY: &str = "No bugs found";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Visual drag markers. Owned by the drag coordinator, stored on the list so
/// they render with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DragMarkers {
    pub dragged: bool,
    pub dragover: bool,
}

/// A fetch the owner must run: search `query`, then report back with the
/// same ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub list_id: ListId,
    pub generation: u64,
    pub query: String,
}

/// A finished fetch on its way back to the list that asked for it.
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Issue>, TrackerError>,
}

/// What a `set_query` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    /// Same query as before; nothing happened.
    Unchanged,
    /// Query cleared; the list is idle and any in-flight fetch is stale.
    Idle,
    /// Results cleared; run this fetch.
    Fetch(FetchTicket),
}

/// Serializable snapshot of a list, pushed to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView {
    pub list_id: ListId,
    pub name: String,
    pub query: String,
    pub phase: ListPhase,
    pub status: String,
    pub count: usize,
    pub progress: f64,
    pub results: RenderedResults,
    pub markers: DragMarkers,
}

// =============================================================================
// LIST ENTITY
// =============================================================================

#[derive(Debug, Clone)]
pub struct ListEntity {
    id: ListId,
    name: String,
    query: String,
    phase: ListPhase,
    status: String,
    /// Raw payload of the last applied fetch. `None` until one lands.
    results: Option<Vec<Issue>>,
    rendered: RenderedResults,
    summary: ListSummary,
    generation: u64,
    mode: RenderMode,
    pub(crate) markers: DragMarkers,
}

impl ListEntity {
    #[must_use]
    pub fn new(id: ListId, mode: RenderMode) -> Self {
        Self {
            id,
            name: String::new(),
            query: String::new(),
            phase: ListPhase::Idle,
            status: String::new(),
            results: None,
            rendered: RenderedResults::empty(mode),
            summary: ListSummary::default(),
            generation: 0,
            mode,
            markers: DragMarkers::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ListId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn results(&self) -> Option<&[Issue]> {
        self.results.as_deref()
    }

    #[must_use]
    pub fn rendered(&self) -> &RenderedResults {
        &self.rendered
    }

    #[must_use]
    pub fn summary(&self) -> ListSummary {
        self.summary
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn markers(&self) -> DragMarkers {
        self.markers
    }

    /// Rename. Returns `false` (and does nothing) if the name is unchanged.
    pub fn set_name(&mut self, name: &str) -> bool {
        if self.name == name {
            return false;
        }
        self.name = name.to_string();
        true
    }

    /// Point the list at a new query. Clears results immediately.
    pub fn set_query(&mut self, query: &str) -> QueryChange {
        if self.query == query {
            return QueryChange::Unchanged;
        }

        self.query = query.to_string();
        self.generation += 1;
        self.results = None;
        self.rendered = RenderedResults::empty(self.mode);
        self.summary = ListSummary::default();

        if query.is_empty() {
            self.phase = ListPhase::Idle;
            self.status.clear();
            return QueryChange::Idle;
        }

        self.phase = ListPhase::Loading;
        self.status = STATUS_LOADING.to_string();
        QueryChange::Fetch(FetchTicket { list_id: self.id, generation: self.generation, query: self.query.clone() })
    }

    /// Apply a finished fetch. Returns `false` if the ticket is stale and the
    /// result was dropped.
    pub fn apply_fetch(
        &mut self,
        generation: u64,
        result: Result<Vec<Issue>, TrackerError>,
        tracker_url: &str,
    ) -> bool {
        if generation != self.generation {
            debug!(list_id = %self.id, generation, current = self.generation, "list: dropping stale fetch");
            return false;
        }

        match result {
            Ok(issues) => {
                self.render_results(issues, tracker_url);
                self.phase = ListPhase::Loaded;
                self.status = if self.summary.count == 0 { STATUS_EMPTY.to_string() } else { String::new() };
            }
            Err(e) => {
                self.render_results(Vec::new(), tracker_url);
                self.phase = ListPhase::Failed;
                self.status = e.to_string();
            }
        }
        true
    }

    fn render_results(&mut self, issues: Vec<Issue>, tracker_url: &str) {
        self.rendered = render(&issues, tracker_url, self.mode);
        self.summary = summarize(&issues);
        self.results = Some(issues);
    }

    #[must_use]
    pub fn view(&self) -> ListView {
        ListView {
            list_id: self.id,
            name: self.name.clone(),
            query: self.query.clone(),
            phase: self.phase,
            status: self.status.clone(),
            count: self.summary.count,
            progress: self.summary.progress,
            results: self.rendered.clone(),
            markers: self.markers,
        }
    }
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
