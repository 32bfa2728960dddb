//! Issue renderer — tracker records to display rows.
//!
//! DESIGN
//! ======
//! Pure functions of their input. Two rendering paths share one row format:
//! - flat: one row per issue in result order, every row carries its assignee
//!   and a resolved flag (the list-of-queries board);
//! - classified: rows bucketed into Done / In Progress / Not Started columns,
//!   Not Started rows omit the assignee (the single-query triage board).

use serde::Serialize;

use super::color::{TagColor, color_for};
use crate::tracker::Issue;

/// Priority value trackers use for "not set".
const PRIORITY_PLACEHOLDER: &str = "--";

// =============================================================================
// CLASSIFICATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Done,
    InProgress,
    NotStarted,
}

/// Bucket an issue: fixed → done, owned or `ASSIGNED` → in progress, rest not started.
#[must_use]
pub fn classify(issue: &Issue) -> Classification {
    if issue.resolution == "FIXED" {
        Classification::Done
    } else if issue.is_assigned() {
        Classification::InProgress
    } else {
        Classification::NotStarted
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Flat,
    Classified,
}

// =============================================================================
// ROWS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRow {
    pub id: u64,
    pub href: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// `"<type> - <priority>"`, or just the type when priority is unset.
    pub type_label: String,
    pub keywords: String,
    pub annotation: String,
    pub component: String,
    pub component_color: TagColor,
    pub resolved: bool,
}

/// Render one issue. `tracker_url` is the tracker origin used for the link.
#[must_use]
pub fn render_row(issue: &Issue, tracker_url: &str, show_assignee: bool) -> IssueRow {
    let type_label = if issue.priority.is_empty() || issue.priority == PRIORITY_PLACEHOLDER {
        issue.kind.clone()
    } else {
        format!("{} - {}", issue.kind, issue.priority)
    };
    let component = issue.component_label();
    let component_color = color_for(&component);

    IssueRow {
        id: issue.id,
        href: format!("{tracker_url}/{}", issue.id),
        title: issue.summary.clone(),
        assignee: show_assignee.then(|| issue.assignee.label().to_string()),
        type_label,
        keywords: issue.keywords.join(", "),
        annotation: issue.whiteboard.clone(),
        component,
        component_color,
        resolved: issue.is_resolved(),
    }
}

#[must_use]
pub fn render_rows(issues: &[Issue], tracker_url: &str) -> Vec<IssueRow> {
    issues
        .iter()
        .map(|issue| render_row(issue, tracker_url, true))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Columns {
    pub done: Vec<IssueRow>,
    pub in_progress: Vec<IssueRow>,
    pub not_started: Vec<IssueRow>,
}

#[must_use]
pub fn render_columns(issues: &[Issue], tracker_url: &str) -> Columns {
    let mut columns = Columns::default();
    for issue in issues {
        match classify(issue) {
            Classification::Done => columns.done.push(render_row(issue, tracker_url, true)),
            Classification::InProgress => columns
                .in_progress
                .push(render_row(issue, tracker_url, true)),
            Classification::NotStarted => columns
                .not_started
                .push(render_row(issue, tracker_url, false)),
        }
    }
    columns
}

/// Rendered results in whichever shape the board is configured for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RenderedResults {
    Flat { rows: Vec<IssueRow> },
    Classified { columns: Columns },
}

impl RenderedResults {
    #[must_use]
    pub fn empty(mode: RenderMode) -> Self {
        match mode {
            RenderMode::Flat => Self::Flat { rows: Vec::new() },
            RenderMode::Classified => Self::Classified { columns: Columns::default() },
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Flat { rows } => rows.len(),
            Self::Classified { columns } => {
                columns.done.len() + columns.in_progress.len() + columns.not_started.len()
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[must_use]
pub fn render(issues: &[Issue], tracker_url: &str, mode: RenderMode) -> RenderedResults {
    match mode {
        RenderMode::Flat => RenderedResults::Flat { rows: render_rows(issues, tracker_url) },
        RenderMode::Classified => RenderedResults::Classified { columns: render_columns(issues, tracker_url) },
    }
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Readouts shown in a list header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ListSummary {
    pub count: usize,
    pub resolved: usize,
    /// Resolved percentage, 0..=100. Zero for an empty list.
    pub progress: f64,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(issues: &[Issue]) -> ListSummary {
    let count = issues.len();
    let resolved = issues.iter().filter(|issue| issue.is_resolved()).count();
    let progress = if count == 0 { 0.0 } else { resolved as f64 / count as f64 * 100.0 };
    ListSummary { count, resolved, progress }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
