//! Tracker types — issue records and the query seam.
//!
//! Provider-neutral shapes shared by the Bugzilla client, the board model, and
//! the test mocks. Only the fields the board actually renders are kept.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by a tracker search.
///
/// `Display` is what ends up in a list's status line, so the remote variant
/// prints the tracker's message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// The tracker answered with an error payload.
    #[error("{message}")]
    Remote { message: String },

    /// The HTTP request could not be completed (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The tracker returned a non-success HTTP status without an error payload.
    #[error("tracker responded with status {status}")]
    Status { status: u16 },

    /// The response body could not be deserialized.
    #[error("unexpected tracker response: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::frame::ErrorCode for TrackerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Remote { .. } => "E_TRACKER_REMOTE",
            Self::Request(_) => "E_TRACKER_REQUEST",
            Self::Status { .. } => "E_TRACKER_STATUS",
            Self::Parse(_) => "E_TRACKER_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599 })
    }
}

// =============================================================================
// ISSUE
// =============================================================================

/// Person an issue is assigned to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub email: String,
    pub nick: Option<String>,
}

impl Assignee {
    /// Display label: the nick when the tracker has one, otherwise the email.
    #[must_use]
    pub fn label(&self) -> &str {
        match self.nick.as_deref() {
            Some(nick) if !nick.is_empty() => nick,
            _ => &self.email,
        }
    }

    /// Trackers park unowned work on a `nobody@` placeholder account.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.email.is_empty() || self.email.contains("nobody")
    }
}

/// One issue as returned by a search. Read-only on the board side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub summary: String,
    pub status: String,
    pub resolution: String,
    pub depends_on: Vec<u64>,
    pub priority: String,
    pub kind: String,
    pub product: String,
    pub component: String,
    pub keywords: Vec<String>,
    pub whiteboard: String,
    pub assignee: Assignee,
}

/// Statuses that count toward a list's resolved fraction.
pub const RESOLVED_STATUSES: [&str; 2] = ["RESOLVED", "VERIFIED"];

impl Issue {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        RESOLVED_STATUSES.contains(&self.status.as_str())
    }

    /// Someone is actively on it: explicit `ASSIGNED` status or a real owner.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.status == "ASSIGNED" || !self.assignee.is_placeholder()
    }

    /// Grouping label used for the colored component tag.
    #[must_use]
    pub fn component_label(&self) -> String {
        format!("{} :: {}", self.product, self.component)
    }
}

// =============================================================================
// QUERY SERVICE TRAIT
// =============================================================================

/// Free-text search against an issue tracker. Enables mocking in tests.
#[async_trait::async_trait]
pub trait QueryService: Send + Sync {
    /// Run a search expression and return every matching issue.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError`] if the request fails or the tracker reports
    /// an error for the expression.
    async fn search(&self, expression: &str) -> Result<Vec<Issue>, TrackerError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
