//! Bugzilla REST client.
//!
//! Thin HTTP wrapper for `GET /rest/bug?quicksearch=`. Pure parsing in
//! `parse_response` for testability.

use std::time::Duration;

use super::config::TrackerConfig;
use super::types::{Assignee, Issue, QueryService, TrackerError};

/// Fields requested from the tracker. `assigned_to` also brings back
/// `assigned_to_detail`.
pub const USED_FIELDS: [&str; 12] = [
    "id",
    "summary",
    "status",
    "resolution",
    "depends_on",
    "priority",
    "type",
    "component",
    "product",
    "keywords",
    "whiteboard",
    "assigned_to",
];

// =============================================================================
// CLIENT
// =============================================================================

pub struct BugzillaClient {
    http: reqwest::Client,
    base_url: String,
}

impl BugzillaClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| TrackerError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl QueryService for BugzillaClient {
    async fn search(&self, expression: &str) -> Result<Vec<Issue>, TrackerError> {
        let fields = USED_FIELDS.join(",");
        let response = self
            .http
            .get(format!("{}/rest/bug", self.base_url))
            .query(&[("quicksearch", expression), ("include_fields", fields.as_str())])
            .send()
            .await
            .map_err(|e| TrackerError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TrackerError::Request(e.to_string()))?;

        parse_response(status, &text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Deserialize)]
struct ApiError {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: String,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    bugs: Vec<ApiBug>,
}

#[derive(serde::Deserialize)]
struct ApiBug {
    id: u64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    resolution: String,
    #[serde(default)]
    depends_on: Vec<u64>,
    #[serde(default)]
    priority: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    product: String,
    #[serde(default)]
    component: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    whiteboard: String,
    #[serde(default)]
    assigned_to: String,
    assigned_to_detail: Option<ApiUser>,
}

#[derive(serde::Deserialize)]
struct ApiUser {
    #[serde(default)]
    email: String,
    nick: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(status: u16, body: &str) -> Result<Vec<Issue>, TrackerError> {
    // Bugzilla reports bad searches as `{"error": true, "message": ...}`,
    // usually with a 4xx status. The message wins over the status code.
    if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
        if api_error.error {
            return Err(TrackerError::Remote { message: api_error.message });
        }
    }

    if !(200..300).contains(&status) {
        return Err(TrackerError::Status { status });
    }

    let api: ApiResponse = serde_json::from_str(body).map_err(|e| TrackerError::Parse(e.to_string()))?;
    Ok(api.bugs.into_iter().map(Issue::from).collect())
}

impl From<ApiBug> for Issue {
    fn from(bug: ApiBug) -> Self {
        let assignee = match bug.assigned_to_detail {
            Some(detail) => Assignee {
                email: if detail.email.is_empty() { bug.assigned_to } else { detail.email },
                nick: detail.nick,
            },
            None => Assignee { email: bug.assigned_to, nick: None },
        };

        Self {
            id: bug.id,
            summary: bug.summary,
            status: bug.status,
            resolution: bug.resolution,
            depends_on: bug.depends_on,
            priority: bug.priority,
            kind: bug.kind,
            product: bug.product,
            component: bug.component,
            keywords: bug.keywords,
            whiteboard: bug.whiteboard,
            assignee,
        }
    }
}

#[cfg(test)]
#[path = "bugzilla_test.rs"]
mod tests;
