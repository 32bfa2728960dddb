//! Read-only board routes.
//!
//! These serve pages that cannot hold a websocket (previews, scripts, link
//! unfurlers). Everything is derived from the request URL; nothing is kept.

use axum::extract::{Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::color::{TagColor, color_for};
use crate::board::controller::Effect;
use crate::board::list::{FetchCompletion, ListView};
use crate::board::render::{Columns, ListSummary, render_columns, summarize};
use crate::board::url;
use crate::frame::ErrorCode;
use crate::state::AppState;
use crate::tracker::TrackerError;

// =============================================================================
// BOARD
// =============================================================================

#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub title: String,
    pub page_title: String,
    /// Canonical board URL.
    pub url: String,
    pub lists: Vec<ListView>,
}

/// `GET /api/board?<board params>` — decode the board and fetch every list
/// concurrently. List failures are reported per list, never as a 5xx.
pub async fn get_board(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Json<BoardResponse> {
    let page_url = url::with_raw_query(&state.config.public_url, raw.as_deref());
    let mut board = state.new_board();
    let effects = board.load_url(&page_url);

    let fetches = effects.into_iter().filter_map(|effect| match effect {
        Effect::Fetch(ticket) => Some(ticket),
        _ => None,
    });
    let completions = join_all(fetches.map(|ticket| {
        let tracker = state.tracker.clone();
        async move {
            let result = tracker.search(&ticket.query).await;
            if let Err(e) = &result {
                warn!(list_id = %ticket.list_id, error = %e, "board: list fetch failed");
            }
            FetchCompletion { ticket, result }
        }
    }))
    .await;

    for completion in completions {
        let _ = board.complete_fetch(completion);
    }

    info!(title = %board.title(), lists = board.lists().len(), "board: served");
    Json(BoardResponse {
        title: board.title().to_string(),
        page_title: board.page_title(),
        url: board.url().to_string(),
        lists: board.lists().iter().map(|list| list.view()).collect(),
    })
}

// =============================================================================
// TRIAGE
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TriageParams {
    pub query: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TriageResponse {
    pub query: String,
    pub summary: ListSummary,
    pub columns: Columns,
}

/// Quicksearch expression for a triage request. An explicit query wins over
/// the bug id shorthand.
pub(crate) fn triage_expression(params: &TriageParams) -> Option<String> {
    if let Some(query) = params.query.as_deref().filter(|q| !q.is_empty()) {
        return Some(query.to_string());
    }
    params
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| format!("ALL blocked:{id}"))
}

/// `GET /api/triage?query=..|id=..` — one query split into Done / In
/// Progress / Not Started columns.
pub async fn get_triage(State(state): State<AppState>, Query(params): Query<TriageParams>) -> Response {
    let Some(query) = triage_expression(&params) else {
        return (StatusCode::BAD_REQUEST, "query or id required").into_response();
    };

    match state.tracker.search(&query).await {
        Ok(issues) => {
            let columns = render_columns(&issues, state.tracker_url());
            Json(TriageResponse { summary: summarize(&issues), columns, query }).into_response()
        }
        Err(e) => {
            warn!(%query, error = %e, "triage: search failed");
            tracker_error_response(&e)
        }
    }
}

pub(crate) fn tracker_error_to_status(err: &TrackerError) -> StatusCode {
    match err {
        TrackerError::Remote { .. } => StatusCode::BAD_REQUEST,
        TrackerError::Request(_) | TrackerError::Status { .. } | TrackerError::Parse(_) => StatusCode::BAD_GATEWAY,
        TrackerError::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn tracker_error_response(err: &TrackerError) -> Response {
    let body = serde_json::json!({
        "code": err.error_code(),
        "message": err.to_string(),
        "retryable": err.retryable(),
    });
    (tracker_error_to_status(err), Json(body)).into_response()
}

// =============================================================================
// COLOR
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ColorParams {
    pub label: String,
}

/// `GET /api/color?label=..`
pub async fn get_color(Query(params): Query<ColorParams>) -> Json<TagColor> {
    Json(color_for(&params.label))
}

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;
