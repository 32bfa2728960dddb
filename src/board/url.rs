//! Board URL codec.
//!
//! The URL is the board's only storage. Parameters:
//! - `title` (0..1): board title;
//! - `name` / `query` (0..N each): list presets, paired by index;
//! - `id` (0..1): legacy shorthand expanding to a three-list dependency
//!   board, honored only when no `query` is present.
//!
//! `encode` is the exact inverse of `decode` for every state the UI can
//! produce, down to parameter order and percent-encoding.

use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const PARAM_TITLE: &str = "title";
pub const PARAM_NAME: &str = "name";
pub const PARAM_QUERY: &str = "query";
pub const PARAM_BUG_ID: &str = "id";

// =============================================================================
// TYPES
// =============================================================================

/// One list as stored in the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPreset {
    pub name: String,
    pub query: String,
}

impl ListPreset {
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self { name: name.into(), query: query.into() }
    }
}

/// Everything the URL persists about a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    /// Empty means "use the generic page title".
    pub title: String,
    pub lists: Vec<ListPreset>,
}

// =============================================================================
// PRESETS
// =============================================================================

/// The three lists a `?id=<bug>` link expands to.
#[must_use]
pub fn dependency_presets(bug_id: &str) -> Vec<ListPreset> {
    vec![
        ListPreset::new("Not Started", format!("blocked:{bug_id} status:UNCONFIRMED,NEW,REOPENED assignee:nobody")),
        ListPreset::new("In Progress", format!("blocked:{bug_id} status:ASSIGNED")),
        ListPreset::new("Done", format!("ALL blocked:{bug_id} resolution:FIXED")),
    ]
}

#[must_use]
pub fn dependency_title(bug_id: &str) -> String {
    format!("Bug {bug_id} dependencies")
}

// =============================================================================
// DECODE
// =============================================================================

/// Decode the board carried by a page URL.
#[must_use]
pub fn decode(url: &Url) -> BoardState {
    decode_pairs(url.query_pairs())
}

/// Decode from already-split `(key, value)` pairs, in URL order.
///
/// Lists zip by `query`: extra names are dropped, missing names are empty.
/// Repeated `title`/`id` keep the first value.
pub fn decode_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> BoardState
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut title: Option<String> = None;
    let mut bug_id: Option<String> = None;
    let mut names = Vec::new();
    let mut queries = Vec::new();

    for (key, value) in pairs {
        let value = value.as_ref();
        match key.as_ref() {
            PARAM_TITLE if title.is_none() => title = Some(value.to_string()),
            PARAM_BUG_ID if bug_id.is_none() => bug_id = Some(value.to_string()),
            PARAM_NAME => names.push(value.to_string()),
            PARAM_QUERY => queries.push(value.to_string()),
            _ => {}
        }
    }

    if !queries.is_empty() {
        let mut names = names.into_iter();
        let lists = queries
            .into_iter()
            .map(|query| ListPreset { name: names.next().unwrap_or_default(), query })
            .collect();
        return BoardState { title: title.unwrap_or_default(), lists };
    }

    let bug_id = bug_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    match bug_id {
        Some(id) => BoardState {
            title: title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| dependency_title(id)),
            lists: dependency_presets(id),
        },
        None => BoardState { title: title.unwrap_or_default(), lists: Vec::new() },
    }
}

// =============================================================================
// ENCODE
// =============================================================================

/// Encode a board onto `base`, replacing whatever query it had.
#[must_use]
pub fn encode(base: &Url, state: &BoardState) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    if state.title.is_empty() && state.lists.is_empty() {
        return url;
    }

    {
        let mut pairs = url.query_pairs_mut();
        if !state.title.is_empty() {
            pairs.append_pair(PARAM_TITLE, &state.title);
        }
        for list in &state.lists {
            pairs.append_pair(PARAM_NAME, &list.name);
            pairs.append_pair(PARAM_QUERY, &list.query);
        }
    }
    url
}

/// Just the query-string part of [`encode`], without the leading `?`.
#[must_use]
pub fn encode_query(base: &Url, state: &BoardState) -> String {
    encode(base, state).query().unwrap_or_default().to_string()
}

/// `base` with `raw` as its query string. Used for raw query strings handed
/// over by HTTP extractors.
#[must_use]
pub fn with_raw_query(base: &Url, raw: Option<&str>) -> Url {
    let mut url = base.clone();
    url.set_query(raw.filter(|q| !q.is_empty()));
    url
}

#[cfg(test)]
#[path = "url_test.rs"]
mod tests;
