//! Board session — one board page's server-side state.
//!
//! DESIGN
//! ======
//! A session owns a `BoardController`, the `DragCoordinator` for its single
//! pointer, and the delete awaiting confirmation. `handle` turns one inbound
//! frame into outbound frames plus the fetches the caller must run; `complete`
//! feeds a finished fetch back. The session never awaits, so the transport
//! decides how fetches are scheduled and tests can drive it synchronously.
//!
//! PUSHES
//! ======
//! Controller effects become server-initiated request frames:
//! `url:replace`, `page:title`, `list:view`, `list:removed`, `board:order`,
//! `list:markers`. Pushes for a request are emitted before its reply.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::board::controller::{BoardController, BoardError, DeleteOutcome, Effect};
use crate::board::drag::{DragCoordinator, DragOrigin};
use crate::board::list::{FetchCompletion, FetchTicket, ListId};
use crate::frame::{Data, Frame};
use crate::tracker::QueryService;

// =============================================================================
// TYPES
// =============================================================================

/// What a handler answers the requester with. Pushes travel separately.
enum Outcome {
    /// Empty done.
    Done,
    /// Done carrying a payload.
    Reply(Data),
    /// Non-terminal item; the exchange continues with a follow-up request.
    Prompt(Data),
}

/// Output of one inbound frame.
#[derive(Debug, Default)]
pub struct Dispatch {
    pub frames: Vec<Frame>,
    pub fetches: Vec<FetchTicket>,
}

pub struct BoardSession {
    board: BoardController,
    drag: DragCoordinator,
    pending_delete: Option<ListId>,
}

// =============================================================================
// SESSION
// =============================================================================

impl BoardSession {
    #[must_use]
    pub fn new(board: BoardController) -> Self {
        Self { board, drag: DragCoordinator::new(), pending_delete: None }
    }

    #[must_use]
    pub fn board(&self) -> &BoardController {
        &self.board
    }

    #[must_use]
    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    /// Dispatch one inbound frame by syscall prefix.
    pub fn handle(&mut self, req: &Frame) -> Dispatch {
        let mut effects = Vec::new();
        let result = match req.prefix() {
            "board" => self.handle_board(req, &mut effects),
            "list" => self.handle_list(req, &mut effects),
            "drag" => self.handle_drag(req, &mut effects),
            prefix => Err(req.error(format!("unknown prefix: {prefix}"))),
        };

        let mut dispatch = self.apply_effects(effects);
        dispatch.frames.push(match result {
            Ok(Outcome::Done) => req.done(),
            Ok(Outcome::Reply(data)) => req.done_with(data),
            Ok(Outcome::Prompt(data)) => req.item(data),
            Err(err_frame) => err_frame,
        });
        dispatch
    }

    /// Apply a finished fetch. Stale results produce no frames.
    pub fn complete(&mut self, completion: FetchCompletion) -> Vec<Frame> {
        let effects = self.board.complete_fetch(completion);
        self.apply_effects(effects).frames
    }

    /// Connection is going away: abandon any gesture.
    pub fn close(&mut self) {
        let _ = self.drag.cancel(&mut self.board);
        self.pending_delete = None;
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    fn handle_board(&mut self, req: &Frame, effects: &mut Vec<Effect>) -> Result<Outcome, Frame> {
        match req.op() {
            "load" => {
                let loaded = match (req.str_field("url"), req.str_field("query")) {
                    (Some(href), _) => self.board.load_href(href).map_err(|e| req.error_from(&e))?,
                    (None, query) => self.board.load_query(query.unwrap_or_default()),
                };
                self.drag = DragCoordinator::new();
                self.pending_delete = None;
                effects.extend(loaded);

                let mut data = Data::new();
                data.insert("url".into(), serde_json::json!(self.board.url().as_str()));
                data.insert("title".into(), serde_json::json!(self.board.title()));
                data.insert("list_ids".into(), serde_json::json!(self.board.order()));
                Ok(Outcome::Reply(data))
            }
            "title" => {
                let title = req.str_field("title").ok_or_else(|| req.error("title required"))?;
                effects.extend(self.board.set_title(title));
                Ok(Outcome::Done)
            }
            op => Err(req.error(format!("unknown board op: {op}"))),
        }
    }

    fn handle_list(&mut self, req: &Frame, effects: &mut Vec<Effect>) -> Result<Outcome, Frame> {
        match req.op() {
            "add" => {
                let name = req.str_field("name").unwrap_or_default();
                let query = req.str_field("query").unwrap_or_default();
                let (list_id, added) = self.board.add_list(name, query);
                effects.extend(added);

                let mut data = Data::new();
                data.insert("list_id".into(), serde_json::json!(list_id));
                Ok(Outcome::Reply(data))
            }
            "edit" => {
                let list_id = list_id_field(req)?;
                let edited = self
                    .board
                    .edit_list(list_id, req.str_field("name"), req.str_field("query"))
                    .map_err(|e| req.error_from(&e))?;
                effects.extend(edited);
                Ok(Outcome::Done)
            }
            "delete" => {
                let list_id = list_id_field(req)?;
                let prompt = self.board.delete_prompt(list_id).map_err(|e| req.error_from(&e))?;
                self.pending_delete = Some(list_id);

                let mut data = Data::new();
                data.insert("list_id".into(), serde_json::json!(list_id));
                data.insert("prompt".into(), serde_json::json!(prompt));
                Ok(Outcome::Prompt(data))
            }
            "confirm" => {
                let list_id = list_id_field(req)?;
                if self.pending_delete != Some(list_id) {
                    let err = BoardError::NoPendingConfirmation(list_id);
                    return Err(req.error_from(&err));
                }
                self.pending_delete = None;

                let accepted = req.data.get("accepted").and_then(serde_json::Value::as_bool).unwrap_or(false);
                let (outcome, deleted) = self
                    .board
                    .delete_list(list_id, |_| accepted)
                    .map_err(|e| req.error_from(&e))?;
                effects.extend(deleted);

                let mut data = Data::new();
                data.insert("deleted".into(), serde_json::json!(outcome == DeleteOutcome::Deleted));
                Ok(Outcome::Reply(data))
            }
            op => Err(req.error(format!("unknown list op: {op}"))),
        }
    }

    fn handle_drag(&mut self, req: &Frame, effects: &mut Vec<Effect>) -> Result<Outcome, Frame> {
        let emitted = match req.op() {
            "start" => {
                let list_id = list_id_field(req)?;
                let origin = match req.data.get("origin") {
                    Some(value) => serde_json::from_value::<DragOrigin>(value.clone())
                        .map_err(|e| req.error(format!("invalid origin: {e}")))?,
                    None => DragOrigin::List,
                };
                self.drag.start(&mut self.board, list_id, origin)
            }
            "enter" => {
                let list_id = list_id_field(req)?;
                self.drag.enter(&mut self.board, list_id)
            }
            "leave" => {
                let list_id = list_id_field(req)?;
                self.drag.leave(&mut self.board, list_id)
            }
            "end" => self.drag.end(&mut self.board),
            "cancel" => self.drag.cancel(&mut self.board),
            op => return Err(req.error(format!("unknown drag op: {op}"))),
        };
        effects.extend(emitted);
        Ok(Outcome::Done)
    }

    // -------------------------------------------------------------------------
    // Effects
    // -------------------------------------------------------------------------

    fn apply_effects(&self, effects: Vec<Effect>) -> Dispatch {
        let mut dispatch = Dispatch::default();
        for effect in effects {
            let frame = match effect {
                Effect::ReplaceUrl(url) => Frame::request("url:replace", Data::new()).with_data("url", url),
                Effect::SetPageTitle(title) => Frame::request("page:title", Data::new()).with_data("title", title),
                Effect::Fetch(ticket) => {
                    dispatch.fetches.push(ticket);
                    continue;
                }
                Effect::ListChanged(list_id) => {
                    let Some(list) = self.board.list(list_id) else {
                        continue;
                    };
                    Frame::request("list:view", to_data(&list.view()))
                }
                Effect::ListRemoved(list_id) => {
                    Frame::request("list:removed", Data::new()).with_data("list_id", list_id.to_string())
                }
                Effect::OrderChanged => {
                    Frame::request("board:order", Data::new()).with_data("list_ids", serde_json::json!(self.board.order()))
                }
                Effect::MarkersChanged(list_id) => {
                    let Some(list) = self.board.list(list_id) else {
                        continue;
                    };
                    let mut data = to_data(&list.markers());
                    data.insert("list_id".into(), serde_json::json!(list_id));
                    Frame::request("list:markers", data)
                }
            };
            dispatch.frames.push(frame);
        }
        dispatch
    }
}

// =============================================================================
// FETCHES
// =============================================================================

/// Run one fetch on the runtime and post the completion to `tx`. A closed
/// channel (session gone) silently drops the result.
pub fn spawn_fetch(tracker: Arc<dyn QueryService>, ticket: FetchTicket, tx: mpsc::Sender<FetchCompletion>) {
    tokio::spawn(async move {
        let result = tracker.search(&ticket.query).await;
        match &result {
            Ok(issues) => {
                info!(list_id = %ticket.list_id, generation = ticket.generation, count = issues.len(), "fetch: done");
            }
            Err(e) => {
                warn!(list_id = %ticket.list_id, generation = ticket.generation, error = %e, "fetch: failed");
            }
        }
        let _ = tx.send(FetchCompletion { ticket, result }).await;
    });
}

// =============================================================================
// HELPERS
// =============================================================================

fn list_id_field(req: &Frame) -> Result<ListId, Frame> {
    let raw = req.str_field("list_id").ok_or_else(|| req.error("list_id required"))?;
    Uuid::parse_str(raw).map_err(|_| req.error(format!("invalid list_id: {raw}")))
}

/// Flatten a serializable struct into frame data. Non-object values yield an
/// empty map.
fn to_data(value: &impl Serialize) -> Data {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
        Ok(_) => Data::new(),
        Err(e) => {
            warn!(error = %e, "session: failed to serialize push payload");
            Data::new()
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
