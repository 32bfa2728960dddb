//! WebSocket handler — one board page per connection.
//!
//! DESIGN
//! ======
//! On upgrade, creates a `BoardSession` and enters a `select!` loop:
//! - Incoming page frames → parse + dispatch to the session
//! - Finished fetches → applied to the session, resulting views pushed
//!
//! The session is owned by the loop, so board state has a single writer and
//! needs no lock. Fetches run as spawned tasks and report back through an
//! mpsc channel; the loop is the only place their results touch state.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → send `session:connected` with `session_id`
//! 2. Page sends `board:load`, then edits and drag events
//! 3. Session replies and pushes; fetch tickets are spawned
//! 4. Close → cancel any drag gesture; in-flight fetches finish into a
//!    dropped channel

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::board::list::FetchCompletion;
use crate::frame::{Data, Frame, Status};
use crate::services::session::{BoardSession, spawn_fetch};
use crate::state::AppState;

/// Completions buffered between the fetch tasks and the session loop.
const FETCH_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let session_id = Uuid::new_v4();
    let (fetch_tx, mut fetch_rx) = mpsc::channel::<FetchCompletion>(FETCH_CHANNEL_CAPACITY);
    let mut session = BoardSession::new(state.new_board());

    let welcome = Frame::request("session:connected", Data::new()).with_data("session_id", session_id.to_string());
    if send_frame(&mut socket, &welcome).await.is_err() {
        return;
    }

    info!(%session_id, "ws: client connected");

    'session: loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let frames = process_inbound_text(&state, &mut session, session_id, &fetch_tx, &text);
                        for frame in &frames {
                            if send_frame(&mut socket, frame).await.is_err() {
                                break 'session;
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(completion) = fetch_rx.recv() => {
                for frame in &session.complete(completion) {
                    if send_frame(&mut socket, frame).await.is_err() {
                        break 'session;
                    }
                }
            }
        }
    }

    session.close();
    info!(%session_id, lists = session.board().lists().len(), "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Parse and process one inbound text frame and return frames for the page.
/// Fetches the session asks for are spawned here.
///
/// This keeps the websocket transport concerns separate from frame handling,
/// so tests can exercise dispatch without a socket.
fn process_inbound_text(
    state: &AppState,
    session: &mut BoardSession,
    session_id: Uuid,
    fetch_tx: &mpsc::Sender<FetchCompletion>,
    text: &str,
) -> Vec<Frame> {
    let req: Frame = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!(%session_id, error = %e, "ws: invalid inbound frame");
            let err = Frame::request("gateway:error", Data::new()).with_data("message", format!("invalid json: {e}"));
            return vec![err];
        }
    };

    info!(%session_id, id = %req.id, syscall = %req.syscall, status = ?req.status, "ws: recv frame");

    let dispatch = session.handle(&req);
    for ticket in dispatch.fetches {
        spawn_fetch(state.tracker.clone(), ticket, fetch_tx.clone());
    }
    dispatch.frames
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize frame");
            return Err(());
        }
    };
    if frame.status == Status::Error {
        let code = frame.str_field("code").unwrap_or("-");
        let message = frame.str_field("message").unwrap_or("-");
        warn!(id = %frame.id, syscall = %frame.syscall, code, message, "ws: send frame status=Error");
    } else {
        info!(id = %frame.id, syscall = %frame.syscall, status = ?frame.status, "ws: send frame");
    }
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
