use super::*;
use crate::frame::Status;
use crate::state::test_helpers::{self, MockTracker};
use crate::tracker::TrackerError;
use serde_json::json;
use tokio::time::{Duration, timeout};

fn session() -> BoardSession {
    let state = test_helpers::test_app_state(Arc::new(MockTracker::new()));
    BoardSession::new(state.new_board())
}

fn req(syscall: &str, data: serde_json::Value) -> Frame {
    let data = match data {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        _ => Data::new(),
    };
    Frame::request(syscall, data)
}

fn reply(dispatch: &Dispatch) -> &Frame {
    dispatch.frames.last().expect("dispatch should end with a reply")
}

fn pushes<'a>(dispatch: &'a Dispatch, syscall: &str) -> Vec<&'a Frame> {
    dispatch.frames.iter().filter(|f| f.syscall == syscall && f.status == Status::Request).collect()
}

fn load(session: &mut BoardSession, query: &str) -> Dispatch {
    session.handle(&req("board:load", json!({ "query": query })))
}

fn list_id(session: &BoardSession, index: usize) -> String {
    session.board().lists()[index].id().to_string()
}

fn names(session: &BoardSession) -> Vec<&str> {
    session.board().lists().iter().map(|l| l.name()).collect()
}

// =============================================================================
// board:*
// =============================================================================

#[test]
fn load_pushes_title_views_and_url_then_replies() {
    let mut session = session();
    let dispatch = load(&mut session, "title=Sprint&name=A&query=foo&name=B&query=bar");

    assert_eq!(pushes(&dispatch, "page:title")[0].data["title"], "Sprint - Bugzilla board");
    assert_eq!(pushes(&dispatch, "list:view").len(), 2);
    assert_eq!(pushes(&dispatch, "url:replace").len(), 1);
    assert_eq!(dispatch.fetches.len(), 2);

    let done = reply(&dispatch);
    assert_eq!(done.status, Status::Done);
    assert_eq!(done.data["title"], "Sprint");
    assert_eq!(done.data["url"], "http://localhost:3000/?title=Sprint&name=A&query=foo&name=B&query=bar");
}

#[test]
fn load_by_url_rejects_garbage() {
    let mut session = session();
    let dispatch = session.handle(&req("board:load", json!({ "url": "not a url" })));

    let err = reply(&dispatch);
    assert_eq!(err.status, Status::Error);
    assert_eq!(err.data["code"], "E_INVALID_URL");
}

#[test]
fn load_by_url_expands_bug_id() {
    let mut session = session();
    let dispatch = session.handle(&req("board:load", json!({ "url": "http://localhost:3000/?id=7" })));

    assert_eq!(names(&session), vec!["Not Started", "In Progress", "Done"]);
    assert_eq!(reply(&dispatch).data["title"], "Bug 7 dependencies");
}

#[test]
fn title_edit_pushes_url_and_page_title() {
    let mut session = session();
    let dispatch = session.handle(&req("board:title", json!({ "title": "Q3" })));

    assert_eq!(pushes(&dispatch, "url:replace")[0].data["url"], "http://localhost:3000/?title=Q3");
    assert_eq!(pushes(&dispatch, "page:title")[0].data["title"], "Q3 - Bugzilla board");
    assert_eq!(reply(&dispatch).status, Status::Done);
}

#[test]
fn unknown_prefix_and_op_are_errors() {
    let mut session = session();
    assert_eq!(reply(&session.handle(&req("cursor:moved", json!({})))).status, Status::Error);
    assert_eq!(reply(&session.handle(&req("board:explode", json!({})))).status, Status::Error);
}

// =============================================================================
// list:*
// =============================================================================

#[test]
fn add_then_edit_list() {
    let mut session = session();
    let added = session.handle(&req("list:add", json!({ "name": "Mine", "query": "assignee:me" })));
    let id = reply(&added).data["list_id"].as_str().unwrap().to_string();
    assert_eq!(added.fetches.len(), 1);

    let edited = session.handle(&req("list:edit", json!({ "list_id": id, "query": "assignee:you" })));
    assert_eq!(edited.fetches[0].query, "assignee:you");
    assert_eq!(pushes(&edited, "list:view")[0].data["status"], "Loading");
    assert_eq!(pushes(&edited, "url:replace").len(), 1);
}

#[test]
fn edit_requires_valid_known_list_id() {
    let mut session = session();

    let missing = session.handle(&req("list:edit", json!({ "name": "x" })));
    assert_eq!(reply(&missing).data["message"], "list_id required");

    let unknown = session.handle(&req("list:edit", json!({ "list_id": Uuid::new_v4().to_string() })));
    assert_eq!(reply(&unknown).data["code"], "E_UNKNOWN_LIST");
}

#[test]
fn delete_prompts_then_confirms() {
    let mut session = session();
    load(&mut session, "name=Regressions&query=keywords%3Aregression");
    let id = list_id(&session, 0);

    let prompted = session.handle(&req("list:delete", json!({ "list_id": id })));
    let item = reply(&prompted);
    assert_eq!(item.status, Status::Item);
    assert_eq!(item.data["prompt"], "Do you really want to delete \"Regressions\"?");
    assert!(pushes(&prompted, "url:replace").is_empty());

    let confirmed = session.handle(&req("list:confirm", json!({ "list_id": id, "accepted": true })));
    assert_eq!(reply(&confirmed).data["deleted"], true);
    assert_eq!(pushes(&confirmed, "list:removed")[0].data["list_id"], id.as_str());
    assert_eq!(pushes(&confirmed, "url:replace")[0].data["url"], "http://localhost:3000/");
    assert!(session.board().lists().is_empty());
}

#[test]
fn declined_delete_keeps_list() {
    let mut session = session();
    load(&mut session, "name=Keep&query=k");
    let id = list_id(&session, 0);

    session.handle(&req("list:delete", json!({ "list_id": id })));
    let declined = session.handle(&req("list:confirm", json!({ "list_id": id, "accepted": false })));

    assert_eq!(reply(&declined).data["deleted"], false);
    assert!(declined.frames.len() == 1);
    assert_eq!(names(&session), vec!["Keep"]);
}

#[test]
fn confirm_without_prompt_is_rejected() {
    let mut session = session();
    load(&mut session, "name=Keep&query=k");
    let id = list_id(&session, 0);

    let dispatch = session.handle(&req("list:confirm", json!({ "list_id": id, "accepted": true })));
    assert_eq!(reply(&dispatch).data["code"], "E_NO_PENDING_CONFIRMATION");
    assert_eq!(names(&session), vec!["Keep"]);
}

// =============================================================================
// drag:*
// =============================================================================

#[test]
fn drag_gesture_reorders_and_pushes_order() {
    let mut session = session();
    load(&mut session, "name=A&query=a&name=B&query=b&name=C&query=c");
    let (a, c) = (list_id(&session, 0), list_id(&session, 2));

    let started = session.handle(&req("drag:start", json!({ "list_id": c, "origin": "list" })));
    assert_eq!(pushes(&started, "list:markers")[0].data["dragged"], true);

    session.handle(&req("drag:enter", json!({ "list_id": a })));
    let ended = session.handle(&req("drag:end", json!({})));

    assert_eq!(names(&session), vec!["C", "A", "B"]);
    let order = &pushes(&ended, "board:order")[0].data["list_ids"];
    assert_eq!(order[0], c.as_str());
    assert_eq!(
        pushes(&ended, "url:replace")[0].data["url"],
        "http://localhost:3000/?name=C&query=c&name=A&query=a&name=B&query=b"
    );
}

#[test]
fn drag_from_issue_row_does_nothing() {
    let mut session = session();
    load(&mut session, "name=A&query=a&name=B&query=b");
    let (a, b) = (list_id(&session, 0), list_id(&session, 1));

    session.handle(&req("drag:start", json!({ "list_id": b, "origin": "issue" })));
    session.handle(&req("drag:enter", json!({ "list_id": a })));
    let ended = session.handle(&req("drag:end", json!({})));

    assert_eq!(ended.frames.len(), 1);
    assert_eq!(names(&session), vec!["A", "B"]);
}

#[test]
fn invalid_origin_is_an_error() {
    let mut session = session();
    load(&mut session, "name=A&query=a");
    let a = list_id(&session, 0);

    let dispatch = session.handle(&req("drag:start", json!({ "list_id": a, "origin": "sideways" })));
    assert_eq!(reply(&dispatch).status, Status::Error);
    assert!(!session.drag().is_active());
}

#[test]
fn close_cancels_gesture() {
    let mut session = session();
    load(&mut session, "name=A&query=a&name=B&query=b");
    let b = list_id(&session, 1);

    session.handle(&req("drag:start", json!({ "list_id": b })));
    session.close();

    assert!(!session.drag().is_active());
    assert!(session.board().lists().iter().all(|l| !l.markers().dragged));
}

// =============================================================================
// FETCHES
// =============================================================================

#[tokio::test]
async fn spawned_fetch_result_becomes_list_view() {
    let tracker = Arc::new(
        MockTracker::new().with_issues("a", vec![test_helpers::issue(1, "NEW"), test_helpers::issue(2, "FIXED")]),
    );
    let mut session = session();
    let dispatch = load(&mut session, "name=A&query=a");

    let (tx, mut rx) = mpsc::channel(8);
    spawn_fetch(tracker.clone(), dispatch.fetches[0].clone(), tx);
    let completion = timeout(Duration::from_millis(500), rx.recv()).await.unwrap().unwrap();

    let frames = session.complete(completion);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].syscall, "list:view");
    assert_eq!(frames[0].data["count"], 2);
    assert_eq!(frames[0].data["phase"], "loaded");
    assert_eq!(tracker.calls(), vec!["a"]);
}

#[tokio::test]
async fn stale_fetch_never_overwrites_newer_query() {
    let tracker = Arc::new(
        MockTracker::new()
            .gated("q1")
            .with_issues("q1", vec![test_helpers::issue(1, "NEW")])
            .with_issues("q2", vec![test_helpers::issue(2, "NEW"), test_helpers::issue(3, "NEW")]),
    );
    let mut session = session();
    let first = load(&mut session, "name=A&query=q1");
    let id = list_id(&session, 0);
    let second = session.handle(&req("list:edit", json!({ "list_id": id, "query": "q2" })));

    let (tx, mut rx) = mpsc::channel(8);
    spawn_fetch(tracker.clone(), first.fetches[0].clone(), tx.clone());
    spawn_fetch(tracker.clone(), second.fetches[0].clone(), tx);

    let newer = timeout(Duration::from_millis(500), rx.recv()).await.unwrap().unwrap();
    assert_eq!(newer.ticket.query, "q2");
    assert_eq!(session.complete(newer).len(), 1);

    tracker.release("q1");
    let older = timeout(Duration::from_millis(500), rx.recv()).await.unwrap().unwrap();
    assert!(session.complete(older).is_empty());
    assert_eq!(session.board().lists()[0].summary().count, 2);
}

#[tokio::test]
async fn failed_fetch_shows_error_as_status() {
    let tracker = Arc::new(MockTracker::new().with_error("bad:", TrackerError::Remote { message: "Bad field".into() }));
    let mut session = session();
    let dispatch = load(&mut session, "name=A&query=bad%3A");

    let (tx, mut rx) = mpsc::channel(8);
    spawn_fetch(tracker, dispatch.fetches[0].clone(), tx);
    let completion = timeout(Duration::from_millis(500), rx.recv()).await.unwrap().unwrap();

    let frames = session.complete(completion);
    assert_eq!(frames[0].data["status"], "Bad field");
    assert_eq!(frames[0].data["phase"], "failed");
}
