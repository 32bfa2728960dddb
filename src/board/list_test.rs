use super::*;

const TRACKER: &str = "https://bugzilla.example.test";

fn issue(id: u64, status: &str) -> Issue {
    Issue { id, status: status.into(), summary: format!("Bug {id}"), ..Issue::default() }
}

fn new_list() -> ListEntity {
    ListEntity::new(Uuid::new_v4(), RenderMode::Flat)
}

fn ticket(change: QueryChange) -> FetchTicket {
    match change {
        QueryChange::Fetch(ticket) => ticket,
        other => panic!("expected a fetch, got {other:?}"),
    }
}

#[test]
fn new_list_is_idle_and_empty() {
    let list = new_list();
    assert_eq!(list.phase(), ListPhase::Idle);
    assert_eq!(list.status(), "");
    assert!(list.results().is_none());
    assert_eq!(list.summary().count, 0);
}

#[test]
fn set_query_starts_loading() {
    let mut list = new_list();
    let ticket = ticket(list.set_query("product:Core"));

    assert_eq!(ticket.list_id, list.id());
    assert_eq!(ticket.query, "product:Core");
    assert_eq!(ticket.generation, list.generation());
    assert_eq!(list.phase(), ListPhase::Loading);
    assert_eq!(list.status(), STATUS_LOADING);
}

#[test]
fn same_query_is_a_no_op() {
    let mut list = new_list();
    let _ = list.set_query("foo");
    let generation = list.generation();

    assert_eq!(list.set_query("foo"), QueryChange::Unchanged);
    assert_eq!(list.generation(), generation);
    assert_eq!(list.phase(), ListPhase::Loading);
}

#[test]
fn same_name_is_a_no_op() {
    let mut list = new_list();
    assert!(list.set_name("Mine"));
    assert!(!list.set_name("Mine"));
    assert_eq!(list.name(), "Mine");
}

#[test]
fn empty_query_goes_idle_without_fetch() {
    let mut list = new_list();
    let _ = list.set_query("foo");

    assert_eq!(list.set_query(""), QueryChange::Idle);
    assert_eq!(list.phase(), ListPhase::Idle);
    assert_eq!(list.status(), "");
}

#[test]
fn successful_fetch_renders_results() {
    let mut list = new_list();
    let ticket = ticket(list.set_query("foo"));

    let applied = list.apply_fetch(ticket.generation, Ok(vec![issue(1, "RESOLVED"), issue(2, "NEW")]), TRACKER);

    assert!(applied);
    assert_eq!(list.phase(), ListPhase::Loaded);
    assert_eq!(list.status(), "");
    assert_eq!(list.summary().count, 2);
    assert!((list.summary().progress - 50.0).abs() < f64::EPSILON);
    assert_eq!(list.rendered().len(), 2);
}

#[test]
fn empty_fetch_says_no_bugs_found() {
    let mut list = new_list();
    let ticket = ticket(list.set_query("foo"));

    list.apply_fetch(ticket.generation, Ok(Vec::new()), TRACKER);

    assert_eq!(list.phase(), ListPhase::Loaded);
    assert_eq!(list.status(), STATUS_EMPTY);
    assert!(list.summary().progress.abs() < f64::EPSILON);
}

#[test]
fn failed_fetch_shows_message_verbatim() {
    let mut list = new_list();
    let ticket = ticket(list.set_query("foo:"));

    let err = TrackerError::Remote { message: "The field foo does not exist.".into() };
    list.apply_fetch(ticket.generation, Err(err), TRACKER);

    assert_eq!(list.phase(), ListPhase::Failed);
    assert_eq!(list.status(), "The field foo does not exist.");
    assert_eq!(list.summary().count, 0);
    assert!(list.rendered().is_empty());
}

#[test]
fn stale_fetch_is_dropped_in_either_order() {
    // Old result lands last.
    let mut list = new_list();
    let old = ticket(list.set_query("q1"));
    let new = ticket(list.set_query("q2"));

    assert!(list.apply_fetch(new.generation, Ok(vec![issue(2, "NEW")]), TRACKER));
    assert!(!list.apply_fetch(old.generation, Ok(vec![issue(1, "NEW"), issue(11, "NEW")]), TRACKER));
    assert_eq!(list.results().map(|r| r[0].id), Some(2));
    assert_eq!(list.summary().count, 1);

    // Old result lands first.
    let mut list = new_list();
    let old = ticket(list.set_query("q1"));
    let new = ticket(list.set_query("q2"));

    assert!(!list.apply_fetch(old.generation, Err(TrackerError::Request("boom".into())), TRACKER));
    assert_eq!(list.phase(), ListPhase::Loading);
    assert!(list.apply_fetch(new.generation, Ok(vec![issue(2, "NEW")]), TRACKER));
    assert_eq!(list.phase(), ListPhase::Loaded);
    assert_eq!(list.status(), "");
}

#[test]
fn clearing_query_makes_inflight_fetch_stale() {
    let mut list = new_list();
    let inflight = ticket(list.set_query("foo"));
    let _ = list.set_query("");

    assert!(!list.apply_fetch(inflight.generation, Ok(vec![issue(1, "NEW")]), TRACKER));
    assert_eq!(list.phase(), ListPhase::Idle);
    assert!(list.results().is_none());
}

#[test]
fn requery_clears_previous_results_immediately() {
    let mut list = new_list();
    let first = ticket(list.set_query("foo"));
    list.apply_fetch(first.generation, Ok(vec![issue(1, "NEW")]), TRACKER);

    let _ = list.set_query("bar");
    assert!(list.results().is_none());
    assert!(list.rendered().is_empty());
    assert_eq!(list.summary().count, 0);
}

#[test]
fn view_reflects_state() {
    let mut list = new_list();
    list.set_name("Mine");
    let ticket = ticket(list.set_query("foo"));
    list.apply_fetch(ticket.generation, Ok(vec![issue(1, "VERIFIED")]), TRACKER);

    let view = list.view();
    assert_eq!(view.list_id, list.id());
    assert_eq!(view.name, "Mine");
    assert_eq!(view.query, "foo");
    assert_eq!(view.phase, ListPhase::Loaded);
    assert_eq!(view.count, 1);
    assert!((view.progress - 100.0).abs() < f64::EPSILON);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["phase"], "loaded");
    assert_eq!(json["results"]["mode"], "flat");
}
