use super::*;
use crate::frame::ErrorCode;

fn assignee(email: &str, nick: Option<&str>) -> Assignee {
    Assignee { email: email.into(), nick: nick.map(Into::into) }
}

#[test]
fn assignee_label_prefers_nick() {
    assert_eq!(assignee("dev@example.com", Some("dev")).label(), "dev");
    assert_eq!(assignee("dev@example.com", None).label(), "dev@example.com");
    assert_eq!(assignee("dev@example.com", Some("")).label(), "dev@example.com");
}

#[test]
fn nobody_is_a_placeholder() {
    assert!(assignee("nobody@mozilla.org", None).is_placeholder());
    assert!(assignee("", None).is_placeholder());
    assert!(!assignee("dev@example.com", None).is_placeholder());
}

#[test]
fn resolved_statuses() {
    let mut issue = Issue { status: "RESOLVED".into(), ..Issue::default() };
    assert!(issue.is_resolved());
    issue.status = "VERIFIED".into();
    assert!(issue.is_resolved());
    issue.status = "NEW".into();
    assert!(!issue.is_resolved());
}

#[test]
fn assigned_by_status_or_owner() {
    let mut issue = Issue {
        status: "ASSIGNED".into(),
        assignee: assignee("nobody@mozilla.org", None),
        ..Issue::default()
    };
    assert!(issue.is_assigned());

    issue.status = "NEW".into();
    assert!(!issue.is_assigned());

    issue.assignee = assignee("dev@example.com", None);
    assert!(issue.is_assigned());
}

#[test]
fn component_label_joins_product_and_component() {
    let issue = Issue { product: "Core".into(), component: "DOM".into(), ..Issue::default() };
    assert_eq!(issue.component_label(), "Core :: DOM");
}

#[test]
fn remote_error_displays_message_verbatim() {
    let err = TrackerError::Remote { message: "The search had no terms".into() };
    assert_eq!(err.to_string(), "The search had no terms");
    assert_eq!(err.error_code(), "E_TRACKER_REMOTE");
    assert!(!err.retryable());
}

#[test]
fn server_errors_are_retryable() {
    assert!(TrackerError::Status { status: 503 }.retryable());
    assert!(TrackerError::Status { status: 429 }.retryable());
    assert!(!TrackerError::Status { status: 404 }.retryable());
    assert!(TrackerError::Request("timeout".into()).retryable());
}
