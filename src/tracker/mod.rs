//! Tracker — the issue search boundary.
//!
//! DESIGN
//! ======
//! The board only ever asks one question of the tracker: "which issues match
//! this quicksearch expression?". `QueryService` is that question as a trait;
//! `BugzillaClient` answers it over REST. Everything here is stateless.

pub mod bugzilla;
pub mod config;
pub mod types;

pub use bugzilla::BugzillaClient;
pub use config::TrackerConfig;
pub use types::{Assignee, Issue, QueryService, TrackerError};
