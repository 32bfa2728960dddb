//! Board model — everything a board page shows, minus the I/O.
//!
//! ARCHITECTURE
//! ============
//! ```text
//!   url (decode) ──▶ controller ──▶ list × N ──▶ render / color
//!        ▲               │  ▲
//!        └── encode ─────┘  └── drag
//! ```
//! The controller owns the ordered lists and the title, and re-encodes the
//! board into the URL after every mutation. Lists own their query lifecycle
//! and guard against stale fetches. The drag coordinator turns gesture events
//! into a single reorder. Rendering is a pure function of fetched issues.
//!
//! Operations return `controller::Effect`s instead of performing them, so the
//! same model serves the websocket session and the REST snapshot.

pub mod color;
pub mod controller;
pub mod drag;
pub mod list;
pub mod render;
pub mod url;
