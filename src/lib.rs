//! Bugzilla board service.
//!
//! SYSTEM CONTEXT
//! ==============
//! A board is a titled, ordered set of lists, each backed by a Bugzilla
//! quicksearch query. The page URL is the board's only storage: every edit
//! re-encodes the board into the URL and the page replaces its history entry.
//! The page talks to this service over a websocket (`/api/ws`); read-only
//! consumers use the REST endpoints.
//!
//! - `board`: URL codec, list lifecycle, controller, drag coordinator,
//!   rendering and tag colors. Pure state, no I/O.
//! - `tracker`: the `QueryService` seam and its Bugzilla REST client.
//! - `services::session`: one board page's session over the websocket.
//! - `routes`: Axum router, websocket transport, REST handlers.

pub mod board;
pub mod config;
pub mod frame;
pub mod routes;
pub mod services;
pub mod state;
pub mod tracker;
