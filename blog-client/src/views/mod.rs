//! Per-view state machines shared by the web app and the CLI.
//!
//! Each view owns its own fetch state. Loads are started and finished in two
//! steps so that a UI can run the request elsewhere and hand the result back
//! with the token it was started under; stale results are dropped.

pub mod detail;
pub mod form;
pub mod list;

mod fence;

pub use fence::{RequestSequence, RequestToken};
