//! Pipeline entry points for watcher operations.
//!
//! - `diff`: change detection between the current and previous state
//! - `run`: the fetch → compare → notify → save orchestrator

pub mod diff;
pub mod run;

pub use diff::{ChangeReport, changed, compare};
pub use run::{Watcher, run_once};
