// src/models/mod.rs

//! Domain models for the watcher application.

mod config;
mod proposal;
mod run;

// Re-export all public types
pub use config::{Config, EmailConfig, FetchConfig, SiteConfig, SourceMode, WatchConfig};
pub use proposal::{PropositionId, ProposalSnapshot};
pub use run::{RunLog, RunResult, RunStatus, Stage, TraceEvent};
