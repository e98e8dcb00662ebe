//! State persistence for change detection.
//!
//! A single small record holds the tracked fields from the most recent
//! *successful* run. Absence of the file is not an error; a failed fetch
//! must never overwrite it.

pub mod local;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::ProposalSnapshot;

// Re-export for convenience
pub use local::LocalStateStore;

/// Tracked fields from the previous successful run.
///
/// Empty strings stand in for "no prior record", so a first-ever run
/// compares against emptiness and reports a change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousState {
    #[serde(default)]
    pub historico: String,

    #[serde(default)]
    pub info_complementar: String,
}

impl From<&ProposalSnapshot> for PreviousState {
    fn from(snapshot: &ProposalSnapshot) -> Self {
        Self {
            historico: snapshot.historico.clone(),
            info_complementar: snapshot.info_complementar.clone(),
        }
    }
}

/// Trait for previous-state storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the previous state; an absent record yields the default.
    async fn load(&self) -> Result<PreviousState>;

    /// Overwrite the record in full.
    async fn save(&self, state: &PreviousState) -> Result<()>;
}
