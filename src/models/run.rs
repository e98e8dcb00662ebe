//! Per-invocation run trace and result structures.

use serde::{Deserialize, Serialize};

use super::ProposalSnapshot;

/// Pipeline stage a trace event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fetch,
    Compare,
    Notify,
    Save,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Compare => "compare",
            Stage::Notify => "notify",
            Stage::Save => "save",
        }
    }
}

/// One human-readable trace line, tagged with its pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub stage: Stage,
    pub message: String,
}

/// Ordered event log accumulated across a single run.
///
/// Passed through the pipeline by value; the only observability mechanism
/// besides process logging. Lines end up verbatim in the email trailer.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    events: Vec<TraceEvent>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trace line, mirroring it to the process log at debug level.
    pub fn push(&mut self, stage: Stage, message: impl Into<String>) {
        let message = message.into();
        log::debug!("[{}] {}", stage.as_str(), message);
        self.events.push(TraceEvent { stage, message });
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Render the trace as ordered plain-text lines.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(|e| e.message.clone()).collect()
    }
}

/// Outcome status of a run.
///
/// Serialized with the Portuguese status strings the upstream callers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    #[serde(rename = "sucesso")]
    Success,
    #[serde(rename = "erro")]
    Error,
}

/// Structured result of one pipeline invocation. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub status: RunStatus,

    /// Whether the tracked content differs from the previous run
    pub changed: bool,

    /// Ordered trace lines accumulated during the run
    pub logs: Vec<String>,

    /// Error message when `status` is `erro`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Captured content on a successful run
    #[serde(rename = "dados", skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<ProposalSnapshot>,
}

impl RunResult {
    /// Build a success result from a snapshot and the accumulated trace.
    pub fn success(snapshot: ProposalSnapshot, changed: bool, log: &RunLog) -> Self {
        Self {
            status: RunStatus::Success,
            changed,
            logs: log.lines(),
            error: None,
            snapshot: Some(snapshot),
        }
    }

    /// Build an error result carrying the trace collected up to the failure.
    pub fn error(message: impl Into<String>, log: &RunLog) -> Self {
        Self {
            status: RunStatus::Error,
            changed: false,
            logs: log.lines(),
            error: Some(message.into()),
            snapshot: None,
        }
    }
}
