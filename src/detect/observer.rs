//! Per-check outcome reporting
//!
//! The detector never logs directly. Each evaluated check is handed to a
//! [`DetectionObserver`]; [`TracingObserver`] turns outcomes into log events
//! and [`RecordingObserver`] keeps them for reports and tests.

use std::fmt;

use serde::Serialize;

use super::DriftCheck;

/// Result of one clause comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Both sides carry the same value (or both omit it)
    Same { detail: String },
    /// The sides differ textually but the difference is a catalog default
    DefaultEquivalent { detail: String },
    /// The sides differ; `None` means the side does not define the clause
    Changed {
        ddl: Option<String>,
        metadata: Option<String>,
    },
}

impl CheckOutcome {
    pub fn same(detail: impl Into<String>) -> Self {
        CheckOutcome::Same {
            detail: detail.into(),
        }
    }

    pub fn default_equivalent(detail: impl Into<String>) -> Self {
        CheckOutcome::DefaultEquivalent {
            detail: detail.into(),
        }
    }

    pub fn changed(ddl: Option<&str>, metadata: Option<&str>) -> Self {
        CheckOutcome::Changed {
            ddl: ddl.map(str::to_string),
            metadata: metadata.map(str::to_string),
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, CheckOutcome::Changed { .. })
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Same { detail } => write!(f, "same ({})", detail),
            CheckOutcome::DefaultEquivalent { detail } => {
                write!(f, "default equivalent ({})", detail)
            }
            CheckOutcome::Changed { ddl, metadata } => write!(
                f,
                "changed: ddl=<{}> metadata=<{}>",
                ddl.as_deref().unwrap_or("absent"),
                metadata.as_deref().unwrap_or("absent")
            ),
        }
    }
}

/// Receives every check outcome in evaluation order.
pub trait DetectionObserver {
    fn record(&mut self, check: DriftCheck, outcome: &CheckOutcome);
}

/// Feeds both observers, first then second.
impl<A: DetectionObserver, B: DetectionObserver> DetectionObserver for (A, B) {
    fn record(&mut self, check: DriftCheck, outcome: &CheckOutcome) {
        self.0.record(check, outcome);
        self.1.record(check, outcome);
    }
}

/// Logs outcomes through `tracing`: differences at `info`, everything else
/// at `debug`.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    table: String,
}

impl TracingObserver {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
        }
    }
}

impl DetectionObserver for TracingObserver {
    fn record(&mut self, check: DriftCheck, outcome: &CheckOutcome) {
        match outcome {
            CheckOutcome::Same { detail } => {
                tracing::debug!("{}: {} is the same: {}", self.table, check, detail);
            }
            CheckOutcome::DefaultEquivalent { detail } => {
                tracing::debug!(
                    "{}: {} differs only by a catalog default: {}",
                    self.table,
                    check,
                    detail
                );
            }
            CheckOutcome::Changed { ddl, metadata } => {
                tracing::info!(
                    "{}: {} changed (ddl={:?}, metadata={:?})",
                    self.table,
                    check,
                    ddl,
                    metadata
                );
            }
        }
    }
}

/// One recorded check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub check: DriftCheck,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

/// Keeps the structured trace of a detection run.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub entries: Vec<TraceEntry>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(&self, check: DriftCheck) -> Option<&CheckOutcome> {
        self.entries
            .iter()
            .find(|entry| entry.check == check)
            .map(|entry| &entry.outcome)
    }

    pub fn checks(&self) -> Vec<DriftCheck> {
        self.entries.iter().map(|entry| entry.check).collect()
    }

    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}

impl DetectionObserver for RecordingObserver {
    fn record(&mut self, check: DriftCheck, outcome: &CheckOutcome) {
        self.entries.push(TraceEntry {
            check,
            outcome: outcome.clone(),
        });
    }
}
