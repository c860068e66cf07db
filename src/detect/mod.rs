//! Change detection between DDL and catalog metadata
//!
//! Checks run in a fixed order and stop at the first change. Only that first
//! differing check is reported.

mod comparators;
pub mod observer;

use std::fmt;

use serde::Serialize;

use crate::ddl::ParsedDdl;
use crate::error::DriftError;
use crate::metadata::{CanonicalMetadata, TableMetadata};

pub use observer::{CheckOutcome, DetectionObserver, RecordingObserver, TraceEntry, TracingObserver};

/// One clause-level comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftCheck {
    Columns,
    TableComment,
    Partitioning,
    Clustering,
    RowFormat,
    FileFormat,
    Location,
    TblProperties,
}

impl DriftCheck {
    /// Evaluation order.
    pub const ORDER: [DriftCheck; 8] = [
        DriftCheck::Columns,
        DriftCheck::TableComment,
        DriftCheck::Partitioning,
        DriftCheck::Clustering,
        DriftCheck::RowFormat,
        DriftCheck::FileFormat,
        DriftCheck::Location,
        DriftCheck::TblProperties,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DriftCheck::Columns => "columns",
            DriftCheck::TableComment => "table comment",
            DriftCheck::Partitioning => "partitioning",
            DriftCheck::Clustering => "clustering",
            DriftCheck::RowFormat => "row format",
            DriftCheck::FileFormat => "file format",
            DriftCheck::Location => "location",
            DriftCheck::TblProperties => "tblproperties",
        }
    }
}

impl fmt::Display for DriftCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a full detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "check", rename_all = "snake_case")]
pub enum ChangeVerdict {
    Unchanged,
    /// The earliest check that found a difference
    Changed(DriftCheck),
}

impl ChangeVerdict {
    pub fn needs_recreate(&self) -> bool {
        matches!(self, ChangeVerdict::Changed(_))
    }

    pub fn changed_check(&self) -> Option<DriftCheck> {
        match self {
            ChangeVerdict::Changed(check) => Some(*check),
            ChangeVerdict::Unchanged => None,
        }
    }
}

impl fmt::Display for ChangeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeVerdict::Unchanged => f.write_str("unchanged"),
            ChangeVerdict::Changed(check) => write!(f, "recreate ({} changed)", check),
        }
    }
}

/// Parse `ddl_text` and compare it against `table`.
///
/// Malformed DDL fails before any check is reported to `observer`.
pub fn detect_changes(
    ddl_text: &str,
    table: &TableMetadata,
    observer: &mut dyn DetectionObserver,
) -> Result<ChangeVerdict, DriftError> {
    let ddl = ParsedDdl::parse(ddl_text)?;
    Ok(compare_parsed(&ddl, table, observer))
}

/// Compare an already parsed DDL against `table`.
pub fn compare_parsed(
    ddl: &ParsedDdl,
    table: &TableMetadata,
    observer: &mut dyn DetectionObserver,
) -> ChangeVerdict {
    let meta = CanonicalMetadata::from_metadata(table);

    for check in DriftCheck::ORDER {
        let outcome = comparators::evaluate(check, ddl, &meta);
        observer.record(check, &outcome);
        if outcome.is_changed() {
            return ChangeVerdict::Changed(check);
        }
    }

    ChangeVerdict::Unchanged
}

/// Boolean form of [`detect_changes`] that logs every check through
/// `tracing`.
pub fn has_table_structure_changed(ddl_text: &str, table: &TableMetadata) -> Result<bool, DriftError> {
    let mut observer = TracingObserver::new(&table.name);
    detect_changes(ddl_text, table, &mut observer).map(|verdict| verdict.needs_recreate())
}
