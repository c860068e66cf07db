//! Error types for athena-ddl-drift

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while comparing DDL with catalog metadata or
/// assembling a provisioning plan
#[derive(Error, Debug)]
pub enum DriftError {
    #[error("Encountered unbalanced parentheses while parsing the columns list at offset {offset} -- check the DDL for syntax errors")]
    UnbalancedParentheses { offset: usize },

    #[error("DDL does not contain a parenthesized columns list")]
    MissingColumnList,

    #[error("Unable to find any of the expected ROW FORMAT variants (serde, with serdeproperties, delimited) in: {segment}")]
    UnknownRowFormat { segment: String },

    #[error("The mandatory LOCATION clause is missing in the DDL")]
    MissingLocation,

    #[error("Unsupported {clause} value: {value}")]
    UnsupportedConstruct { clause: &'static str, value: String },

    #[error("Failed to read DDL file: {path}")]
    DdlReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {what} file: {path}")]
    FileReadError {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {what} JSON: {path}")]
    JsonParseError {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid app config: {message}")]
    InvalidConfig { message: String },

    #[error("No bucket configured for label '{label}'")]
    UnknownBucketLabel { label: String },

    #[error("Table '{name}' not found in catalog")]
    TableNotFound { name: String },
}

impl DriftError {
    /// Whether the error comes from malformed DDL rather than from I/O or
    /// configuration
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DriftError::UnbalancedParentheses { .. }
                | DriftError::MissingColumnList
                | DriftError::UnknownRowFormat { .. }
                | DriftError::MissingLocation
        )
    }
}
