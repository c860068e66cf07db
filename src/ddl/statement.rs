//! Assembly of a CREATE EXTERNAL TABLE statement into typed clause values
//!
//! All structural validation happens here, before any comparison: a DDL that
//! cannot be segmented is rejected as a whole.

use super::clauses::{Clause, ClauseIndex, TABLE_CLAUSES};
use super::columns::split_columns;
use super::normalize::normalize_ddl;
use super::properties::{parenthesized_body, parse_property_list, PropertyMap};
use super::row_format::{parse_row_format, RowFormat};
use super::storage::{parse_stored_as, StoredAs};
use crate::error::DriftError;
use crate::util::trim_quotes;

/// Canonical clause values of one CREATE EXTERNAL TABLE statement.
///
/// Every string is lower-case, as produced by [`normalize_ddl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDdl {
    /// Column list without its outer parentheses
    pub columns: String,
    /// Table comment with surrounding quotes removed
    pub comment: Option<String>,
    /// Text inside `PARTITIONED BY ( ... )`
    pub partitioned_by: Option<String>,
    /// `col, col into N buckets`
    pub clustered_by: Option<String>,
    pub row_format: Option<RowFormat>,
    pub stored_as: Option<StoredAs>,
    pub location: String,
    pub tblproperties: Option<PropertyMap>,
}

impl ParsedDdl {
    /// Normalize and parse raw DDL text.
    pub fn parse(ddl_text: &str) -> Result<Self, DriftError> {
        Self::from_normalized(&normalize_ddl(ddl_text))
    }

    /// Parse DDL that already went through [`normalize_ddl`].
    pub fn from_normalized(normalized: &str) -> Result<Self, DriftError> {
        let split = split_columns(normalized)?;
        let remainder = split.remainder;

        let index = ClauseIndex::build(remainder, TABLE_CLAUSES);
        let segments = index.segments(remainder);
        let segment = |clause| segments.get(clause).map(|s| s.text);

        let location = segment(Clause::Location)
            .map(|text| trim_quotes(after_first_space(text)).to_string())
            .ok_or(DriftError::MissingLocation)?;

        let row_format = segment(Clause::RowFormat)
            .map(parse_row_format)
            .transpose()?;

        let stored_as = segments
            .get(Clause::StoredAs)
            .map(|s| parse_stored_as(s.value()))
            .transpose()?;

        let comment =
            segment(Clause::Comment).map(|text| trim_quotes(after_first_space(text)).to_string());

        let partitioned_by = segment(Clause::PartitionedBy).map(|text| {
            let inner = after_first_paren(text);
            inner.strip_suffix(')').unwrap_or(inner).trim().to_string()
        });

        let clustered_by = segment(Clause::ClusteredBy)
            .map(|text| after_first_paren(text).replace(')', "").trim().to_string());

        let tblproperties =
            segment(Clause::TblProperties).map(|text| parse_property_list(parenthesized_body(text)));

        Ok(Self {
            columns: split.columns.to_string(),
            comment,
            partitioned_by,
            clustered_by,
            row_format,
            stored_as,
            location,
            tblproperties,
        })
    }

    pub fn is_partitioned(&self) -> bool {
        self.partitioned_by.is_some()
    }
}

fn after_first_space(text: &str) -> &str {
    text.split_once(' ').map(|(_, rest)| rest).unwrap_or("")
}

fn after_first_paren(text: &str) -> &str {
    text.split_once('(').map(|(_, rest)| rest).unwrap_or("")
}
