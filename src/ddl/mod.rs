//! CREATE EXTERNAL TABLE segmentation
//!
//! The DDL is never parsed as SQL. It is normalized to one lower-case line,
//! split at its column list, and cut into clause segments by substring
//! markers. Values must be single-quoted; double-quoted literals are not
//! recognised.

pub mod clauses;
pub mod columns;
pub mod normalize;
pub mod properties;
pub mod row_format;
pub mod statement;
pub mod storage;

pub use clauses::{Clause, ClauseIndex, ClauseMarker, ClauseSegment, ClauseSegments, TABLE_CLAUSES};
pub use columns::{split_columns, ColumnSplit};
pub use normalize::{normalize_ddl, strip_comments};
pub use properties::{parse_property_list, PropertyMap};
pub use row_format::{
    classify, parse_row_format, Delimiters, RowFormat, RowFormatSubclause, RowFormatVariant,
    ROW_FORMAT_SUBCLAUSES,
};
pub use statement::ParsedDdl;
pub use storage::{parse_stored_as, FileFormat, StoredAs};
