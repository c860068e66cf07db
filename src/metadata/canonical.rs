//! Rendering of catalog metadata into the shapes produced by DDL parsing
//!
//! Every rendered string is directly comparable to the corresponding
//! [`ParsedDdl`](crate::ddl::ParsedDdl) field.

use std::collections::BTreeMap;

use super::model::{ColumnMetadata, TableMetadata};
use crate::ddl::normalize::collapse_spaces;
use crate::ddl::PropertyMap;

/// Table properties that take part in drift detection. Everything else in
/// the catalog `Parameters` map is maintained by the catalog itself.
const ALLOWED_PROPERTIES: &[&str] = &[
    "classification",
    "has_encrypted_data",
    "orc.compress",
    "parquet.compress",
    "write.compression",
    "skip.header.line.count",
    "storage.location.template",
];

const ALLOWED_PROPERTY_PREFIX: &str = "projection.";

/// Whether a lower-cased table property key is compared at all.
pub fn is_allow_listed(key: &str) -> bool {
    ALLOWED_PROPERTIES.contains(&key) || key.starts_with(ALLOWED_PROPERTY_PREFIX)
}

/// Keep only allow-listed entries of a lower-cased property map.
pub fn filter_allow_listed(properties: &PropertyMap) -> PropertyMap {
    properties
        .iter()
        .filter(|(key, _)| is_allow_listed(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Delimiter parameters of the catalog serde info, raw (not lower-cased).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataDelimiters {
    pub escape: Option<String>,
    pub field: Option<String>,
    /// Read from `colelction.delim`, the key the catalog actually writes,
    /// falling back to the correctly spelled `collection.delim`
    pub collection: Option<String>,
    pub map_key: Option<String>,
    pub line: Option<String>,
    pub null_format: Option<String>,
    pub serialization_format: Option<String>,
}

impl MetadataDelimiters {
    fn from_parameters(parameters: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| parameters.get(key).cloned();
        Self {
            escape: get("escape.delim"),
            field: get("field.delim"),
            collection: get("colelction.delim").or_else(|| get("collection.delim")),
            map_key: get("mapkey.delim"),
            line: get("line.delim"),
            null_format: get("serialization.null.format"),
            serialization_format: get("serialization.format"),
        }
    }

    /// Any delimiter-defining parameter is present. `serialization.format`
    /// alone does not count.
    pub fn any(&self) -> bool {
        self.escape.is_some()
            || self.field.is_some()
            || self.collection.is_some()
            || self.map_key.is_some()
            || self.line.is_some()
            || self.null_format.is_some()
    }

    /// `serialization.format` is `1`, the value the catalog writes for
    /// LazySimpleSerDe defaults.
    pub fn has_default_serialization(&self) -> bool {
        self.serialization_format.as_deref() == Some("1")
    }
}

/// Catalog metadata rendered for clause-by-clause comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalMetadata {
    /// `name type [comment 'text']` joined by `, `
    pub columns: String,
    pub comment: Option<String>,
    /// `None` when the table has no partition keys
    pub partition_keys: Option<String>,
    /// `col, col into N buckets`; `None` when there are no bucket columns
    pub bucketing: Option<String>,
    /// Serialization library exactly as the catalog reports it
    pub serde_library: Option<String>,
    /// Lower-cased serde parameters
    pub serde_parameters: PropertyMap,
    pub delimiters: MetadataDelimiters,
    pub input_format: Option<String>,
    pub output_format: Option<String>,
    pub location: Option<String>,
    /// Allow-listed, lower-cased table properties
    pub properties: PropertyMap,
}

impl CanonicalMetadata {
    pub fn from_metadata(table: &TableMetadata) -> Self {
        let sd = &table.storage_descriptor;

        let columns = render_columns(&sd.columns);

        let comment = table.comment().map(escape_comment);

        let partition_keys = (!table.partition_keys.is_empty()).then(|| {
            table
                .partition_keys
                .iter()
                .map(render_column)
                .collect::<Vec<_>>()
                .join(", ")
                .to_lowercase()
        });

        let bucketing = (!sd.bucket_columns.is_empty()).then(|| {
            format!(
                "{} into {} buckets",
                sd.bucket_columns.join(", ").to_lowercase(),
                sd.number_of_buckets
            )
        });

        let serde_parameters = lower_case_map(&sd.serde_info.parameters);

        let properties = lower_case_map(&table.parameters)
            .into_iter()
            .filter(|(key, _)| is_allow_listed(key))
            .collect();

        Self {
            columns,
            comment,
            partition_keys,
            bucketing,
            serde_library: sd.serde_info.serialization_library.clone(),
            serde_parameters,
            delimiters: MetadataDelimiters::from_parameters(&sd.serde_info.parameters),
            input_format: sd.input_format.as_deref().map(str::to_lowercase),
            output_format: sd.output_format.as_deref().map(str::to_lowercase),
            location: sd.location.as_deref().map(str::to_lowercase),
            properties,
        }
    }
}

/// Render storage columns the way the DDL column list reads after
/// normalization.
pub fn render_columns(columns: &[ColumnMetadata]) -> String {
    let joined = columns
        .iter()
        .map(render_column)
        .collect::<Vec<_>>()
        .join(", ");
    collapse_spaces(joined.trim()).to_lowercase()
}

fn render_column(column: &ColumnMetadata) -> String {
    match &column.comment {
        Some(comment) => format!(
            "{} {} comment '{}'",
            column.name,
            column.data_type,
            comment.replace('\'', "\\'")
        ),
        None => format!("{} {}", column.name, column.data_type),
    }
}

fn escape_comment(comment: &str) -> String {
    comment.replace('\'', "\\'").to_lowercase()
}

fn lower_case_map(map: &BTreeMap<String, String>) -> PropertyMap {
    map.iter()
        .map(|(key, value)| (key.to_lowercase(), value.to_lowercase()))
        .collect()
}
