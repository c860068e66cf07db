//! Catalog table metadata
//!
//! Mirrors the `get-tables` response shape (PascalCase keys). Optional parts
//! of the response are `Option` or empty collections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Table type the catalog reports for views.
pub const VIRTUAL_VIEW: &str = "VIRTUAL_VIEW";

/// Structural snapshot of one catalog table or view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_type: Option<String>,
    #[serde(default)]
    pub storage_descriptor: StorageDescriptor,
    #[serde(default)]
    pub partition_keys: Vec<ColumnMetadata>,
    /// Table properties; the table comment is stored under `comment`
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl TableMetadata {
    pub fn is_view(&self) -> bool {
        self.table_type.as_deref() == Some(VIRTUAL_VIEW)
    }

    pub fn comment(&self) -> Option<&str> {
        self.parameters.get("comment").map(String::as_str)
    }
}

/// A column or partition key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(rename = "Type")]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ColumnMetadata {
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageDescriptor {
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(default)]
    pub serde_info: SerdeInfo,
    #[serde(default)]
    pub bucket_columns: Vec<String>,
    /// The catalog reports 0 or -1 for unbucketed tables
    #[serde(default)]
    pub number_of_buckets: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SerdeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialization_library: Option<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}
