//! Loading of catalog `get-tables` dumps

use std::path::Path;

use serde::Deserialize;

use super::model::TableMetadata;
use crate::error::DriftError;
use crate::util::read_text_file;

/// Accepted top-level shapes of a catalog dump.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    TableList {
        #[serde(rename = "TableList")]
        table_list: Vec<TableMetadata>,
    },
    Tables(Vec<TableMetadata>),
    Single(Box<TableMetadata>),
}

/// Tables of one catalog database.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub tables: Vec<TableMetadata>,
}

impl Catalog {
    pub fn new(tables: Vec<TableMetadata>) -> Self {
        Self { tables }
    }

    /// Parse a catalog dump from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tables = match serde_json::from_str::<CatalogDocument>(json)? {
            CatalogDocument::TableList { table_list } => table_list,
            CatalogDocument::Tables(tables) => tables,
            CatalogDocument::Single(table) => vec![*table],
        };
        Ok(Self { tables })
    }

    /// Catalog table names are stored lower-case, so lookup ignores case.
    pub fn find(&self, name: &str) -> Option<&TableMetadata> {
        self.tables
            .iter()
            .find(|table| table.name.eq_ignore_ascii_case(name))
    }

    /// Like [`Catalog::find`], but a missing table is an error.
    pub fn require(&self, name: &str) -> Result<&TableMetadata, DriftError> {
        self.find(name).ok_or_else(|| DriftError::TableNotFound {
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Read a catalog dump from disk.
pub fn load_catalog(path: &Path) -> Result<Catalog, DriftError> {
    let json = read_text_file(path).map_err(|e| DriftError::FileReadError {
        what: "catalog",
        path: path.to_path_buf(),
        source: e,
    })?;

    Catalog::from_json(&json).map_err(|e| DriftError::JsonParseError {
        what: "catalog",
        path: path.to_path_buf(),
        source: e,
    })
}
