//! Catalog metadata: the serde model, catalog dump loading, and the
//! canonical rendering compared against parsed DDL.

pub mod canonical;
pub mod catalog;
pub mod model;

pub use canonical::{filter_allow_listed, is_allow_listed, CanonicalMetadata, MetadataDelimiters};
pub use catalog::{load_catalog, Catalog};
pub use model::{ColumnMetadata, SerdeInfo, StorageDescriptor, TableMetadata, VIRTUAL_VIEW};
