//! DDL template rendering

use std::path::{Path, PathBuf};

use super::config::TableConfig;
use crate::ddl::strip_comments;
use crate::error::DriftError;
use crate::util::read_text_file;

pub const LOCATION_PLACEHOLDER: &str = "%%LOCATION%%";
pub const DATABASE_PLACEHOLDER: &str = "%%DATABASE%%";

/// `s3://<bucket><location_dir>/<table_name>`
pub fn table_location(bucket: &str, location_dir: &str, table_name: &str) -> String {
    format!("s3://{}{}/{}", bucket, location_dir, table_name)
}

/// Substitute placeholders and strip `--` comments.
pub fn render_ddl(template: &str, location: &str, database: &str) -> String {
    let substituted = template
        .replace(LOCATION_PLACEHOLDER, location)
        .replace(DATABASE_PLACEHOLDER, database);
    strip_comments(&substituted)
}

/// Path of a table's DDL template under `ddl_dir`.
pub fn template_path(ddl_dir: &Path, table: &TableConfig) -> PathBuf {
    match table.sql_folder1.as_deref().filter(|folder| !folder.is_empty()) {
        Some(folder) => ddl_dir.join(folder).join(&table.script_name),
        None => ddl_dir.join(&table.script_name),
    }
}

/// Path the rendered DDL is written to under `out_dir`.
pub fn rendered_path(out_dir: &Path, table: &TableConfig) -> PathBuf {
    match table.sql_folder2.as_deref().filter(|folder| !folder.is_empty()) {
        Some(folder) => out_dir.join(folder).join(&table.script_name),
        None => out_dir.join(&table.script_name),
    }
}

/// Read a table's DDL template from disk.
pub fn load_template(ddl_dir: &Path, table: &TableConfig) -> Result<String, DriftError> {
    let path = template_path(ddl_dir, table);
    read_text_file(&path).map_err(|e| DriftError::DdlReadError { path, source: e })
}
