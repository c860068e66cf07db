//! Application config: database, bucket folders and the tables to provision

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DriftError;
use crate::util::read_text_file;

/// Environment variable naming the target environment (`dev`, `qa`, ...).
pub const ENVIRONMENT_VAR: &str = "branchEnv";

/// Bucket label whose bucket receives query results.
pub const OUTPUT_BUCKET_LABEL: &str = "output";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub folders: Vec<FolderConfig>,
    #[serde(default)]
    pub athena_tables: Vec<TableConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub name: String,
    /// Append `_<env>` to the database name. Accepts `true`/`false` or the
    /// strings `"true"`/`"false"`.
    #[serde(default, deserialize_with = "flag")]
    pub include_env_suffix: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<DatabaseLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseLocation {
    pub s3_label: String,
    pub s3_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderConfig {
    pub folder_name: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub table_name: String,
    /// DDL template file name
    pub script_name: String,
    /// Bucket label of the table data
    pub label: String,
    /// Path under the bucket, with a leading `/`
    #[serde(default)]
    pub location_dir: String,
    /// Folder under the output bucket for query results
    #[serde(default)]
    pub temp_folder: String,
    /// Folder holding the DDL template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_folder1: Option<String>,
    /// Folder receiving the rendered DDL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_folder2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_folder: Option<String>,
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Text(text) => text.trim().eq_ignore_ascii_case("true"),
    })
}

impl AppConfig {
    /// Read and parse an app config JSON file.
    pub fn load(path: &Path) -> Result<Self, DriftError> {
        let json = read_text_file(path).map_err(|e| DriftError::FileReadError {
            what: "app config",
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&json).map_err(|e| DriftError::JsonParseError {
            what: "app config",
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Database name for `environment`, with the `_<env>` suffix when
    /// configured.
    pub fn database_name(&self, environment: Option<&str>) -> Result<String, DriftError> {
        if !self.database.include_env_suffix {
            return Ok(self.database.name.clone());
        }

        match environment.map(str::trim).filter(|env| !env.is_empty()) {
            Some(env) => Ok(format!("{}_{}", self.database.name, env)),
            None => Err(DriftError::InvalidConfig {
                message: format!(
                    "database '{}' needs an environment suffix but no environment was given (set {})",
                    self.database.name, ENVIRONMENT_VAR
                ),
            }),
        }
    }

    /// Every bucket label the config refers to.
    pub fn bucket_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .database
            .location
            .iter()
            .map(|location| location.s3_label.as_str())
            .chain(self.folders.iter().map(|folder| folder.label.as_str()))
            .chain(self.athena_tables.iter().map(|table| table.label.as_str()))
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Check the config for problems that would only surface mid-plan.
    ///
    /// With `buckets`, every referenced label (plus the output label when
    /// tables are configured) must resolve.
    pub fn validate(&self, buckets: Option<&BucketMap>) -> Result<(), DriftError> {
        let mut problems = Vec::new();

        if self.database.name.trim().is_empty() {
            problems.push("database name is empty".to_string());
        }

        let mut seen = HashSet::new();
        for (i, table) in self.athena_tables.iter().enumerate() {
            if table.table_name.trim().is_empty() {
                problems.push(format!("athena_tables[{}] has an empty table_name", i));
            } else if !seen.insert(table.table_name.to_lowercase()) {
                problems.push(format!("table '{}' is configured more than once", table.table_name));
            }
            if table.script_name.trim().is_empty() {
                problems.push(format!("athena_tables[{}] has an empty script_name", i));
            }
        }

        for (i, folder) in self.folders.iter().enumerate() {
            if folder.folder_name.trim().is_empty() {
                problems.push(format!("folders[{}] has an empty folder_name", i));
            }
        }

        if let Some(buckets) = buckets {
            let mut labels = self.bucket_labels();
            if !self.athena_tables.is_empty() {
                labels.push(OUTPUT_BUCKET_LABEL);
            }
            for label in labels {
                if buckets.get(label).is_none() {
                    problems.push(format!("no bucket configured for label '{}'", label));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DriftError::InvalidConfig {
                message: problems.join("; "),
            })
        }
    }
}

/// Resolved bucket names keyed by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketMap {
    buckets: BTreeMap<String, String>,
}

impl BucketMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `label=bucket-name` assignments.
    pub fn parse<S: AsRef<str>>(assignments: &[S]) -> Result<Self, DriftError> {
        let mut map = Self::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (label, bucket) = assignment
                .split_once('=')
                .map(|(l, b)| (l.trim(), b.trim()))
                .filter(|(l, b)| !l.is_empty() && !b.is_empty())
                .ok_or_else(|| DriftError::InvalidConfig {
                    message: format!("bucket assignment '{}' is not of the form label=name", assignment),
                })?;
            map.insert(label, bucket);
        }
        Ok(map)
    }

    pub fn insert(&mut self, label: &str, bucket: &str) {
        self.buckets.insert(label.to_string(), bucket.to_string());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.buckets.get(label).map(String::as_str)
    }

    pub fn resolve(&self, label: &str) -> Result<&str, DriftError> {
        self.get(label).ok_or_else(|| DriftError::UnknownBucketLabel {
            label: label.to_string(),
        })
    }
}
