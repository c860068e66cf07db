//! Provisioning plan: what to run against the query engine, per table

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use super::config::{AppConfig, BucketMap, TableConfig, OUTPUT_BUCKET_LABEL};
use super::template::{load_template, render_ddl, rendered_path, table_location};
use crate::detect::{detect_changes, DriftCheck, TracingObserver};
use crate::error::DriftError;
use crate::metadata::{Catalog, TableMetadata};

/// Table count from which tables are planned in parallel
const PARALLEL_THRESHOLD: usize = 8;

/// What happens to one configured table or view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "changed", rename_all = "snake_case")]
pub enum TableAction {
    /// Not in the catalog yet
    Create,
    /// Views are always replaced
    ReplaceView,
    /// Drifted from its DDL: drop and create again
    Recreate(DriftCheck),
    Unchanged,
}

impl TableAction {
    pub fn label(&self) -> &'static str {
        match self {
            TableAction::Create => "create",
            TableAction::ReplaceView => "replace view",
            TableAction::Recreate(_) => "recreate",
            TableAction::Unchanged => "unchanged",
        }
    }
}

/// Statements for one table, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TablePlan {
    pub table_name: String,
    pub action: TableAction,
    pub statements: Vec<String>,
    /// Where the query engine writes results for these statements
    pub output_location: String,
    /// The DDL after placeholder substitution and comment stripping
    #[serde(skip)]
    pub rendered_ddl: String,
}

/// A folder marker object to create in a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderPlan {
    pub bucket: String,
    /// Object key, always ending in `/`
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionPlan {
    pub database: String,
    pub database_statement: String,
    pub folders: Vec<FolderPlan>,
    pub tables: Vec<TablePlan>,
}

impl ProvisionPlan {
    pub fn tables_with(&self, predicate: impl Fn(&TableAction) -> bool) -> usize {
        self.tables.iter().filter(|t| predicate(&t.action)).count()
    }

    /// Write every rendered DDL under `out_dir`, laid out by `sql_folder2`.
    pub fn write_rendered(&self, config: &AppConfig, out_dir: &Path) -> Result<Vec<PathBuf>, DriftError> {
        let mut written = Vec::with_capacity(self.tables.len());
        for (table, table_config) in self.tables.iter().zip(&config.athena_tables) {
            let path = rendered_path(out_dir, table_config);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| DriftError::FileWriteError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
            std::fs::write(&path, &table.rendered_ddl).map_err(|e| DriftError::FileWriteError {
                path: path.clone(),
                source: e,
            })?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Inputs shared by every table of a plan.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub config: &'a AppConfig,
    pub catalog: &'a Catalog,
    pub buckets: &'a BucketMap,
    pub ddl_dir: &'a Path,
    pub environment: Option<&'a str>,
}

/// `CREATE DATABASE IF NOT EXISTS db [location "s3://bucket/path/"]`
pub fn database_statement(
    config: &AppConfig,
    database: &str,
    buckets: &BucketMap,
) -> Result<String, DriftError> {
    match &config.database.location {
        Some(location) => {
            let bucket = buckets.resolve(&location.s3_label)?;
            Ok(format!(
                "CREATE DATABASE IF NOT EXISTS {} location \"s3://{}{}/\"",
                database, bucket, location.s3_path
            ))
        }
        None => Ok(format!("CREATE DATABASE IF NOT EXISTS {}", database)),
    }
}

/// Build the full plan. The first failing table aborts the plan.
pub fn build_plan(ctx: &PlanContext<'_>) -> Result<ProvisionPlan, DriftError> {
    let database = ctx.config.database_name(ctx.environment)?;
    let database_statement = database_statement(ctx.config, &database, ctx.buckets)?;

    let folders = ctx
        .config
        .folders
        .iter()
        .map(|folder| {
            Ok(FolderPlan {
                bucket: ctx.buckets.resolve(&folder.label)?.to_string(),
                key: format!("{}/", folder.folder_name.trim_end_matches('/')),
            })
        })
        .collect::<Result<Vec<_>, DriftError>>()?;

    let table_configs = &ctx.config.athena_tables;
    let tables = if table_configs.len() >= PARALLEL_THRESHOLD {
        table_configs
            .par_iter()
            .map(|table| plan_table(ctx, &database, table))
            .collect::<Result<Vec<_>, DriftError>>()?
    } else {
        table_configs
            .iter()
            .map(|table| plan_table(ctx, &database, table))
            .collect::<Result<Vec<_>, DriftError>>()?
    };

    tracing::info!(
        "Planned {} table(s) for database {}",
        tables.len(),
        database
    );

    Ok(ProvisionPlan {
        database,
        database_statement,
        folders,
        tables,
    })
}

/// Plan one table against its catalog entry, if any.
pub fn plan_table(
    ctx: &PlanContext<'_>,
    database: &str,
    table: &TableConfig,
) -> Result<TablePlan, DriftError> {
    tracing::debug!("Processing table {}", table.table_name);

    let data_bucket = ctx.buckets.resolve(&table.label)?;
    let output_bucket = ctx.buckets.resolve(OUTPUT_BUCKET_LABEL)?;

    let location = table_location(data_bucket, &table.location_dir, &table.table_name);
    let template = load_template(ctx.ddl_dir, table)?;
    let ddl = render_ddl(&template, &location, database);

    let action = decide_action(&ddl, ctx.catalog.find(&table.table_name))?;
    let statements = statements_for(action, database, &table.table_name, &ddl);

    tracing::info!("{}.{}: {}", database, table.table_name, action.label());

    Ok(TablePlan {
        table_name: table.table_name.clone(),
        action,
        statements,
        output_location: format!("s3://{}/{}", output_bucket, table.temp_folder),
        rendered_ddl: ddl,
    })
}

/// Missing tables are created and views replaced; only existing tables go
/// through change detection.
pub fn decide_action(ddl: &str, existing: Option<&TableMetadata>) -> Result<TableAction, DriftError> {
    let Some(table) = existing else {
        return Ok(TableAction::Create);
    };

    if table.is_view() {
        return Ok(TableAction::ReplaceView);
    }

    let mut observer = TracingObserver::new(&table.name);
    let verdict = detect_changes(ddl, table, &mut observer)?;
    Ok(match verdict.changed_check() {
        Some(check) => TableAction::Recreate(check),
        None => TableAction::Unchanged,
    })
}

/// Statements that carry out `action`, in execution order.
pub fn statements_for(action: TableAction, database: &str, table_name: &str, ddl: &str) -> Vec<String> {
    let mut statements = Vec::new();

    match action {
        TableAction::Unchanged => return statements,
        TableAction::Recreate(_) => {
            statements.push(format!("DROP TABLE IF EXISTS {}.{}", database, table_name));
        }
        TableAction::Create | TableAction::ReplaceView => {}
    }

    statements.push(ddl.trim().to_string());

    if ddl.to_lowercase().contains("partitioned by") {
        statements.push(format!("MSCK REPAIR TABLE {}.{}", database, table_name));
    }

    statements
}
