//! athena-ddl-drift: decides whether an external table DDL has drifted from
//! the table's catalog metadata
//!
//! The DDL is cut into clause segments, the catalog entry is rendered into
//! the same shape, and the two are compared clause by clause. A provisioning
//! plan turns the verdicts into DROP/CREATE/MSCK REPAIR statements.

pub mod ddl;
pub mod detect;
pub mod error;
pub mod metadata;
pub mod provision;
pub mod report;
pub mod util;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;

pub use detect::{detect_changes, has_table_structure_changed, ChangeVerdict, DriftCheck};
pub use error::DriftError;

/// Options for comparing one DDL file with a catalog dump
#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// DDL file, placeholders already substituted
    pub ddl_path: PathBuf,
    /// Catalog `get-tables` JSON dump
    pub metadata_path: PathBuf,
    /// Table to pick from the dump; may be omitted when it holds one table
    pub table: Option<String>,
}

/// Verdict plus the per-check trace of a detection run
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub table: String,
    pub verdict: ChangeVerdict,
    pub trace: Vec<detect::TraceEntry>,
}

/// Compare a DDL file against its catalog entry
pub fn detect_file_changes(options: &DetectOptions) -> Result<DetectionReport> {
    let ddl_text = util::read_text_file(&options.ddl_path).map_err(|e| DriftError::DdlReadError {
        path: options.ddl_path.clone(),
        source: e,
    })?;
    let catalog = metadata::load_catalog(&options.metadata_path)?;

    let table = match &options.table {
        Some(name) => catalog.require(name)?,
        None if catalog.len() == 1 => &catalog.tables[0],
        None => bail!(
            "{} holds {} tables; pick one with --table",
            options.metadata_path.display(),
            catalog.len()
        ),
    };

    if table.is_view() {
        bail!("{} is a view; views are always replaced, not compared", table.name);
    }

    let mut observer = (
        detect::RecordingObserver::new(),
        detect::TracingObserver::new(&table.name),
    );
    let verdict = detect_changes(&ddl_text, table, &mut observer)
        .with_context(|| format!("Comparing {}", options.ddl_path.display()))?;

    Ok(DetectionReport {
        table: table.name.clone(),
        verdict,
        trace: observer.0.into_entries(),
    })
}

/// Options for building a provisioning plan
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// App config JSON
    pub config_path: PathBuf,
    /// Root directory of the DDL templates
    pub ddl_dir: PathBuf,
    /// Catalog `get-tables` JSON dump of the target database
    pub catalog_path: PathBuf,
    /// Target environment (`dev`, `qa`, ...)
    pub environment: Option<String>,
    /// `label=bucket-name` assignments
    pub buckets: Vec<String>,
    /// Where to write the rendered DDL, if anywhere
    pub out_dir: Option<PathBuf>,
}

/// Build a provisioning plan for every configured table
pub fn plan_provisioning(options: &PlanOptions) -> Result<provision::ProvisionPlan> {
    let config = provision::AppConfig::load(&options.config_path)?;
    let buckets = provision::BucketMap::parse(options.buckets.as_slice())?;
    config.validate(Some(&buckets))?;

    let catalog = metadata::load_catalog(&options.catalog_path)?;
    tracing::debug!(
        "Loaded {} catalog table(s) from {}",
        catalog.len(),
        options.catalog_path.display()
    );

    let ctx = provision::PlanContext {
        config: &config,
        catalog: &catalog,
        buckets: &buckets,
        ddl_dir: &options.ddl_dir,
        environment: options.environment.as_deref(),
    };
    let plan = provision::build_plan(&ctx)?;

    if let Some(out_dir) = &options.out_dir {
        let written = plan.write_rendered(&config, out_dir)?;
        tracing::info!("Wrote {} rendered DDL file(s) to {}", written.len(), out_dir.display());
    }

    Ok(plan)
}
