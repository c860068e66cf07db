//! Provisioning: app config, DDL templates and the per-table plan of
//! statements to run against the query engine.

pub mod config;
pub mod plan;
pub mod template;

pub use config::{AppConfig, BucketMap, DatabaseConfig, FolderConfig, TableConfig, ENVIRONMENT_VAR};
pub use plan::{build_plan, FolderPlan, PlanContext, ProvisionPlan, TableAction, TablePlan};
pub use template::{render_ddl, table_location};
