use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use athena_ddl_drift::{
    ddl, detect_file_changes, plan_provisioning, provision, report, DetectOptions, PlanOptions,
};

#[derive(Parser)]
#[command(name = "athena-ddl-drift")]
#[command(author, version, about = "Detect drift between external table DDL and catalog metadata")]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(short, long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a DDL file with its catalog metadata
    Detect {
        /// Path to the DDL file
        #[arg(short, long)]
        ddl: PathBuf,

        /// Catalog get-tables JSON dump
        #[arg(short, long)]
        metadata: PathBuf,

        /// Table to compare (required when the dump holds several tables)
        #[arg(short, long)]
        table: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the provisioning plan for every configured table
    Plan {
        /// App config JSON
        #[arg(short, long)]
        config: PathBuf,

        /// Directory holding the DDL templates
        #[arg(long)]
        ddl_dir: PathBuf,

        /// Catalog get-tables JSON dump of the target database
        #[arg(long)]
        catalog: PathBuf,

        /// Target environment
        #[arg(short, long, env = "branchEnv")]
        env: Option<String>,

        /// Bucket for a label, as label=name (repeatable)
        #[arg(short, long = "bucket", value_name = "LABEL=NAME")]
        buckets: Vec<String>,

        /// Write the rendered DDL files under this directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a DDL file the way the detector sees it
    Normalize {
        /// Path to the DDL file
        #[arg(short, long)]
        ddl: PathBuf,
    },

    /// Check an app config file
    ValidateConfig {
        /// App config JSON
        #[arg(short, long)]
        config: PathBuf,

        /// Bucket for a label, as label=name (repeatable)
        #[arg(short, long = "bucket", value_name = "LABEL=NAME")]
        buckets: Vec<String>,
    },
}

fn init_logging(level: LogLevel) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Commands::Detect {
            ddl,
            metadata,
            table,
            json,
        } => {
            let options = DetectOptions {
                ddl_path: ddl,
                metadata_path: metadata,
                table,
            };

            let detection = detect_file_changes(&options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&detection)?);
            } else {
                report::print_detection_report(&detection);
            }
        }
        Commands::Plan {
            config,
            ddl_dir,
            catalog,
            env,
            buckets,
            out_dir,
            json,
        } => {
            let options = PlanOptions {
                config_path: config,
                ddl_dir,
                catalog_path: catalog,
                environment: env,
                buckets,
                out_dir,
            };

            let plan = plan_provisioning(&options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                report::print_plan(&plan);
            }
        }
        Commands::Normalize { ddl: path } => {
            let text = athena_ddl_drift::util::read_text_file(&path).map_err(|e| {
                athena_ddl_drift::DriftError::DdlReadError {
                    path: path.clone(),
                    source: e,
                }
            })?;
            println!("{}", ddl::normalize_ddl(&text));
        }
        Commands::ValidateConfig { config, buckets } => {
            let app_config = provision::AppConfig::load(&config)?;
            let bucket_map = provision::BucketMap::parse(buckets.as_slice())?;
            let check_buckets = (!buckets.is_empty()).then_some(&bucket_map);
            app_config.validate(check_buckets)?;
            println!(
                "{} is valid ({} table(s), {} folder(s))",
                config.display(),
                app_config.athena_tables.len(),
                app_config.folders.len()
            );
        }
    }

    Ok(())
}
