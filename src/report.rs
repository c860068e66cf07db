//! Human-readable report printers

use crate::detect::{CheckOutcome, DriftCheck};
use crate::provision::{ProvisionPlan, TableAction};
use crate::DetectionReport;

/// Print a detection verdict and the checks that led to it.
pub fn print_detection_report(report: &DetectionReport) {
    println!("=== Drift Report: {} ===", report.table);
    println!();

    for entry in &report.trace {
        println!(
            "{} {:<14} {}",
            outcome_symbol(&entry.outcome),
            entry.check.name(),
            entry.outcome
        );
    }

    let evaluated = report.trace.len();
    let skipped = DriftCheck::ORDER.len().saturating_sub(evaluated);
    if skipped > 0 && report.verdict.needs_recreate() {
        println!("({} later check(s) skipped)", skipped);
    }
    println!();

    if report.verdict.needs_recreate() {
        println!("recreate");
    } else {
        println!("unchanged");
    }
}

/// Print every statement of a plan, grouped by table.
pub fn print_plan(plan: &ProvisionPlan) {
    println!("=== Provisioning Plan: {} ===", plan.database);
    println!();

    println!("--- Database ---");
    println!("{}", plan.database_statement);
    println!();

    println!("--- Folders ({}) ---", plan.folders.len());
    if plan.folders.is_empty() {
        println!("  (none)");
    } else {
        for folder in &plan.folders {
            println!("  s3://{}/{}", folder.bucket, folder.key);
        }
    }
    println!();

    for table in &plan.tables {
        match table.action {
            TableAction::Recreate(check) => {
                println!("--- {} (recreate: {} changed) ---", table.table_name, check)
            }
            other => println!("--- {} ({}) ---", table.table_name, other.label()),
        }
        if table.statements.is_empty() {
            println!("  (nothing to run)");
        }
        for statement in &table.statements {
            println!("{};", statement);
        }
        println!();
    }

    println!(
        "Summary: {} create, {} replace view, {} recreate, {} unchanged",
        plan.tables_with(|a| matches!(a, TableAction::Create)),
        plan.tables_with(|a| matches!(a, TableAction::ReplaceView)),
        plan.tables_with(|a| matches!(a, TableAction::Recreate(_))),
        plan.tables_with(|a| matches!(a, TableAction::Unchanged)),
    );
}

fn outcome_symbol(outcome: &CheckOutcome) -> &'static str {
    match outcome {
        CheckOutcome::Same { .. } => "=",
        CheckOutcome::DefaultEquivalent { .. } => "~",
        CheckOutcome::Changed { .. } => "!",
    }
}
