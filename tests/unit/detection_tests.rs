//! Unit tests for clause-by-clause change detection

use athena_ddl_drift::detect::{
    detect_changes, has_table_structure_changed, ChangeVerdict, CheckOutcome, DriftCheck,
    RecordingObserver,
};
use athena_ddl_drift::metadata::TableMetadata;

use crate::common::TableBuilder;

fn verdict(ddl: &str, table: &TableMetadata) -> ChangeVerdict {
    let mut observer = RecordingObserver::new();
    detect_changes(ddl, table, &mut observer).expect("DDL should parse")
}

const PARQUET_DDL: &str = "CREATE EXTERNAL TABLE t (id int, name string) PARTITIONED BY (dt string) STORED AS PARQUET LOCATION 's3://b/t'";

fn parquet_table() -> TableBuilder {
    TableBuilder::new("t")
        .column("id", "int")
        .column("name", "string")
        .partition("dt", "string")
        .parquet()
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[test]
fn test_partitioned_parquet_table_is_unchanged() {
    let table = parquet_table().build();
    assert!(!has_table_structure_changed(PARQUET_DDL, &table).unwrap());
}

#[test]
fn test_bucketed_metadata_without_clustered_by() {
    let table = parquet_table().buckets(&["id", "name", "dt"], 8).build();
    assert_eq!(
        verdict(PARQUET_DDL, &table),
        ChangeVerdict::Changed(DriftCheck::Clustering)
    );
}

#[test]
fn test_tblproperties_outside_allow_list_are_ignored() {
    let ddl = "CREATE EXTERNAL TABLE t (id int, name string) PARTITIONED BY (dt string) STORED AS PARQUET LOCATION 's3://b/t' TBLPROPERTIES ('parquet.compress'='snappy')";
    let table = parquet_table()
        .param("parquet.compress", "SNAPPY")
        .param("numFiles", "12")
        .param("COLUMN_STATS_ACCURATE", "false")
        .build();

    assert_eq!(verdict(ddl, &table), ChangeVerdict::Unchanged);
}

#[test]
fn test_lazy_simple_serde_defaults_are_no_change() {
    let ddl = "CREATE EXTERNAL TABLE t (id int) LOCATION 's3://b/t'";
    let table = TableBuilder::new("t").column("id", "int").build();

    let mut observer = RecordingObserver::new();
    let result = detect_changes(ddl, &table, &mut observer).unwrap();

    assert_eq!(result, ChangeVerdict::Unchanged);
    assert!(matches!(
        observer.outcome(DriftCheck::RowFormat),
        Some(CheckOutcome::DefaultEquivalent { .. })
    ));
    assert!(matches!(
        observer.outcome(DriftCheck::FileFormat),
        Some(CheckOutcome::DefaultEquivalent { .. })
    ));
}

#[test]
fn test_bucketed_table_matches_clustered_by() {
    let ddl = "CREATE EXTERNAL TABLE t (id int, name string) CLUSTERED BY (id, name) INTO 8 BUCKETS STORED AS PARQUET LOCATION 's3://b/t'";
    let table = TableBuilder::new("t")
        .column("id", "int")
        .column("name", "string")
        .buckets(&["id", "name"], 8)
        .parquet()
        .build();

    assert_eq!(verdict(ddl, &table), ChangeVerdict::Unchanged);
}

#[test]
fn test_commented_columns_and_table_comment() {
    let ddl = "CREATE EXTERNAL TABLE t (\n  id int COMMENT 'Row id',\n  note string\n)\nCOMMENT 'Notes table'\nLOCATION 's3://b/t'";
    let table = TableBuilder::new("t")
        .commented_column("id", "int", "Row id")
        .column("note", "string")
        .comment("Notes table")
        .build();
    assert_eq!(verdict(ddl, &table), ChangeVerdict::Unchanged);

    let recommented = TableBuilder::new("t")
        .commented_column("id", "int", "Row identifier")
        .column("note", "string")
        .comment("Notes table")
        .build();
    assert_eq!(
        verdict(ddl, &recommented),
        ChangeVerdict::Changed(DriftCheck::Columns)
    );
}

#[test]
fn test_escaped_quote_in_comment() {
    let ddl = r"CREATE EXTERNAL TABLE t (id int COMMENT 'customer\'s id') LOCATION 's3://b/t'";
    let table = TableBuilder::new("t")
        .commented_column("id", "int", "Customer's id")
        .build();
    assert_eq!(verdict(ddl, &table), ChangeVerdict::Unchanged);
}

// ============================================================================
// Single-Clause Difference Tests
// ============================================================================

#[test]
fn test_each_single_difference_reports_its_clause() {
    let cases: Vec<(&str, TableMetadata, DriftCheck)> = vec![
        (
            "added column",
            parquet_table().column("extra", "int").build(),
            DriftCheck::Columns,
        ),
        (
            "table comment",
            parquet_table().comment("now commented").build(),
            DriftCheck::TableComment,
        ),
        (
            "partition key",
            parquet_table().partition("hour", "int").build(),
            DriftCheck::Partitioning,
        ),
        (
            "bucket count",
            parquet_table().buckets(&["id"], 4).build(),
            DriftCheck::Clustering,
        ),
        (
            "serde parameter",
            parquet_table().serde_param("field.delim", ",").build(),
            DriftCheck::RowFormat,
        ),
        (
            "file format",
            parquet_table()
                .formats(
                    "org.apache.hadoop.hive.ql.io.orc.OrcInputFormat",
                    "org.apache.hadoop.hive.ql.io.orc.OrcOutputFormat",
                )
                .build(),
            DriftCheck::FileFormat,
        ),
        (
            "location",
            parquet_table().location("s3://b/t_v2").build(),
            DriftCheck::Location,
        ),
        (
            "table property",
            parquet_table().param("classification", "parquet").build(),
            DriftCheck::TblProperties,
        ),
    ];

    for (label, table, expected) in cases {
        assert_eq!(
            verdict(PARQUET_DDL, &table),
            ChangeVerdict::Changed(expected),
            "{} should be reported as {}",
            label,
            expected
        );
    }
}

#[test]
fn test_earliest_difference_wins() {
    let table = parquet_table()
        .location("s3://b/elsewhere")
        .buckets(&["id"], 4)
        .comment("different")
        .build();

    let mut observer = RecordingObserver::new();
    let result = detect_changes(PARQUET_DDL, &table, &mut observer).unwrap();

    assert_eq!(result, ChangeVerdict::Changed(DriftCheck::TableComment));
    assert_eq!(
        observer.checks(),
        vec![DriftCheck::Columns, DriftCheck::TableComment]
    );
}

#[test]
fn test_column_type_change() {
    let table = TableBuilder::new("t")
        .column("id", "bigint")
        .column("name", "string")
        .partition("dt", "string")
        .parquet()
        .build();
    assert_eq!(
        verdict(PARQUET_DDL, &table),
        ChangeVerdict::Changed(DriftCheck::Columns)
    );
}

#[test]
fn test_case_only_differences_are_not_detected() {
    let ddl = "CREATE EXTERNAL TABLE t (ID INT, NAME STRING) PARTITIONED BY (DT STRING) STORED AS PARQUET LOCATION 's3://b/t'";
    let table = TableBuilder::new("t")
        .column("Id", "int")
        .column("Name", "string")
        .partition("dt", "string")
        .parquet()
        .location("s3://B/T")
        .build();
    assert_eq!(verdict(ddl, &table), ChangeVerdict::Unchanged);
}

// ============================================================================
// Idempotence Tests
// ============================================================================

#[test]
fn test_repeated_detection_is_stable() {
    let table = parquet_table().buckets(&["id"], 4).build();
    let before = table.clone();

    let mut first = RecordingObserver::new();
    let mut second = RecordingObserver::new();
    let a = detect_changes(PARQUET_DDL, &table, &mut first).unwrap();
    let b = detect_changes(PARQUET_DDL, &table, &mut second).unwrap();

    assert_eq!(a, b);
    assert_eq!(first.entries, second.entries);
    assert_eq!(table, before);
}

#[test]
fn test_identical_schema_reports_every_check() {
    let mut observer = RecordingObserver::new();
    let result = detect_changes(PARQUET_DDL, &parquet_table().build(), &mut observer).unwrap();

    assert_eq!(result, ChangeVerdict::Unchanged);
    assert_eq!(observer.checks(), DriftCheck::ORDER.to_vec());
    assert!(observer.entries.iter().all(|e| !e.outcome.is_changed()));
}
