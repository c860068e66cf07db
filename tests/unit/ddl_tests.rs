//! Unit tests for DDL normalization and clause segmentation

use pretty_assertions::assert_eq;

use athena_ddl_drift::ddl::{
    normalize_ddl, split_columns, Clause, ClauseIndex, ParsedDdl, StoredAs, TABLE_CLAUSES,
};
use athena_ddl_drift::DriftError;

// ============================================================================
// Normalization Tests
// ============================================================================

#[test]
fn test_normalize_is_idempotent() {
    let ddl = "CREATE EXTERNAL TABLE `sales`.`orders` (\r\n\tid   BIGINT ,\n\tamount DECIMAL(10,2) -- money\n)\nLOCATION 's3://b/orders';";
    let once = normalize_ddl(ddl);
    let twice = normalize_ddl(&once);

    assert_eq!(once, twice);
    assert_eq!(
        once,
        "create external table sales.orders ( id bigint, amount decimal(10,2)) location 's3://b/orders'"
    );
}

#[test]
fn test_normalize_collapses_long_space_runs() {
    assert_eq!(normalize_ddl("a        ,     b     )"), "a, b)");
}

#[test]
fn test_normalize_drops_comment_only_lines() {
    let ddl = "-- header\n-- another\nCREATE EXTERNAL TABLE t (id int)\n-- trailing";
    assert_eq!(normalize_ddl(ddl), " create external table t (id int) ");
}

// ============================================================================
// Column Extraction Tests
// ============================================================================

#[test]
fn test_nested_decimal_stays_in_column_list() {
    let normalized = normalize_ddl("CREATE EXTERNAL TABLE t (id int, amt decimal(10,2)) LOCATION 's3://b/t'");
    let split = split_columns(&normalized).unwrap();

    assert_eq!(split.columns, "id int, amt decimal(10,2)");
    assert_eq!(split.remainder, "location 's3://b/t'");
    assert_eq!(split.columns.split(", ").count(), 2);
}

#[test]
fn test_deeply_nested_struct_column() {
    let normalized = normalize_ddl(
        "CREATE EXTERNAL TABLE t (payload struct<a:decimal(5,1),b:array<decimal(3,0)>>, id int) PARTITIONED BY (dt string) LOCATION 's3://b/t'",
    );
    let split = split_columns(&normalized).unwrap();

    assert_eq!(
        split.columns,
        "payload struct<a:decimal(5,1),b:array<decimal(3,0)>>, id int"
    );
    assert!(split.remainder.starts_with("partitioned by (dt string)"));
}

#[test]
fn test_unclosed_column_list() {
    let err = split_columns("create external table t (id int, amt decimal(10,2)").unwrap_err();
    assert!(matches!(err, DriftError::UnbalancedParentheses { .. }));
    assert!(err.is_structural());
}

#[test]
fn test_stray_close_paren() {
    let err = split_columns("create external table t ) (id int)").unwrap_err();
    assert!(matches!(err, DriftError::UnbalancedParentheses { offset: 24 }));
}

#[test]
fn test_missing_column_list() {
    let err = split_columns("create external table t location 's3://b/t'").unwrap_err();
    assert!(matches!(err, DriftError::MissingColumnList));
}

// ============================================================================
// Clause Segmentation Tests
// ============================================================================

#[test]
fn test_segments_follow_text_order() {
    let remainder = "comment 'orders' partitioned by (dt string) stored as parquet location 's3://b/t' tblproperties ('classification'='parquet')";
    let index = ClauseIndex::build(remainder, TABLE_CLAUSES);
    let segments = index.segments(remainder);

    let texts: Vec<&str> = segments.iter().map(|s| s.text).collect();
    assert_eq!(
        texts,
        vec![
            "comment 'orders'",
            "partitioned by (dt string)",
            "stored as parquet",
            "location 's3://b/t'",
            "tblproperties ('classification'='parquet')",
        ]
    );
    assert!(!index.contains(Clause::ClusteredBy));
    assert!(!index.contains(Clause::RowFormat));
}

#[test]
fn test_partition_column_comment_is_not_table_comment() {
    let remainder = "partitioned by (dt string comment 'load date') location 's3://b/t'";
    let index = ClauseIndex::build(remainder, TABLE_CLAUSES);

    assert!(!index.contains(Clause::Comment));
    assert_eq!(index.offset(Clause::PartitionedBy), Some(0));

    let segments = index.segments(remainder);
    assert_eq!(
        segments.get(Clause::PartitionedBy).unwrap().text,
        "partitioned by (dt string comment 'load date')"
    );
}

#[test]
fn test_segments_cover_remainder_without_overlap() {
    let remainder = "clustered by (id) into 4 buckets row format delimited fields terminated by ',' stored as textfile location 's3://b/t'";
    let index = ClauseIndex::build(remainder, TABLE_CLAUSES);
    let segments = index.segments(remainder);

    let rejoined: Vec<&str> = segments.iter().map(|s| s.text).collect();
    assert_eq!(rejoined.join(" "), remainder);
}

// ============================================================================
// Statement Parsing Tests
// ============================================================================

#[test]
fn test_parse_explicit_formats_statement() {
    let parsed = ParsedDdl::parse(
        "CREATE EXTERNAL TABLE t (id int)
         STORED AS INPUTFORMAT 'org.apache.hadoop.mapred.TextInputFormat'
         OUTPUTFORMAT 'org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat'
         LOCATION 's3://b/t'",
    )
    .unwrap();

    assert_eq!(
        parsed.stored_as,
        Some(StoredAs::Explicit {
            input_format: "org.apache.hadoop.mapred.textinputformat".to_string(),
            output_format: Some("org.apache.hadoop.hive.ql.io.hiveignorekeytextoutputformat".to_string()),
        })
    );
}

#[test]
fn test_structural_errors_are_raised_before_comparison() {
    let cases = [
        "CREATE EXTERNAL TABLE t (id int LOCATION 's3://b/t'",
        "CREATE EXTERNAL TABLE t (id int) ROW FORMAT FOO LOCATION 's3://b/t'",
        "CREATE EXTERNAL TABLE t (id int) STORED AS PARQUET",
    ];

    for ddl in cases {
        let err = ParsedDdl::parse(ddl).unwrap_err();
        assert!(err.is_structural(), "{} should be structural, got {:?}", ddl, err);
    }
}

#[test]
fn test_location_must_be_s3() {
    let err = ParsedDdl::parse("CREATE EXTERNAL TABLE t (id int) LOCATION 'hdfs://x/t'").unwrap_err();
    assert!(matches!(err, DriftError::MissingLocation));
}
