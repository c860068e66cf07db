//! Unit tests for ROW FORMAT classification and comparison

use athena_ddl_drift::ddl::{ParsedDdl, RowFormat, RowFormatVariant};
use athena_ddl_drift::detect::{detect_changes, ChangeVerdict, CheckOutcome, DriftCheck, RecordingObserver};
use athena_ddl_drift::metadata::TableMetadata;

use crate::common::{TableBuilder, LAZY_SIMPLE_SERDE};

const OPEN_CSV_SERDE: &str = "org.apache.hadoop.hive.serde2.OpenCSVSerde";
const JSON_SERDE: &str = "org.openx.data.jsonserde.JsonSerDe";

fn ddl_with(row_format: &str) -> String {
    format!(
        "CREATE EXTERNAL TABLE t (id int, tags array<string>)\n{}\nLOCATION 's3://b/t'",
        row_format
    )
}

fn text_table() -> TableBuilder {
    TableBuilder::new("t")
        .column("id", "int")
        .column("tags", "array<string>")
}

fn row_format_outcome(ddl: &str, table: &TableMetadata) -> CheckOutcome {
    let mut observer = RecordingObserver::new();
    detect_changes(ddl, table, &mut observer).expect("DDL should parse");
    observer
        .outcome(DriftCheck::RowFormat)
        .cloned()
        .expect("row format should be evaluated")
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test]
fn test_variant_classification() {
    let cases = [
        (
            format!("ROW FORMAT SERDE '{}'", JSON_SERDE),
            RowFormatVariant::Serde,
        ),
        (
            format!(
                "ROW FORMAT SERDE '{}' WITH SERDEPROPERTIES ('separatorChar'=',')",
                OPEN_CSV_SERDE
            ),
            RowFormatVariant::SerdeWithProperties,
        ),
        (
            "ROW FORMAT DELIMITED FIELDS TERMINATED BY ','".to_string(),
            RowFormatVariant::Delimited,
        ),
        ("ROW FORMAT DELIMITED".to_string(), RowFormatVariant::Delimited),
    ];

    for (clause, expected) in cases {
        let parsed = ParsedDdl::parse(&ddl_with(&clause)).unwrap();
        let row_format = parsed.row_format.expect("row format should be present");
        assert_eq!(row_format.variant(), expected, "{}", clause);
    }
}

#[test]
fn test_delimited_subclauses_in_any_order() {
    let parsed = ParsedDdl::parse(&ddl_with(
        "ROW FORMAT DELIMITED LINES TERMINATED BY '\\n' MAP KEYS TERMINATED BY ':' FIELDS TERMINATED BY ','",
    ))
    .unwrap();

    match parsed.row_format {
        Some(RowFormat::Delimited(d)) => {
            assert_eq!(d.fields.as_deref(), Some(","));
            assert_eq!(d.map_keys.as_deref(), Some(":"));
            assert_eq!(d.lines.as_deref(), Some("\\n"));
            assert!(d.collection_items.is_none());
        }
        other => panic!("Expected delimited row format, got {:?}", other),
    }
}

#[test]
fn test_row_format_is_separate_from_stored_as() {
    let parsed = ParsedDdl::parse(&ddl_with(
        "ROW FORMAT DELIMITED FIELDS TERMINATED BY ',' STORED AS TEXTFILE",
    ))
    .unwrap();

    assert!(parsed.stored_as.is_some());
    match parsed.row_format {
        Some(RowFormat::Delimited(d)) => assert_eq!(d.fields.as_deref(), Some(",")),
        other => panic!("Expected delimited row format, got {:?}", other),
    }
}

// ============================================================================
// Comparison Tests
// ============================================================================

#[test]
fn test_csv_table_matches_catalog() {
    let ddl = ddl_with(
        "ROW FORMAT DELIMITED FIELDS TERMINATED BY ',' COLLECTION ITEMS TERMINATED BY '#'",
    );
    let table = text_table()
        .serde_param("field.delim", ",")
        .serde_param("colelction.delim", "#")
        .serde_param("serialization.format", ",")
        .build();

    let outcome = row_format_outcome(&ddl, &table);
    assert!(matches!(outcome, CheckOutcome::Same { .. }), "{}", outcome);
}

#[test]
fn test_changed_field_delimiter() {
    let ddl = ddl_with("ROW FORMAT DELIMITED FIELDS TERMINATED BY ','");
    let table = text_table()
        .serde_param("field.delim", "\t")
        .serde_param("serialization.format", "\t")
        .build();

    let mut observer = RecordingObserver::new();
    let verdict = detect_changes(&ddl, &table, &mut observer).unwrap();
    assert_eq!(verdict, ChangeVerdict::Changed(DriftCheck::RowFormat));
}

#[test]
fn test_pipe_delimiter_with_default_serialization() {
    let ddl = ddl_with("ROW FORMAT DELIMITED FIELDS TERMINATED BY '|'");
    let table = text_table().build();

    let outcome = row_format_outcome(&ddl, &table);
    assert!(matches!(outcome, CheckOutcome::DefaultEquivalent { .. }));
}

#[test]
fn test_escaped_by_alone_is_unchanged() {
    let ddl = ddl_with("ROW FORMAT DELIMITED ESCAPED BY '\\\\'");
    let table = text_table().build();
    assert!(!row_format_outcome(&ddl, &table).is_changed());
}

#[test]
fn test_null_format_compared_raw() {
    let ddl = ddl_with("ROW FORMAT DELIMITED FIELDS TERMINATED BY ',' NULL DEFINED AS ''");
    let table = text_table()
        .serde_param("field.delim", ",")
        .serde_param("serialization.null.format", "")
        .build();
    assert!(!row_format_outcome(&ddl, &table).is_changed());

    let table = text_table()
        .serde_param("field.delim", ",")
        .serde_param("serialization.null.format", "\\N")
        .build();
    assert!(row_format_outcome(&ddl, &table).is_changed());
}

#[test]
fn test_json_serde_library() {
    let ddl = ddl_with(&format!("ROW FORMAT SERDE '{}'", JSON_SERDE));

    let table = text_table().serde(JSON_SERDE).clear_serde_params().build();
    assert!(matches!(
        row_format_outcome(&ddl, &table),
        CheckOutcome::Same { .. }
    ));

    let table = text_table().serde(LAZY_SIMPLE_SERDE).build();
    assert!(row_format_outcome(&ddl, &table).is_changed());
}

#[test]
fn test_json_serde_without_row_format_clause() {
    let ddl = ddl_with("");
    let table = text_table().serde(JSON_SERDE).build();
    assert!(row_format_outcome(&ddl, &table).is_changed());
}

#[test]
fn test_serde_properties_with_injected_serialization_format() {
    let ddl = ddl_with(&format!(
        "ROW FORMAT SERDE '{}' WITH SERDEPROPERTIES ('separatorChar'=',', 'quoteChar'='\"')",
        OPEN_CSV_SERDE
    ));
    let table = text_table()
        .serde(OPEN_CSV_SERDE)
        .serde_param("separatorChar", ",")
        .serde_param("quoteChar", "\"")
        .build();

    let outcome = row_format_outcome(&ddl, &table);
    assert!(matches!(outcome, CheckOutcome::Same { .. }), "{}", outcome);

    let table = text_table()
        .serde(OPEN_CSV_SERDE)
        .serde_param("separatorChar", ";")
        .serde_param("quoteChar", "\"")
        .build();
    assert!(row_format_outcome(&ddl, &table).is_changed());
}

#[test]
fn test_serde_properties_against_missing_catalog_parameters() {
    let ddl = ddl_with(&format!(
        "ROW FORMAT SERDE '{}' WITH SERDEPROPERTIES ('separatorChar'=',')",
        OPEN_CSV_SERDE
    ));
    let table = text_table()
        .serde(OPEN_CSV_SERDE)
        .clear_serde_params()
        .build();
    assert!(row_format_outcome(&ddl, &table).is_changed());
}
