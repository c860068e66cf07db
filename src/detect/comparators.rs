//! Clause comparators
//!
//! Each comparator covers all four presence combinations of its clause
//! (DDL yes/no, metadata yes/no) and decides which differences are only
//! catalog defaults.

use super::observer::CheckOutcome;
use super::DriftCheck;
use crate::ddl::{Delimiters, FileFormat, ParsedDdl, PropertyMap, RowFormat, StoredAs};
use crate::metadata::{filter_allow_listed, CanonicalMetadata, MetadataDelimiters};
use crate::util::decode_literal;

/// Serde libraries under this prefix are the ones the catalog assigns when a
/// DDL has no ROW FORMAT clause.
const DEFAULT_SERDE_PREFIX: &str = "org.apache.";

/// FIELDS TERMINATED BY value that matches a catalog default of
/// `serialization.format=1`.
const DEFAULT_FIELD_DELIMITER: &str = "|";

const SERIALIZATION_FORMAT: &str = "serialization.format";

pub(super) fn evaluate(check: DriftCheck, ddl: &ParsedDdl, meta: &CanonicalMetadata) -> CheckOutcome {
    match check {
        DriftCheck::Columns => columns(ddl, meta),
        DriftCheck::TableComment => compare_optional(ddl.comment.as_deref(), meta.comment.as_deref()),
        DriftCheck::Partitioning => compare_optional(
            ddl.partitioned_by.as_deref(),
            meta.partition_keys.as_deref(),
        ),
        DriftCheck::Clustering => {
            compare_optional(ddl.clustered_by.as_deref(), meta.bucketing.as_deref())
        }
        DriftCheck::RowFormat => row_format(ddl.row_format.as_ref(), meta),
        DriftCheck::FileFormat => file_format(ddl.stored_as.as_ref(), meta),
        DriftCheck::Location => location(&ddl.location, meta),
        DriftCheck::TblProperties => tblproperties(ddl.tblproperties.as_ref(), meta),
    }
}

fn compare_optional(ddl: Option<&str>, metadata: Option<&str>) -> CheckOutcome {
    match (ddl, metadata) {
        (None, None) => CheckOutcome::same("absent in both"),
        (Some(d), Some(m)) if d == m => CheckOutcome::same(d),
        (d, m) => CheckOutcome::changed(d, m),
    }
}

fn columns(ddl: &ParsedDdl, meta: &CanonicalMetadata) -> CheckOutcome {
    if ddl.columns == meta.columns {
        CheckOutcome::same(ddl.columns.as_str())
    } else {
        CheckOutcome::changed(Some(&ddl.columns), Some(&meta.columns))
    }
}

fn location(ddl_location: &str, meta: &CanonicalMetadata) -> CheckOutcome {
    compare_optional(Some(ddl_location), meta.location.as_deref())
}

// ---------------------------------------------------------------------------
// ROW FORMAT
// ---------------------------------------------------------------------------

fn row_format(ddl: Option<&RowFormat>, meta: &CanonicalMetadata) -> CheckOutcome {
    match ddl {
        None => implicit_row_format(meta),
        Some(RowFormat::Serde {
            library,
            properties,
        }) => serde_row_format(library, properties.as_ref(), meta),
        Some(RowFormat::Delimited(delimiters)) => delimited_row_format(delimiters, meta),
    }
}

/// No ROW FORMAT in the DDL: the catalog may only carry its own defaults.
fn implicit_row_format(meta: &CanonicalMetadata) -> CheckOutcome {
    let library = meta.serde_library.as_deref().unwrap_or_default();

    if !library.starts_with(DEFAULT_SERDE_PREFIX) {
        return CheckOutcome::changed(None, meta.serde_library.as_deref());
    }

    if meta.delimiters.any() {
        return CheckOutcome::changed(None, Some(&render_delimiters(&meta.delimiters)));
    }

    CheckOutcome::default_equivalent(format!("default serde library {}", library))
}

fn serde_row_format(
    library: &str,
    properties: Option<&PropertyMap>,
    meta: &CanonicalMetadata,
) -> CheckOutcome {
    if let Some(ddl_properties) = properties {
        if meta.serde_parameters.is_empty() {
            return CheckOutcome::changed(Some(&render_map(ddl_properties)), None);
        }

        let mut expected = ddl_properties.clone();
        if meta.serde_parameters.contains_key(SERIALIZATION_FORMAT) {
            expected
                .entry(SERIALIZATION_FORMAT.to_string())
                .or_insert_with(|| "1".to_string());
        }

        if expected != meta.serde_parameters {
            return CheckOutcome::changed(
                Some(&render_map(&expected)),
                Some(&render_map(&meta.serde_parameters)),
            );
        }
    }

    let meta_library = meta.serde_library.as_deref().map(str::to_lowercase);
    match meta_library {
        Some(meta_library) if meta_library == library => CheckOutcome::same(library),
        other => CheckOutcome::changed(Some(library), other.as_deref()),
    }
}

fn delimited_row_format(ddl: &Delimiters, meta: &CanonicalMetadata) -> CheckOutcome {
    let md = &meta.delimiters;

    if ddl.is_empty() {
        return if md.has_default_serialization() {
            CheckOutcome::default_equivalent("serialization.format=1")
        } else {
            CheckOutcome::changed(
                Some("delimited"),
                Some(&format!(
                    "{}={}",
                    SERIALIZATION_FORMAT,
                    md.serialization_format.as_deref().unwrap_or("absent")
                )),
            )
        };
    }

    let mut compared = Vec::new();
    let mut defaulted = false;

    if let Some(fields) = &ddl.fields {
        let fields = decode_literal(fields);
        match &ddl.escaped_by {
            Some(escaped) => {
                let escaped = decode_literal(escaped);
                if md.field.as_deref() != Some(fields.as_str())
                    || md.escape.as_deref() != Some(escaped.as_str())
                {
                    return CheckOutcome::changed(
                        Some(&format!("field.delim={:?} escape.delim={:?}", fields, escaped)),
                        Some(&format!(
                            "field.delim={:?} escape.delim={:?}",
                            md.field, md.escape
                        )),
                    );
                }
                compared.push("field.delim");
                compared.push("escape.delim");
            }
            None if fields == DEFAULT_FIELD_DELIMITER && md.has_default_serialization() => {
                defaulted = true;
            }
            None => {
                if let Some(outcome) = delimiter_mismatch("field.delim", &fields, md.field.as_deref()) {
                    return outcome;
                }
                compared.push("field.delim");
            }
        }
    }

    let single: [(&str, Option<&String>, Option<&str>); 4] = [
        (
            "colelction.delim",
            ddl.collection_items.as_ref(),
            md.collection.as_deref(),
        ),
        ("mapkey.delim", ddl.map_keys.as_ref(), md.map_key.as_deref()),
        ("line.delim", ddl.lines.as_ref(), md.line.as_deref()),
        (
            "serialization.null.format",
            ddl.null_defined_as.as_ref(),
            md.null_format.as_deref(),
        ),
    ];

    for (key, ddl_value, meta_value) in single {
        if let Some(ddl_value) = ddl_value {
            if let Some(outcome) = delimiter_mismatch(key, &decode_literal(ddl_value), meta_value) {
                return outcome;
            }
            compared.push(key);
        }
    }

    if defaulted {
        CheckOutcome::default_equivalent(format!(
            "fields terminated by '{}' with serialization.format=1",
            DEFAULT_FIELD_DELIMITER
        ))
    } else {
        CheckOutcome::same(compared.join(", "))
    }
}

fn delimiter_mismatch(key: &str, ddl_value: &str, meta_value: Option<&str>) -> Option<CheckOutcome> {
    (meta_value != Some(ddl_value)).then(|| {
        CheckOutcome::changed(
            Some(&format!("{}={:?}", key, ddl_value)),
            Some(&format!("{}={:?}", key, meta_value)),
        )
    })
}

fn render_delimiters(md: &MetadataDelimiters) -> String {
    let pairs = [
        ("escape.delim", &md.escape),
        ("field.delim", &md.field),
        ("colelction.delim", &md.collection),
        ("mapkey.delim", &md.map_key),
        ("line.delim", &md.line),
        ("serialization.null.format", &md.null_format),
    ];
    pairs
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={:?}", key, v)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_map(map: &PropertyMap) -> String {
    map.iter()
        .map(|(key, value)| format!("'{}'='{}'", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// STORED AS
// ---------------------------------------------------------------------------

fn file_format(ddl: Option<&StoredAs>, meta: &CanonicalMetadata) -> CheckOutcome {
    let meta_input = meta.input_format.as_deref();

    match ddl {
        None => {
            let text_input = FileFormat::TextFile.input_format();
            if meta_input == Some(text_input) {
                CheckOutcome::default_equivalent(format!("implicit textfile ({})", text_input))
            } else {
                CheckOutcome::changed(None, meta_input)
            }
        }
        Some(StoredAs::Named(format)) => {
            if meta_input == Some(format.input_format()) {
                CheckOutcome::same(format.keyword())
            } else {
                // Name the catalog side by keyword when it is one of ours
                let meta_format = meta_input
                    .and_then(FileFormat::from_input_format)
                    .map(|known| known.keyword())
                    .or(meta_input);
                CheckOutcome::changed(Some(format.keyword()), meta_format)
            }
        }
        Some(StoredAs::Explicit {
            input_format,
            output_format,
        }) => {
            if meta_input != Some(input_format.as_str()) {
                return CheckOutcome::changed(Some(input_format), meta_input);
            }
            match output_format {
                Some(output) if meta.output_format.as_deref() != Some(output.as_str()) => {
                    CheckOutcome::changed(Some(output), meta.output_format.as_deref())
                }
                _ => CheckOutcome::same(input_format.as_str()),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TBLPROPERTIES
// ---------------------------------------------------------------------------

fn tblproperties(ddl: Option<&PropertyMap>, meta: &CanonicalMetadata) -> CheckOutcome {
    let ddl_properties = ddl.map(filter_allow_listed).unwrap_or_default();
    let meta_properties = &meta.properties;

    match (ddl_properties.is_empty(), meta_properties.is_empty()) {
        (true, true) => CheckOutcome::same("no allow-listed properties"),
        (true, false) => CheckOutcome::changed(None, Some(&render_map(meta_properties))),
        (false, true) => CheckOutcome::changed(Some(&render_map(&ddl_properties)), None),
        (false, false) if &ddl_properties == meta_properties => {
            CheckOutcome::same(render_map(&ddl_properties))
        }
        (false, false) => CheckOutcome::changed(
            Some(&render_map(&ddl_properties)),
            Some(&render_map(meta_properties)),
        ),
    }
}
