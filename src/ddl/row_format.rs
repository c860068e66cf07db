//! ROW FORMAT sub-clause segmentation and variant classification
//!
//! ```sql
//! ROW FORMAT SERDE 'serde.class' [WITH SERDEPROPERTIES ('k'='v', ...)]
//! ROW FORMAT DELIMITED
//!     [FIELDS TERMINATED BY 'c' [ESCAPED BY 'c']]
//!     [COLLECTION ITEMS TERMINATED BY 'c']
//!     [MAP KEYS TERMINATED BY 'c']
//!     [LINES TERMINATED BY 'c']
//!     [NULL DEFINED AS 'c']
//! ```

use super::clauses::{ClauseIndex, ClauseMarker, ClauseSegments};
use super::properties::{parenthesized_body, parse_property_list, PropertyMap};
use crate::error::DriftError;
use crate::util::trim_quotes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowFormatSubclause {
    FieldsTerminatedBy,
    EscapedBy,
    CollectionItemsTerminatedBy,
    MapKeysTerminatedBy,
    LinesTerminatedBy,
    NullDefinedAs,
    Serde,
    WithSerdeProperties,
    Delimited,
}

const fn marker(key: RowFormatSubclause, text: &'static str) -> ClauseMarker<RowFormatSubclause> {
    ClauseMarker {
        key,
        text,
        leading_only: false,
    }
}

/// ROW FORMAT sub-clause catalog, in classification order.
pub const ROW_FORMAT_SUBCLAUSES: &[ClauseMarker<RowFormatSubclause>] = &[
    marker(RowFormatSubclause::FieldsTerminatedBy, "fields terminated by '"),
    marker(RowFormatSubclause::EscapedBy, "escaped by '"),
    marker(
        RowFormatSubclause::CollectionItemsTerminatedBy,
        "collection items terminated by '",
    ),
    marker(RowFormatSubclause::MapKeysTerminatedBy, "map keys terminated by '"),
    marker(RowFormatSubclause::LinesTerminatedBy, "lines terminated by '"),
    marker(RowFormatSubclause::NullDefinedAs, "null defined as '"),
    marker(RowFormatSubclause::Serde, "serde '"),
    marker(RowFormatSubclause::WithSerdeProperties, "with serdeproperties ("),
    marker(RowFormatSubclause::Delimited, "delimited"),
];

/// Which of the three ROW FORMAT shapes a clause uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFormatVariant {
    Serde,
    SerdeWithProperties,
    Delimited,
}

/// Classify a ROW FORMAT clause from its sub-clause index.
///
/// SERDE does not end the walk because WITH SERDEPROPERTIES may follow;
/// WITH SERDEPROPERTIES and DELIMITED do.
pub fn classify(index: &ClauseIndex<RowFormatSubclause>) -> Option<RowFormatVariant> {
    let mut variant = None;

    for key in index.present() {
        match key {
            RowFormatSubclause::WithSerdeProperties => {
                return Some(RowFormatVariant::SerdeWithProperties)
            }
            RowFormatSubclause::Serde => variant = Some(RowFormatVariant::Serde),
            RowFormatSubclause::Delimited => return Some(RowFormatVariant::Delimited),
            _ => {}
        }
    }

    variant
}

/// Delimiter literals of a ROW FORMAT DELIMITED clause, as written in the
/// DDL (escapes not yet decoded).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delimiters {
    pub fields: Option<String>,
    pub escaped_by: Option<String>,
    pub collection_items: Option<String>,
    pub map_keys: Option<String>,
    pub lines: Option<String>,
    pub null_defined_as: Option<String>,
}

impl Delimiters {
    fn from_segments(segments: &ClauseSegments<'_, RowFormatSubclause>) -> Self {
        let literal = |key| {
            segments
                .get(key)
                .map(|segment| segment.value().trim_end_matches('\'').to_string())
        };

        Self {
            fields: literal(RowFormatSubclause::FieldsTerminatedBy),
            escaped_by: literal(RowFormatSubclause::EscapedBy),
            collection_items: literal(RowFormatSubclause::CollectionItemsTerminatedBy),
            map_keys: literal(RowFormatSubclause::MapKeysTerminatedBy),
            lines: literal(RowFormatSubclause::LinesTerminatedBy),
            null_defined_as: literal(RowFormatSubclause::NullDefinedAs),
        }
    }

    /// `ROW FORMAT DELIMITED` with no sub-properties at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_none()
            && self.escaped_by.is_none()
            && self.collection_items.is_none()
            && self.map_keys.is_none()
            && self.lines.is_none()
            && self.null_defined_as.is_none()
    }
}

/// A parsed ROW FORMAT clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFormat {
    Serde {
        library: String,
        /// Present for `WITH SERDEPROPERTIES`
        properties: Option<PropertyMap>,
    },
    Delimited(Delimiters),
}

impl RowFormat {
    pub fn variant(&self) -> RowFormatVariant {
        match self {
            RowFormat::Serde {
                properties: Some(_),
                ..
            } => RowFormatVariant::SerdeWithProperties,
            RowFormat::Serde { .. } => RowFormatVariant::Serde,
            RowFormat::Delimited(_) => RowFormatVariant::Delimited,
        }
    }
}

/// Parse the text of a ROW FORMAT segment.
pub fn parse_row_format(segment: &str) -> Result<RowFormat, DriftError> {
    let index = ClauseIndex::build(segment, ROW_FORMAT_SUBCLAUSES);
    let segments = index.segments(segment);

    let variant = classify(&index).ok_or_else(|| DriftError::UnknownRowFormat {
        segment: segment.to_string(),
    })?;

    let row_format = match variant {
        RowFormatVariant::Serde | RowFormatVariant::SerdeWithProperties => {
            let library = segments
                .get(RowFormatSubclause::Serde)
                .and_then(|serde| serde.value().split_whitespace().next())
                .map(|token| trim_quotes(token).to_string())
                .unwrap_or_default();
            let properties = segments
                .get(RowFormatSubclause::WithSerdeProperties)
                .map(|props| parse_property_list(parenthesized_body(props.text)));
            RowFormat::Serde {
                library,
                properties,
            }
        }
        RowFormatVariant::Delimited => RowFormat::Delimited(Delimiters::from_segments(&segments)),
    };

    Ok(row_format)
}
