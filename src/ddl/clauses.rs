//! Clause indexing and segmentation
//!
//! A clause is located by the first occurrence of its marker text. Present
//! markers, ordered by offset, cut the text into contiguous segments: each
//! segment runs from its marker to the next present marker, the last one to
//! the end of the text. The routine is generic over the marker catalog so the
//! ROW FORMAT sub-clauses reuse it unchanged.

/// Top-level clauses that may follow the column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    Comment,
    PartitionedBy,
    ClusteredBy,
    RowFormat,
    StoredAs,
    Location,
    TblProperties,
}

/// A marker in a clause catalog.
#[derive(Debug, Clone, Copy)]
pub struct ClauseMarker<K> {
    pub key: K,
    /// Normalized (lower-case) text the clause starts with
    pub text: &'static str,
    /// Only an occurrence at offset 0 counts
    pub leading_only: bool,
}

impl<K> ClauseMarker<K> {
    const fn new(key: K, text: &'static str) -> Self {
        Self {
            key,
            text,
            leading_only: false,
        }
    }
}

/// Top-level clause catalog, in detection priority order.
///
/// A table COMMENT must directly follow the column list; any later
/// `comment '` belongs to a PARTITIONED BY column.
pub const TABLE_CLAUSES: &[ClauseMarker<Clause>] = &[
    ClauseMarker {
        key: Clause::Comment,
        text: "comment '",
        leading_only: true,
    },
    ClauseMarker::new(Clause::PartitionedBy, "partitioned by"),
    ClauseMarker::new(Clause::ClusteredBy, "clustered by"),
    ClauseMarker::new(Clause::RowFormat, "row format"),
    ClauseMarker::new(Clause::StoredAs, "stored as"),
    ClauseMarker::new(Clause::Location, "location 's3:"),
    ClauseMarker::new(Clause::TblProperties, "tblproperties"),
];

/// First-occurrence offsets of every marker in a catalog.
#[derive(Debug, Clone)]
pub struct ClauseIndex<K> {
    /// (key, marker text, offset) in catalog order; `None` when absent
    entries: Vec<(K, &'static str, Option<usize>)>,
}

impl<K: Copy + PartialEq> ClauseIndex<K> {
    /// Locate every marker of `catalog` in `text`.
    pub fn build(text: &str, catalog: &[ClauseMarker<K>]) -> Self {
        let entries = catalog
            .iter()
            .map(|marker| {
                let offset = match text.find(marker.text) {
                    Some(0) => Some(0),
                    Some(_) if marker.leading_only => None,
                    found => found,
                };
                (marker.key, marker.text, offset)
            })
            .collect();

        Self { entries }
    }

    /// Offset of a clause, if present.
    pub fn offset(&self, key: K) -> Option<usize> {
        self.entries
            .iter()
            .find(|(k, _, _)| *k == key)
            .and_then(|(_, _, offset)| *offset)
    }

    pub fn contains(&self, key: K) -> bool {
        self.offset(key).is_some()
    }

    /// Present keys in catalog order.
    pub fn present(&self) -> impl Iterator<Item = K> + '_ {
        self.entries
            .iter()
            .filter(|(_, _, offset)| offset.is_some())
            .map(|(key, _, _)| *key)
    }

    /// Slice `text` into ordered segments. `text` must be the string the
    /// index was built from.
    pub fn segments<'a>(&self, text: &'a str) -> ClauseSegments<'a, K> {
        let mut present: Vec<(K, &'static str, usize)> = self
            .entries
            .iter()
            .filter_map(|(key, marker, offset)| offset.map(|o| (*key, *marker, o)))
            .collect();
        present.sort_by_key(|(_, _, offset)| *offset);

        let segments = present
            .iter()
            .enumerate()
            .map(|(i, (key, marker, start))| {
                let end = present
                    .get(i + 1)
                    .map(|(_, _, next)| *next)
                    .unwrap_or(text.len());
                ClauseSegment {
                    key: *key,
                    marker: *marker,
                    text: text[*start..end].trim(),
                }
            })
            .collect();

        ClauseSegments { segments }
    }
}

/// One clause's slice of the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseSegment<'a, K> {
    pub key: K,
    pub marker: &'static str,
    /// Segment text, starting with the marker
    pub text: &'a str,
}

impl<'a, K> ClauseSegment<'a, K> {
    /// Segment text after its marker.
    pub fn value(&self) -> &'a str {
        self.text.get(self.marker.len()..).unwrap_or("")
    }
}

/// Ordered, non-overlapping clause segments.
#[derive(Debug, Clone)]
pub struct ClauseSegments<'a, K> {
    segments: Vec<ClauseSegment<'a, K>>,
}

impl<'a, K: Copy + PartialEq> ClauseSegments<'a, K> {
    pub fn get(&self, key: K) -> Option<&ClauseSegment<'a, K>> {
        self.segments.iter().find(|segment| segment.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClauseSegment<'a, K>> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
