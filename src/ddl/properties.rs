//! `'key'='value'` property lists (SERDEPROPERTIES, TBLPROPERTIES)

use std::collections::BTreeMap;

use crate::util::decode_literal;

/// Unordered key/value properties. A repeated key keeps its last value.
pub type PropertyMap = BTreeMap<String, String>;

/// Parse the inside of a property list, e.g. `'a'='1', 'b'='2'`.
///
/// Only single-quoted literals are recognised; literals are paired up in
/// order and their escapes decoded. A trailing unpaired key is dropped.
pub fn parse_property_list(text: &str) -> PropertyMap {
    quoted_literals(text)
        .chunks_exact(2)
        .map(|pair| (decode_literal(pair[0]), decode_literal(pair[1])))
        .collect()
}

/// Text inside `( ... )` of a clause such as `tblproperties ('a'='b')`:
/// from the first `(` to the last `)`.
pub fn parenthesized_body(segment: &str) -> &str {
    let Some(open) = segment.find('(') else {
        return "";
    };
    let body = &segment[open + 1..];
    match body.rfind(')') {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// Raw contents of every single-quoted literal, honouring `\'` escapes.
fn quoted_literals(text: &str) -> Vec<&str> {
    let mut literals = Vec::new();
    let mut start: Option<usize> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        match start {
            None => {
                if c == '\'' {
                    start = Some(i + 1);
                }
            }
            Some(s) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '\'' {
                    literals.push(&text[s..i]);
                    start = None;
                }
            }
        }
    }

    literals
}
