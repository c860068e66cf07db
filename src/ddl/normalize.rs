//! DDL text normalization
//!
//! Every later stage works on substring offsets, so the DDL is first reduced
//! to a single lower-case line with one space between tokens and no space
//! before `,` or `)`.

use once_cell::sync::Lazy;
use regex::Regex;

/// `--` comment through end of line, together with the blanks in front of it.
/// The newline itself is kept so the surrounding lines stay separated.
static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)[ \t]*--.*$").expect("Invalid line comment regex"));

/// Remove every `--` line comment from `text`.
///
/// Quoted literals are not tracked, so a `--` inside a comment string is
/// stripped as well.
pub fn strip_comments(text: &str) -> String {
    LINE_COMMENT.replace_all(text, "").into_owned()
}

/// Normalize raw DDL text for clause segmentation.
///
/// Steps, in order:
/// 1. strip `--` line comments
/// 2. newlines and tabs become spaces; carriage returns, backticks and
///    semicolons are dropped
/// 3. collapse runs of spaces and drop a space in front of `,` or `)` until
///    the text no longer changes
/// 4. lower-case
pub fn normalize_ddl(text: &str) -> String {
    let stripped = strip_comments(text);

    let mut normalized: String = stripped
        .chars()
        .filter_map(|c| match c {
            '\n' | '\t' => Some(' '),
            '\r' | '`' | ';' => None,
            other => Some(other),
        })
        .collect();

    loop {
        let collapsed = normalized
            .replace("  ", " ")
            .replace(" ,", ",")
            .replace(" )", ")");
        if collapsed == normalized {
            break;
        }
        normalized = collapsed;
    }

    normalized.to_lowercase()
}

/// Collapse double spaces and spaces before commas, the way catalog-rendered
/// column lists are tidied before comparison.
pub fn collapse_spaces(text: &str) -> String {
    let mut collapsed = text.to_string();
    while collapsed.contains("  ") || collapsed.contains(" ,") {
        collapsed = collapsed.replace("  ", " ").replace(" ,", ",");
    }
    collapsed
}
