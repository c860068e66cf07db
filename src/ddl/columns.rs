//! Balanced-parenthesis extraction of the column list
//!
//! The column list is the first outermost `( ... )` group of the statement.
//! Nested groups such as `decimal(10,2)` or `struct<a:decimal(5,1)>` stay
//! inside it.

use crate::error::DriftError;

/// A CREATE TABLE statement split at its column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSplit<'a> {
    /// Text between the outermost parentheses, trimmed
    pub columns: &'a str,
    /// Everything after the closing parenthesis, trimmed
    pub remainder: &'a str,
}

/// Split normalized DDL into its column list and the remaining clause text.
///
/// Scanning stops as soon as the first outermost group closes, so later
/// groups (PARTITIONED BY, TBLPROPERTIES) are never inspected here.
pub fn split_columns(text: &str) -> Result<ColumnSplit<'_>, DriftError> {
    let mut open_stack: Vec<usize> = Vec::new();
    let mut outermost: Option<(usize, usize)> = None;

    for (offset, c) in text.char_indices() {
        match c {
            '(' => open_stack.push(offset),
            ')' => {
                let open = open_stack
                    .pop()
                    .ok_or(DriftError::UnbalancedParentheses { offset })?;
                if open_stack.is_empty() {
                    outermost = Some((open, offset));
                    break;
                }
            }
            _ => {}
        }
    }

    if let Some(&offset) = open_stack.last() {
        return Err(DriftError::UnbalancedParentheses { offset });
    }

    let (open, close) = outermost.ok_or(DriftError::MissingColumnList)?;

    Ok(ColumnSplit {
        columns: text[open + 1..close].trim(),
        remainder: text[close + 1..].trim(),
    })
}
