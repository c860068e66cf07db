//! Shared utility helpers.

use std::path::Path;

use encoding_rs::WINDOWS_1252;

/// Read a text file, trying UTF-8 first, then Windows-1252 as fallback.
/// A leading UTF-8 BOM is removed.
pub fn read_text_file(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => {
            // DDL scripts saved from Windows editors are frequently 1252-encoded
            let bytes = err.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "File contains invalid characters",
                ));
            }
            decoded.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Trim every leading and trailing single quote.
#[inline]
pub fn trim_quotes(value: &str) -> &str {
    value.trim_matches('\'')
}

/// Decode backslash escapes in a single-quoted DDL literal.
///
/// Recognises the JSON escape set (`\t`, `\n`, `\r`, `\b`, `\f`, `\\`, `\/`,
/// `\"`, `\uXXXX`) plus `\'`. Unknown sequences are kept verbatim so that
/// Hive octal escapes such as `\001` survive untouched.
pub fn decode_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('t') => push_escaped(&mut out, &mut chars, '\t'),
            Some('n') => push_escaped(&mut out, &mut chars, '\n'),
            Some('r') => push_escaped(&mut out, &mut chars, '\r'),
            Some('b') => push_escaped(&mut out, &mut chars, '\u{0008}'),
            Some('f') => push_escaped(&mut out, &mut chars, '\u{000C}'),
            Some('\\') => push_escaped(&mut out, &mut chars, '\\'),
            Some('/') => push_escaped(&mut out, &mut chars, '/'),
            Some('"') => push_escaped(&mut out, &mut chars, '"'),
            Some('\'') => push_escaped(&mut out, &mut chars, '\''),
            Some('u') => {
                let hex: String = chars.clone().skip(1).take(4).collect();
                match (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                {
                    Some(decoded) => {
                        out.push(decoded);
                        for _ in 0..5 {
                            chars.next();
                        }
                    }
                    None => out.push('\\'),
                }
            }
            _ => out.push('\\'),
        }
    }

    out
}

fn push_escaped(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    decoded: char,
) {
    out.push(decoded);
    chars.next();
}
