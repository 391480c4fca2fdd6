//! Flat `key=value` property text
//!
//! One property per logical line. `#` and `!` start comments, `=`, `:` or
//! whitespace separate key from value, and a trailing backslash joins the next
//! line. Backslash escapes `\t`, `\n`, `\r`, `\f`, `\uXXXX` and escaped
//! separators are honoured; a malformed `\u` escape is an error.

use super::PropertyMap;
use crate::error::{PropertyError, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Join continuation lines and drop blanks and comments.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in text.lines() {
        let line = raw.trim_start();
        let mut current = match pending.take() {
            Some(mut acc) => {
                acc.push_str(line);
                acc
            }
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                line.to_string()
            }
        };

        // An odd number of trailing backslashes continues the line.
        let trailing = current.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            current.pop();
            pending = Some(current);
        } else {
            lines.push(current);
        }
    }
    if let Some(rest) = pending {
        lines.push(rest);
    }
    lines
}

/// Four hex digits after `\u`, as one UTF-16 unit.
fn utf16_unit(chars: &mut std::str::Chars<'_>) -> Option<u16> {
    let mut unit = 0u16;
    for _ in 0..4 {
        let digit = chars.next()?.to_digit(16)?;
        unit = unit * 16 + digit as u16;
    }
    Some(unit)
}

fn unescape(text: &str, line: &str) -> Result<String> {
    let malformed = || PropertyError::MalformedEscape { line: line.to_string() };
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let mut units = vec![utf16_unit(&mut chars).ok_or_else(malformed)?];
                // A high surrogate must be followed by its low half.
                if (0xD800..0xDC00).contains(&units[0]) {
                    let rest = chars.as_str();
                    if !rest.starts_with("\\u") {
                        return Err(malformed());
                    }
                    chars.nth(1);
                    units.push(utf16_unit(&mut chars).ok_or_else(malformed)?);
                }
                let decoded = String::from_utf16(&units).map_err(|_| malformed())?;
                out.push_str(&decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn split_line(line: &str) -> Result<(String, String)> {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start();
    // Whitespace before the separator: "key = value"
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start();
    }
    Ok((unescape(key, line)?, unescape(rest.trim_end(), line)?))
}

/// Parse property text into a flat map; later duplicates replace earlier ones.
pub fn parse_properties(text: &str) -> Result<PropertyMap> {
    logical_lines(text).iter().map(|line| split_line(line)).collect()
}

/// Read a property file. A missing file is `Ok(None)`.
pub fn read_properties_file(path: &Path) -> Result<Option<PropertyMap>> {
    match fs::read_to_string(path) {
        Ok(content) => parse_properties(&content).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PropertyError::Io { path: path.to_path_buf(), source }),
    }
}
