//! Frontmatter extraction: the `---`-fenced metadata block.
//!
//! Notes open with an optional fenced block of simple `key: value` lines
//! (quoted strings, inline `[a, b]` lists, plain scalars). The block is
//! split off the body here; YAML beyond that subset is out of scope.

use super::document::Frontmatter;
use super::CompileError;
use serde_json::Value;

/// Split a leading frontmatter block off the source text.
///
/// Returns the parsed frontmatter and the body that follows it. A source
/// without an opening fence is all body. An opening fence without a
/// closing one is malformed and fails compilation.
pub(crate) fn split_frontmatter(source: &str) -> Result<(Frontmatter, &str), CompileError> {
    let rest = match strip_opening_fence(source) {
        Some(rest) => rest,
        None => return Ok((Frontmatter::default(), source)),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_fence(line) {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((parse_block(block), body));
        }
        offset += line.len();
    }

    Err(CompileError::MalformedSource(
        "frontmatter fence opened but never closed".to_string(),
    ))
}

/// Strip the opening fence line, returning the text after it.
///
/// Returns `None` when the source does not start with a fence.
fn strip_opening_fence(source: &str) -> Option<&str> {
    let mut parts = source.splitn(2, '\n');
    let first = parts.next()?;
    if !is_fence(first) {
        return None;
    }
    Some(parts.next().unwrap_or(""))
}

/// Check whether a line is a `---` fence, tolerating surrounding
/// whitespace and CRLF endings.
fn is_fence(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']).trim() == "---"
}

/// Parse the lines between the fences into a `Frontmatter`.
///
/// Unknown lines (no colon) and `#` comments are skipped; parsing never
/// fails, it only fills in what it recognizes.
fn parse_block(block: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::default();

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (key, value) = match trimmed.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => continue,
        };
        if key.is_empty() {
            continue;
        }

        match key {
            "title" => {
                let title = strip_quotes(value);
                if !title.is_empty() {
                    frontmatter.title = Some(title.to_string());
                }
            }
            "date" => {
                let date = strip_quotes(value);
                if !date.is_empty() {
                    frontmatter.date = Some(date.to_string());
                }
            }
            "tags" => frontmatter.tags = parse_list(value),
            _ => {
                frontmatter
                    .extra
                    .insert(key.to_string(), parse_scalar(value));
            }
        }
    }

    frontmatter
}

/// Strip a single pair of matching single or double quotes.
fn strip_quotes(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 {
        let bytes = trimmed.as_bytes();
        let quoted = (bytes[0] == b'"' && bytes[trimmed.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[trimmed.len() - 1] == b'\'');
        if quoted {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

/// Parse an inline list: `[a, b]` or a bare comma-separated run.
fn parse_list(raw: &str) -> Vec<String> {
    let inner = raw.trim();
    let inner = inner
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(inner);

    inner
        .split(',')
        .map(|item| strip_quotes(item).to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parse a scalar value with light type inference.
///
/// Quoted values stay strings; otherwise booleans, integers, and inline
/// lists are recognized, and everything else falls back to a string.
fn parse_scalar(raw: &str) -> Value {
    let trimmed = raw.trim();
    let unquoted = strip_quotes(trimmed);
    if unquoted != trimmed {
        return Value::String(unquoted.to_string());
    }

    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        return Value::Array(
            parse_list(trimmed)
                .into_iter()
                .map(Value::String)
                .collect(),
        );
    }

    match trimmed {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(number) = trimmed.parse::<i64>() {
        return Value::Number(number.into());
    }

    Value::String(trimmed.to_string())
}
