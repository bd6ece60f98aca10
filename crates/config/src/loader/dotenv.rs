//! Dotenv payload parsing.
//!
//! Responsibilities:
//! - Split a payload into records, one per `KEY=value` entry (quoted values may span lines).
//! - Keep bare `KEY` lines as keys without a value.
//! - Expand `${NAME}` and `${NAME:-default}` outside single quotes; every other `$` is literal.
//!
//! Does NOT handle:
//! - Nesting or JSON coercion (see `crate::normalizer`).
//!
//! Invariants:
//! - `${NAME}` resolves against earlier keys in the same payload first, then the process environment.
//! - Errors name the line and position, never the record contents.

use std::collections::HashMap;

/// A record that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordError {
    pub line: usize,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

#[derive(Debug)]
struct Record {
    line: usize,
    text: String,
}

/// Parse a dotenv payload into ordered `(key, value)` pairs.
///
/// Bare keys yield `None`; `KEY=` yields an empty string.
pub(crate) fn parse(payload: &str) -> Result<Vec<(String, Option<String>)>, RecordError> {
    let payload = payload.strip_prefix('\u{feff}').unwrap_or(payload);
    let mut parsed: Vec<(String, Option<String>)> = Vec::new();
    let mut seen: HashMap<String, Option<String>> = HashMap::new();

    for record in split_records(payload) {
        if let Some(key) = bare_key(&record.text) {
            seen.insert(key.to_string(), None);
            parsed.push((key.to_string(), None));
            continue;
        }

        let rewritten = rewrite_record(&record.text, &seen);
        match dotenvy::from_read_iter(rewritten.as_bytes()).next() {
            Some(Ok((key, value))) => {
                seen.insert(key.clone(), Some(value.clone()));
                parsed.push((key, Some(value)));
            }
            Some(Err(dotenvy::Error::LineParse(_, position))) => {
                return Err(RecordError {
                    line: record.line,
                    position,
                });
            }
            Some(Err(_)) => {
                return Err(RecordError {
                    line: record.line,
                    position: 0,
                });
            }
            None => {}
        }
    }

    Ok(parsed)
}

/// Group lines into records, joining lines while a quote is open.
fn split_records(payload: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut current: Option<Record> = None;
    let mut quote = Quote::None;

    for (index, line) in payload.split_inclusive('\n').enumerate() {
        if current.is_none() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
        }

        let record = current.get_or_insert_with(|| Record {
            line: index + 1,
            text: String::new(),
        });
        record.text.push_str(line);
        quote = scan_quotes(line, quote);

        if quote == Quote::None {
            records.extend(current.take());
        }
    }

    // An unterminated quote is left for dotenvy to report.
    records.extend(current);
    records
}

/// Quote state after `line`, starting from `quote`.
fn scan_quotes(line: &str, mut quote: Quote) -> Quote {
    let mut chars = line.chars();
    let mut after_space = false;

    while let Some(c) = chars.next() {
        match quote {
            Quote::Single => {
                if c == '\'' {
                    quote = Quote::None;
                }
            }
            Quote::Double => match c {
                '\\' => {
                    chars.next();
                }
                '"' => quote = Quote::None,
                _ => {}
            },
            Quote::None => match c {
                '#' if after_space => break,
                '\\' => {
                    chars.next();
                }
                '\'' => quote = Quote::Single,
                '"' => quote = Quote::Double,
                _ => {}
            },
        }
        after_space = c.is_whitespace();
    }

    quote
}

/// The key of a `KEY` or `export KEY` record without `=`, if `text` is one.
fn bare_key(text: &str) -> Option<&str> {
    let line = text.trim();
    let line = line
        .strip_prefix("export")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map_or(line, str::trim_start);

    let end = line.find(char::is_whitespace).unwrap_or(line.len());
    let (key, rest) = line.split_at(end);
    let rest = rest.trim_start();

    (is_key(key) && (rest.is_empty() || rest.starts_with('#'))).then_some(key)
}

fn is_key(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Rewrite a record so dotenvy reads every `$` literally, with `${...}` already expanded.
fn rewrite_record(text: &str, seen: &HashMap<String, Option<String>>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote = Quote::None;
    let mut after_space = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];

        match (quote, c) {
            (Quote::Single, '\'') => {
                quote = Quote::None;
                out.push(c);
            }
            (Quote::Single, _) => out.push(c),
            (Quote::None, '#') if after_space => {
                out.push(c);
                out.push_str(rest);
                break;
            }
            (Quote::None | Quote::Double, '\\') => {
                out.push(c);
                if let Some(next) = rest.chars().next() {
                    out.push(next);
                    rest = &rest[next.len_utf8()..];
                }
            }
            (Quote::None, '\'') => {
                quote = Quote::Single;
                out.push(c);
            }
            (Quote::None, '"') => {
                quote = Quote::Double;
                out.push(c);
            }
            (Quote::Double, '"') => {
                quote = Quote::None;
                out.push(c);
            }
            (Quote::None | Quote::Double, '$') => match expansion(rest) {
                Some((name, default, consumed)) => {
                    let value = resolve(name, default, seen);
                    if quote == Quote::Double {
                        push_double_quoted(&mut out, &value);
                    } else {
                        push_single_quoted(&mut out, &value);
                    }
                    rest = &rest[consumed..];
                }
                None => out.push_str("\\$"),
            },
            _ => out.push(c),
        }
        after_space = c.is_whitespace();
    }

    out
}

/// Parse `{NAME}` or `{NAME:-default}` at the start of `rest`.
///
/// Returns the name, the optional default and the number of bytes consumed.
fn expansion(rest: &str) -> Option<(&str, Option<&str>, usize)> {
    let body = rest.strip_prefix('{')?;
    let end = body.find('}')?;
    let inner = &body[..end];
    let (name, default) = match inner.split_once(":-") {
        Some((name, default)) => (name, Some(default)),
        None => (inner, None),
    };
    if name.is_empty() || name.contains(':') {
        return None;
    }
    Some((name, default, end + 2))
}

fn resolve(name: &str, default: Option<&str>, seen: &HashMap<String, Option<String>>) -> String {
    match seen.get(name) {
        Some(value) => value.clone().unwrap_or_default(),
        None => std::env::var(name)
            .ok()
            .or_else(|| default.map(str::to_string))
            .unwrap_or_default(),
    }
}

fn push_single_quoted(out: &mut String, value: &str) {
    out.push('\'');
    out.push_str(&value.replace('\'', "'\\''"));
    out.push('\'');
}

fn push_double_quoted(out: &mut String, value: &str) {
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
}
