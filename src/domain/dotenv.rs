//! Dotenv file parsing
//!
//! Accepts `KEY=value` and `export KEY=value` lines. Blank lines and `#`
//! comments are skipped; values lose surrounding quotes and trailing comments.
//! A quoted value may span several lines. Lines that are not assignments are
//! skipped with a warning, since the file is often shared with other tools.

use std::collections::BTreeMap;

use tracing::warn;

/// Parsed `.env` content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotenvFile {
    pub variables: BTreeMap<String, String>,
}

impl DotenvFile {
    /// Parse dotenv content. Later assignments to the same key win.
    pub fn parse(content: &str) -> Self {
        let mut variables = BTreeMap::new();
        let mut lines = content.lines().enumerate();

        while let Some((idx, line)) = lines.next() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let rest = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, raw)) = rest.split_once('=') else {
                warn!(line = idx + 1, "skipping dotenv line without '='");
                continue;
            };

            let mut value = raw.trim().to_string();
            if let Some(quote) = open_quote(&value) {
                let mut closed = false;
                for (_, next) in lines.by_ref() {
                    value.push('\n');
                    value.push_str(next);
                    if next.contains(quote) {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    warn!(line = idx + 1, "skipping unterminated quoted dotenv value");
                    continue;
                }
            }

            let key = key.trim();
            if key.is_empty() || key.chars().any(char::is_whitespace) {
                warn!(line = idx + 1, key, "skipping dotenv line with invalid key");
                continue;
            }
            variables.insert(key.to_string(), parse_value(&value));
        }

        Self { variables }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// Quote character of a value that opens a quote without closing it.
fn open_quote(value: &str) -> Option<char> {
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    (!value[1..].contains(quote)).then_some(quote)
}

/// Strip trailing comment and surrounding quotes from a raw value.
fn parse_value(raw: &str) -> String {
    strip_quotes(strip_trailing_comment(raw))
}

/// Strip trailing comment from a value, respecting quotes.
/// `'value'  # comment` → `'value'`
/// `'val#ue'` → `'val#ue'`
fn strip_trailing_comment(s: &str) -> &str {
    let s = s.trim();
    let mut in_single_quote = false;
    let mut in_double_quote = false;

    for (i, b) in s.bytes().enumerate() {
        match b {
            b'\'' if !in_double_quote => in_single_quote = !in_single_quote,
            b'"' if !in_single_quote => in_double_quote = !in_double_quote,
            b'#' if !in_single_quote && !in_double_quote => {
                return s[..i].trim_end();
            }
            _ => {}
        }
    }
    s
}

fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        return s[1..s.len() - 1].to_string();
    }
    s.to_string()
}
