//! Per-locale message tables with root fallback.

use super::locale::Locale;
use crate::error::L10nError;
use std::collections::HashMap;
use tracing::warn;

const ROOT: &str = "";

/// Root (English) descriptions shipped with CIX.
const BUILTIN_ROOT: &[(&str, &str)] = &[
    ("ball.failed", "Failed"),
    ("ball.unstable", "Unstable"),
    ("ball.success", "Success"),
    ("ball.pending", "Pending"),
    ("ball.disabled", "Disabled"),
    ("ball.aborted", "Aborted"),
    ("ball.not_built", "Not built"),
    ("ball.in_progress", "In progress"),
    ("icon.folder", "Folder"),
    ("icon.health", "Build stability: {0} out of the last {1} builds failed."),
];

const BUILTIN_DE: &[(&str, &str)] = &[
    ("ball.failed", "Fehlgeschlagen"),
    ("ball.unstable", "Instabil"),
    ("ball.success", "Erfolgreich"),
    ("ball.pending", "Ausstehend"),
    ("ball.disabled", "Deaktiviert"),
    ("ball.aborted", "Abgebrochen"),
    ("ball.not_built", "Nicht gebaut"),
    ("ball.in_progress", "In Arbeit"),
    ("icon.folder", "Ordner"),
    ("icon.health", "Build-Stabilität: {0} der letzten {1} Builds schlugen fehl."),
];

const BUILTIN_FR: &[(&str, &str)] = &[
    ("ball.failed", "Échec"),
    ("ball.unstable", "Instable"),
    ("ball.success", "Succès"),
    ("ball.pending", "En attente"),
    ("ball.disabled", "Désactivé"),
    ("ball.aborted", "Annulé"),
    ("ball.not_built", "Non construit"),
    ("ball.in_progress", "En cours"),
    ("icon.folder", "Dossier"),
];

const BUILTIN_JA: &[(&str, &str)] = &[
    ("ball.failed", "失敗"),
    ("ball.unstable", "不安定"),
    ("ball.success", "成功"),
    ("ball.pending", "保留"),
    ("ball.disabled", "無効"),
    ("ball.aborted", "中止"),
    ("ball.not_built", "未ビルド"),
    ("ball.in_progress", "実行中"),
    ("icon.folder", "フォルダ"),
];

/// Message templates keyed by locale tag, then by message key.
///
/// Lookup for `de_AT` tries `de_AT`, then `de`, then the root table.
/// Templates use `{0}`-style placeholders; text between single quotes is
/// literal and `''` is a quote character.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    tables: HashMap<String, HashMap<String, String>>,
}

impl MessageBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle preloaded with the stock status descriptions.
    pub fn builtin() -> Self {
        let mut bundle = Self::new();
        for (tag, entries) in [
            (ROOT, BUILTIN_ROOT),
            ("de", BUILTIN_DE),
            ("fr", BUILTIN_FR),
            ("ja", BUILTIN_JA),
        ] {
            let table = bundle.tables.entry(tag.to_string()).or_default();
            for (key, template) in entries {
                table.insert((*key).to_string(), (*template).to_string());
            }
        }
        bundle
    }

    /// Add or replace one template. `None` targets the root table.
    pub fn insert(&mut self, locale: Option<&Locale>, key: &str, template: &str) {
        self.tables
            .entry(table_tag(locale))
            .or_default()
            .insert(key.to_string(), template.to_string());
    }

    /// Merge a `.properties` document into the table for `locale`.
    pub fn load_properties(&mut self, locale: Option<&Locale>, text: &str) -> Result<usize, L10nError> {
        let entries = parse_properties(text)?;
        let count = entries.len();
        let table = self.tables.entry(table_tag(locale)).or_default();
        table.extend(entries);
        Ok(count)
    }

    /// Raw template for `key`, following the fallback chain.
    pub fn lookup(&self, key: &str, locale: &Locale) -> Option<&str> {
        locale
            .candidates()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(ROOT))
            .find_map(|tag| self.tables.get(tag).and_then(|t| t.get(key)))
            .map(String::as_str)
    }

    /// Render `key` with positional `args`. Unknown keys render as the key itself.
    pub fn format(&self, key: &str, args: &[String], locale: &Locale) -> String {
        match self.lookup(key, locale) {
            Some(template) => render_template(template, args),
            None => {
                warn!(key, locale = %locale, "no message found, rendering key");
                key.to_string()
            }
        }
    }
}

fn table_tag(locale: Option<&Locale>) -> String {
    locale.map(Locale::to_string).unwrap_or_default()
}

/// Substitute `{N}` placeholders. Out-of-range placeholders stay verbatim.
pub(crate) fn render_template(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            '\'' => quoted = !quoted,
            '{' if !quoted => {
                let mut index = String::new();
                let mut closed = false;
                for d in chars.by_ref() {
                    if d == '}' {
                        closed = true;
                        break;
                    }
                    index.push(d);
                }
                match index.trim().parse::<usize>().ok().and_then(|i| args.get(i)) {
                    Some(arg) if closed => out.push_str(arg),
                    _ => {
                        out.push('{');
                        out.push_str(&index);
                        if closed {
                            out.push('}');
                        }
                    }
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn parse_properties(text: &str) -> Result<Vec<(String, String)>, L10nError> {
    let mut entries = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((idx, line)) = lines.next() {
        let line_no = idx + 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        // join continuation lines (odd number of trailing backslashes)
        let mut logical = trimmed.to_string();
        while trailing_backslashes(&logical) % 2 == 1 {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (raw_key, raw_value) = split_key_value(&logical);
        let key = unescape(raw_key, line_no)?;
        if key.is_empty() {
            return Err(L10nError::MalformedProperties {
                line: line_no,
                reason: "empty key".to_string(),
            });
        }
        entries.push((key, unescape(raw_value, line_no)?));
    }
    Ok(entries)
}

fn trailing_backslashes(s: &str) -> usize {
    s.chars().rev().take_while(|c| *c == '\\').count()
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest
                    .strip_prefix('=')
                    .or_else(|| rest.strip_prefix(':'))
                    .unwrap_or(rest);
                return (&line[..i], rest.trim_start());
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str, line: usize) -> Result<String, L10nError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let malformed = |reason: String| L10nError::MalformedProperties { line, reason };
                let (hex, unit) = read_hex_unit(&mut chars);
                let unit = unit.ok_or_else(|| malformed(format!("bad unicode escape \\u{hex}")))?;
                let decoded = if (0xD800..=0xDBFF).contains(&unit) {
                    // a high surrogate must be followed by `\uXXXX` holding the low half
                    let mut rest = chars.clone();
                    let low = (rest.next() == Some('\\') && rest.next() == Some('u'))
                        .then(|| read_hex_unit(&mut rest).1)
                        .flatten()
                        .filter(|low| (0xDC00..=0xDFFF).contains(low))
                        .ok_or_else(|| malformed(format!("unpaired surrogate \\u{hex}")))?;
                    chars = rest;
                    char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
                } else {
                    char::from_u32(unit)
                };
                out.push(decoded.ok_or_else(|| malformed(format!("bad unicode escape \\u{hex}")))?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Next four characters as a UTF-16 code unit, with the raw text for errors.
fn read_hex_unit(chars: &mut std::str::Chars<'_>) -> (String, Option<u32>) {
    let hex: String = chars.by_ref().take(4).collect();
    let unit = u32::from_str_radix(&hex, 16).ok().filter(|_| hex.len() == 4);
    (hex, unit)
}
