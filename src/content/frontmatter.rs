//! Front-matter parsing
//!
//! Front-matter is a flat `key: value` block fenced by `---` lines at the
//! very top of a document. Parsing is best-effort: lines that do not look
//! like `key: value` are skipped rather than reported.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref ISO_DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref NUMBER: Regex = Regex::new(r"^-?\d+(\.\d+)?$").unwrap();
}

/// A single normalised front-matter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    List(Vec<String>),
    Text(String),
}

impl FieldValue {
    /// Normalise a raw value taken from the right of the colon
    pub fn parse(raw: &str) -> Self {
        let value = strip_quotes(raw.trim());

        if let Some(inner) = value
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let items = inner
                .split(',')
                .map(|item| strip_quotes(item.trim()).to_string())
                .filter(|item| !item.is_empty())
                .collect();
            return FieldValue::List(items);
        }

        match value {
            "true" => return FieldValue::Bool(true),
            "false" => return FieldValue::Bool(false),
            _ => {}
        }

        // Dates stay literal text so no timezone ever shifts the day
        if ISO_DATE.is_match(value) {
            return FieldValue::Text(value.to_string());
        }

        if NUMBER.is_match(value) {
            if let Ok(n) = value.parse::<f64>() {
                return FieldValue::Number(n);
            }
        }

        FieldValue::Text(value.trim().to_string())
    }

    /// Text form of a scalar value; lists and booleans have none
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(_) => Some(self.to_string()),
            FieldValue::Bool(_) | FieldValue::List(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Strip one layer of matching `"` or `'` quotes
pub fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == last && (first == b'"' || first == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Front-matter data from a document, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: IndexMap<String, FieldValue>,
}

impl FrontMatter {
    /// Split a document into front-matter and body
    ///
    /// Without an opening `---` line followed later by a closing `---` line
    /// the metadata is empty and the body is the whole document.
    pub fn split(document: &str) -> (Self, &str) {
        let Some((first, mut rest)) = next_line(document) else {
            return (Self::default(), document);
        };
        if !is_delimiter(first) {
            return (Self::default(), document);
        }

        let block_start = rest;
        let mut block_len = 0;
        loop {
            let Some((line, after)) = next_line(rest) else {
                // Never closed
                return (Self::default(), document);
            };
            if is_delimiter(line) {
                let block = &block_start[..block_len];
                return (Self::parse_block(block), after);
            }
            block_len += rest.len() - after.len();
            rest = after;
        }
    }

    /// Parse the lines between the delimiters
    pub fn parse_block(block: &str) -> Self {
        let mut fields = IndexMap::new();

        for line in block.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, raw)) = trimmed.split_once(':') else {
                tracing::trace!("Skipping front-matter line without a colon: {:?}", line);
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }

            fields.insert(key.to_string(), FieldValue::parse(raw));
        }

        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Scalar value as text (strings and numbers)
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(FieldValue::as_text)
    }

    /// List value; a single scalar becomes a one-element list
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(FieldValue::List(items)) => items.clone(),
            Some(value) => value
                .as_text()
                .filter(|s| !s.is_empty())
                .map(|s| vec![s])
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(FieldValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Split off one line, returning it without its terminator
fn next_line(s: &str) -> Option<(&str, &str)> {
    if s.is_empty() {
        return None;
    }
    match s.find('\n') {
        Some(pos) => Some((&s[..pos], &s[pos + 1..])),
        None => Some((s, "")),
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
tags: [rust, "web", 'cli', ]
pinned: true
order: 3
---
This is the content.
"#;

        let (fm, body) = FrontMatter::split(content);
        assert_eq!(fm.text("title"), Some("Hello World".to_string()));
        assert_eq!(fm.get("date"), Some(&FieldValue::Text("2024-01-15".into())));
        assert_eq!(fm.list("tags"), vec!["rust", "web", "cli"]);
        assert_eq!(fm.flag("pinned"), Some(true));
        assert_eq!(fm.get("order"), Some(&FieldValue::Number(3.0)));
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_no_frontmatter_keeps_document() {
        let content = "# Title\n\nSome text\n---\nmore\n";
        let (fm, body) = FrontMatter::split(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unclosed_frontmatter_is_body() {
        let content = "---\ntitle: Oops\nno closing line\n";
        let (fm, body) = FrontMatter::split(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_leading_blank_line_is_not_frontmatter() {
        let content = "\n---\ntitle: x\n---\n";
        let (fm, body) = FrontMatter::split(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_crlf_delimiters() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, body) = FrontMatter::split(content);
        assert_eq!(fm.text("title"), Some("Windows".to_string()));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = FrontMatter::split("---\n---\nBody");
        assert!(fm.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let block = "# comment\n\njust prose\n: no key\ntitle: Kept\n";
        let fm = FrontMatter::parse_block(block);
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.text("title"), Some("Kept".to_string()));
    }

    #[test]
    fn test_value_splits_on_first_colon() {
        let fm = FrontMatter::parse_block("link: https://example.com/a:b\n");
        assert_eq!(
            fm.text("link"),
            Some("https://example.com/a:b".to_string())
        );
    }

    #[test]
    fn test_strip_quotes_is_idempotent_on_plain_text() {
        assert_eq!(strip_quotes("\"a\""), "a");
        assert_eq!(strip_quotes("'a'"), "a");
        assert_eq!(strip_quotes("a"), "a");
        assert_eq!(strip_quotes(strip_quotes("a")), "a");
        assert_eq!(strip_quotes("\"a'"), "\"a'");
        assert_eq!(strip_quotes("\""), "\"");
    }

    #[test]
    fn test_value_normalisation_order() {
        assert_eq!(FieldValue::parse("\"hello\""), FieldValue::Text("hello".into()));
        assert_eq!(FieldValue::parse("false"), FieldValue::Bool(false));
        assert_eq!(FieldValue::parse("True"), FieldValue::Text("True".into()));
        assert_eq!(FieldValue::parse("-1.5"), FieldValue::Number(-1.5));
        assert_eq!(FieldValue::parse("1.2.3"), FieldValue::Text("1.2.3".into()));
        assert_eq!(FieldValue::parse("[]"), FieldValue::List(vec![]));
        assert_eq!(
            FieldValue::parse("2023-06-01"),
            FieldValue::Text("2023-06-01".into())
        );
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let fm = FrontMatter::parse_block("title: One\nsummary: s\ntitle: Two\n");
        assert_eq!(fm.text("title"), Some("Two".to_string()));
        assert_eq!(fm.iter().next().map(|(k, _)| k), Some("title"));
    }

    #[test]
    fn test_single_string_promotes_to_list() {
        let fm = FrontMatter::parse_block("tags: Notes\n");
        assert_eq!(fm.list("tags"), vec!["Notes"]);
        assert!(fm.list("missing").is_empty());
    }

    #[test]
    fn test_number_display() {
        assert_eq!(FieldValue::Number(2024.0).to_string(), "2024");
        assert_eq!(FieldValue::Number(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_serializes_as_object() {
        let fm = FrontMatter::parse_block("title: T\ntags: [a]\ndraft: false\n");
        let json = serde_json::to_string(&fm).unwrap();
        assert_eq!(json, r#"{"title":"T","tags":["a"],"draft":false}"#);
    }
}
