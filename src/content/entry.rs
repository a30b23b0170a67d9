//! Feed entry model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::FrontMatter;
use crate::helpers;

/// A front-matter date: the text as written plus the calendar date, when
/// the text is one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDate {
    pub raw: String,
    pub parsed: Option<NaiveDate>,
}

impl EntryDate {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            parsed: helpers::parse_date(raw),
        }
    }

    /// Display form; unparseable dates show as written
    pub fn display(&self, format: &str) -> String {
        match &self.parsed {
            Some(date) => helpers::format_date(date, format),
            None => self.raw.clone(),
        }
    }
}

/// One project, blog post or article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Content category the entry was loaded for
    pub category: String,

    /// File name without extension
    pub slug: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<EntryDate>,

    pub tags: Vec<String>,

    /// Cover image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Pinned entries list before everything else
    pub pinned: bool,

    pub reading_minutes: u32,

    /// Link to the entry's detail page
    pub href: String,

    /// Rendered body
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub html: String,

    /// Full front-matter, including keys this struct does not model
    pub meta: FrontMatter,
}

impl Entry {
    /// Parsed calendar date, if any
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.date.as_ref().and_then(|d| d.parsed)
    }

    /// Whether the entry can appear in a listing
    pub fn is_listable(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Short plain-text teaser: the summary, else the start of the body
    pub fn excerpt(&self, length: usize) -> String {
        let text = match &self.summary {
            Some(summary) => summary.clone(),
            None => helpers::strip_html(&self.html)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        };
        helpers::truncate(&text, length, None)
    }

    /// Copy without the rendered body, for listings
    pub fn summary_only(&self) -> Self {
        Self {
            html: String::new(),
            ..self.clone()
        }
    }

    /// Feed order: pinned first, newest first, then title
    pub fn feed_order(a: &Entry, b: &Entry) -> Ordering {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.calendar_date().cmp(&a.calendar_date()))
            .then_with(|| a.title.cmp(&b.title))
    }
}
