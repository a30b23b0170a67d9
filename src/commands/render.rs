//! Render an arbitrary markdown file

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::content::{FrontMatter, MarkdownRenderer};

/// Front-matter and HTML of one document
#[derive(Debug, Serialize)]
pub struct Rendered {
    pub meta: FrontMatter,
    pub html: String,
    pub reading_minutes: u32,
}

/// Split and render a document's text
pub fn render_document(document: &str, words_per_minute: usize) -> Rendered {
    let renderer = MarkdownRenderer::with_words_per_minute(words_per_minute);
    let (meta, body) = FrontMatter::split(document);
    Rendered {
        html: renderer.render(body),
        reading_minutes: renderer.reading_minutes(body),
        meta,
    }
}

pub fn run(path: &Path, words_per_minute: usize, json: bool) -> Result<()> {
    let document =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let rendered = render_document(&document, words_per_minute);

    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        println!("{}", rendered.html);
    }
    Ok(())
}
