//! Inline markdown: code spans, links, strong and emphasis
//!
//! Code spans and links are lifted out into placeholders before the rest of
//! the line is escaped, so their already-safe HTML is never escaped twice
//! and nothing inside them is mistaken for emphasis.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::helpers::{escape_attr, html_escape};

/// Placeholder delimiters, taken from the Unicode private use area
const MARK_OPEN: char = '\u{E000}';
const MARK_CLOSE: char = '\u{E001}';

lazy_static! {
    static ref CODE_SPAN: Regex = Regex::new(r"`([^`]+)`").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap();
    static ref STRONG: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref PLACEHOLDER: Regex = Regex::new(r"\x{E000}(\d+)\x{E001}").unwrap();
}

/// URL schemes that are never emitted into an `href`
const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// A lifted-out fragment: the HTML to restore and the source it replaced
struct Stash {
    html: String,
    source: String,
}

/// Render one logical line of markdown to an HTML fragment
pub fn render_inline(line: &str) -> String {
    let line: String = line
        .chars()
        .filter(|&c| c != MARK_OPEN && c != MARK_CLOSE)
        .collect();
    let mut stash: Vec<Stash> = Vec::new();

    let with_code = CODE_SPAN
        .replace_all(&line, |caps: &Captures| {
            stash_fragment(
                &mut stash,
                format!("<code>{}</code>", html_escape(&caps[1])),
                &caps[0],
            )
        })
        .into_owned();

    let with_links = LINK
        .replace_all(&with_code, |caps: &Captures| {
            // Code spans are not supported inside links; show their source
            let text = restore_source(&caps[1], &stash);
            let href = restore_source(&caps[2], &stash);
            let html = render_link(&text, &href);
            stash_fragment(&mut stash, html, &caps[0])
        })
        .into_owned();

    let escaped = html_escape(&with_links);
    let strong = STRONG.replace_all(&escaped, "<strong>$1</strong>");
    let emphasised = apply_emphasis(&strong);

    PLACEHOLDER
        .replace_all(&emphasised, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| stash.get(idx))
                .map(|s| s.html.clone())
                .unwrap_or_default()
        })
        .into_owned()
}

fn stash_fragment(stash: &mut Vec<Stash>, html: String, source: &str) -> String {
    let idx = stash.len();
    stash.push(Stash {
        html,
        source: source.to_string(),
    });
    format!("{}{}{}", MARK_OPEN, idx, MARK_CLOSE)
}

/// Put the original markdown back in place of any placeholders
fn restore_source(text: &str, stash: &[Stash]) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| stash.get(idx))
                .map(|s| s.source.clone())
                .unwrap_or_default()
        })
        .into_owned()
}

fn render_link(text: &str, href: &str) -> String {
    let lowered = href.trim().to_ascii_lowercase();
    let href = if BLOCKED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        tracing::debug!("Dropping link with unsafe scheme: {}", href);
        "#"
    } else {
        href
    };

    if href.starts_with("http://") || href.starts_with("https://") {
        format!(
            r#"<a href="{}" target="_blank" rel="noreferrer">{}</a>"#,
            escape_attr(href),
            html_escape(text)
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, escape_attr(href), html_escape(text))
    }
}

/// Wrap `*text*` in `<em>` when the asterisks sit at word boundaries
///
/// The opening `*` must start the line or follow whitespace; the closing
/// `*` must end the line or precede whitespace or punctuation.
fn apply_emphasis(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '*' && opens_emphasis(&chars, i) {
            if let Some(close) = closing_star(&chars, i) {
                out.push_str("<em>");
                out.extend(&chars[i + 1..close]);
                out.push_str("</em>");
                i = close + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

fn opens_emphasis(chars: &[char], i: usize) -> bool {
    let after_boundary = i == 0 || chars[i - 1].is_whitespace();
    let next_is_text = chars
        .get(i + 1)
        .is_some_and(|c| *c != '*' && !c.is_whitespace());
    after_boundary && next_is_text
}

fn closing_star(chars: &[char], open: usize) -> Option<usize> {
    let close = (open + 1..chars.len()).find(|&j| chars[j] == '*')?;
    let tight = !chars[close - 1].is_whitespace();
    let bounded = match chars.get(close + 1) {
        None => true,
        Some(c) => c.is_whitespace() || c.is_ascii_punctuation(),
    };
    (tight && bounded).then_some(close)
}
