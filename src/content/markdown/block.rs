//! Block-level markdown rendering
//!
//! A single pass over the document's lines. Paragraph, list and quote lines
//! collect into accumulators which are flushed into HTML whenever a
//! different kind of block begins.

use lazy_static::lazy_static;
use regex::Regex;

use super::inline::render_inline;
use crate::helpers::{escape_attr, html_escape};

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^(#{1,6})\s+(.+)$").unwrap();
    static ref RULE: Regex = Regex::new(r"^-{3,}$").unwrap();
    static ref BULLET: Regex = Regex::new(r"^[-*]\s+(.*)$").unwrap();
    static ref NUMBERED: Regex = Regex::new(r"^\d+\.\s+(.*)$").unwrap();
}

const FENCE: &str = "```";

/// An open code fence
struct Fence {
    lang: String,
    lines: Vec<String>,
}

#[derive(Default)]
struct BlockWriter {
    blocks: Vec<String>,
    paragraph: Vec<String>,
    bullets: Vec<String>,
    numbered: Vec<String>,
    quote: Vec<String>,
    fence: Option<Fence>,
}

impl BlockWriter {
    fn line(&mut self, line: &str) {
        let trimmed = line.trim();

        if self.fence.is_some() {
            if trimmed.starts_with(FENCE) {
                self.close_fence();
            } else if let Some(fence) = self.fence.as_mut() {
                fence.lines.push(line.to_string());
            }
            return;
        }

        if let Some(lang) = trimmed.strip_prefix(FENCE) {
            self.flush_all();
            self.fence = Some(Fence {
                lang: lang.trim().to_string(),
                lines: Vec::new(),
            });
            return;
        }

        if trimmed.is_empty() {
            self.flush_all();
            return;
        }

        if let Some(caps) = HEADING.captures(trimmed) {
            self.flush_all();
            let level = caps[1].len();
            self.blocks.push(format!(
                "<h{level}>{}</h{level}>",
                render_inline(caps[2].trim())
            ));
            return;
        }

        if RULE.is_match(trimmed) {
            self.flush_all();
            self.blocks.push("<hr />".to_string());
            return;
        }

        if let Some(rest) = trimmed.strip_prefix('>') {
            self.flush_paragraph();
            self.flush_bullets();
            self.flush_numbered();
            let rest = rest.strip_prefix(' ').unwrap_or(rest);
            self.quote.push(render_inline(rest));
            return;
        }

        if let Some(caps) = BULLET.captures(trimmed) {
            self.flush_paragraph();
            self.flush_numbered();
            self.flush_quote();
            self.bullets.push(render_inline(&caps[1]));
            return;
        }

        if let Some(caps) = NUMBERED.captures(trimmed) {
            self.flush_paragraph();
            self.flush_bullets();
            self.flush_quote();
            self.numbered.push(render_inline(&caps[1]));
            return;
        }

        self.flush_bullets();
        self.flush_numbered();
        self.flush_quote();
        self.paragraph.push(trimmed.to_string());
    }

    fn close_fence(&mut self) {
        let Some(fence) = self.fence.take() else {
            return;
        };
        let code = html_escape(&fence.lines.join("\n"));
        if fence.lang.is_empty() {
            self.blocks.push(format!("<pre><code>{}</code></pre>", code));
        } else {
            self.blocks.push(format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_attr(&fence.lang),
                code
            ));
        }
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = self.paragraph.join(" ");
        self.paragraph.clear();
        self.blocks.push(format!("<p>{}</p>", render_inline(&text)));
    }

    fn flush_bullets(&mut self) {
        if let Some(list) = list_html("ul", &mut self.bullets) {
            self.blocks.push(list);
        }
    }

    fn flush_numbered(&mut self) {
        if let Some(list) = list_html("ol", &mut self.numbered) {
            self.blocks.push(list);
        }
    }

    fn flush_quote(&mut self) {
        if self.quote.is_empty() {
            return;
        }
        let body = self.quote.join("<br />");
        self.quote.clear();
        self.blocks
            .push(format!("<blockquote><p>{}</p></blockquote>", body));
    }

    fn flush_all(&mut self) {
        self.flush_paragraph();
        self.flush_bullets();
        self.flush_numbered();
        self.flush_quote();
    }

    fn finish(mut self) -> String {
        // An unterminated fence closes at end of document
        self.close_fence();
        self.flush_all();
        self.blocks.join("\n")
    }
}

fn list_html(tag: &str, items: &mut Vec<String>) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let body: String = items
        .drain(..)
        .map(|item| format!("<li>{}</li>", item))
        .collect();
    Some(format!("<{tag}>{body}</{tag}>"))
}

/// Render a markdown document body to HTML
pub fn render(document: &str) -> String {
    let mut writer = BlockWriter::default();
    for line in document.lines() {
        writer.line(line);
    }
    writer.finish()
}

/// Count whitespace-separated words outside fenced code blocks
pub fn word_count(document: &str) -> usize {
    let mut in_fence = false;
    let mut words = 0;

    for line in document.lines() {
        if line.trim().starts_with(FENCE) {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence {
            words += line.split_whitespace().count();
        }
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_code() {
        assert_eq!(
            render("```js\nconst a = 1;\n```"),
            r#"<pre><code class="language-js">const a = 1;</code></pre>"#
        );
    }

    #[test]
    fn test_fence_without_language_keeps_indentation() {
        assert_eq!(
            render("```\n  if a < b {\n\n  }\n```"),
            "<pre><code>  if a &lt; b {\n\n  }</code></pre>"
        );
    }

    #[test]
    fn test_unterminated_fence_closes_at_end() {
        assert_eq!(
            render("intro\n```sh\necho <hi>"),
            "<p>intro</p>\n<pre><code class=\"language-sh\">echo &lt;hi&gt;</code></pre>"
        );
    }

    #[test]
    fn test_paragraph_soft_wrap() {
        assert_eq!(
            render("first line\n  second *line*\n\nnext"),
            "<p>first line second <em>line</em></p>\n<p>next</p>"
        );
    }

    #[test]
    fn test_headings_and_rule() {
        assert_eq!(
            render("# Title\ntext\n## Sub & more\n---\n####### seven"),
            "<h1>Title</h1>\n<p>text</p>\n<h2>Sub &amp; more</h2>\n<hr />\n<p>####### seven</p>"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            render("- one\n* two\n1. first\n2. second\n- three"),
            "<ul><li>one</li><li>two</li></ul>\n<ol><li>first</li><li>second</li></ol>\n<ul><li>three</li></ul>"
        );
    }

    #[test]
    fn test_list_then_paragraph() {
        assert_eq!(
            render("- item\nafter"),
            "<ul><li>item</li></ul>\n<p>after</p>"
        );
    }

    #[test]
    fn test_blockquote_lines() {
        assert_eq!(
            render("> first\n>second\n\nafter"),
            "<blockquote><p>first<br />second</p></blockquote>\n<p>after</p>"
        );
    }

    #[test]
    fn test_quote_flushes_paragraph() {
        assert_eq!(
            render("para\n> quoted\n- item"),
            "<p>para</p>\n<blockquote><p>quoted</p></blockquote>\n<ul><li>item</li></ul>"
        );
    }

    #[test]
    fn test_fence_flushes_open_blocks() {
        assert_eq!(
            render("- a\n```\nx\n```\n"),
            "<ul><li>a</li></ul>\n<pre><code>x</code></pre>"
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render(""), "");
        assert_eq!(render("\n\n  \n"), "");
    }

    #[test]
    fn test_escapes_raw_html() {
        assert_eq!(
            render("<div onclick=\"x\">hi</div>"),
            "<p>&lt;div onclick=&quot;x&quot;&gt;hi&lt;/div&gt;</p>"
        );
    }

    #[test]
    fn test_word_count_skips_fences() {
        let doc = "one two three\n```rust\nfn main() { let x = 1; }\n```\nfour";
        assert_eq!(word_count(doc), 4);
    }
}
