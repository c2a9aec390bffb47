//! HTML emission
//!
//! The only tags ever written are the fixed set below; every piece of text
//! taken from the source, code and language labels included, is escaped on
//! the way out.

use std::fmt::Write;

use super::document::{Block, Document, Inline, ListMarker, DEFAULT_CODE_LABEL};

pub fn to_html(doc: &Document) -> String {
    let mut out = String::new();
    for (i, block) in doc.blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_block(&mut out, block);
    }
    out
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Paragraph(spans) => {
            out.push_str("<p class=\"md-p\">");
            write_spans(out, spans);
            out.push_str("</p>");
        }
        Block::Heading { level, content } => {
            let _ = write!(out, "<h{level} class=\"md-h{level}\">");
            write_spans(out, content);
            let _ = write!(out, "</h{level}>");
        }
        Block::List(items) => {
            out.push_str("<ul class=\"md-ul\">");
            for item in items {
                match item.marker {
                    ListMarker::Bullet => out.push_str("<li class=\"md-li\">"),
                    ListMarker::Ordered(_) => out.push_str("<li class=\"md-li md-ol\">"),
                }
                write_spans(out, &item.content);
                out.push_str("</li>");
            }
            out.push_str("</ul>");
        }
        Block::Code { language, text } => {
            out.push_str("<div class=\"code-block\"><div class=\"code-lang\">");
            escape_into(out, language.as_deref().unwrap_or(DEFAULT_CODE_LABEL));
            out.push_str("</div><pre><code>");
            escape_into(out, text);
            out.push_str("</code></pre></div>");
        }
        Block::Rule => out.push_str("<hr class=\"md-hr\"/>"),
    }
}

fn write_spans(out: &mut String, spans: &[Inline]) {
    for span in spans {
        match span {
            Inline::Text(text) => escape_into(out, text),
            Inline::Code(code) => {
                out.push_str("<code class=\"inline-code\">");
                escape_into(out, code);
                out.push_str("</code>");
            }
            Inline::Bold(children) => {
                out.push_str("<strong>");
                write_spans(out, children);
                out.push_str("</strong>");
            }
            Inline::Italic(children) => {
                out.push_str("<em>");
                write_spans(out, children);
                out.push_str("</em>");
            }
        }
    }
}

/// Escape text for element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
