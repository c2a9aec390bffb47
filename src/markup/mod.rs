//! Markup transformer
//!
//! Turns raw reply text into a [`Document`]: a list of paragraph, heading,
//! list, code and rule blocks with bold/italic/code inline spans. The grammar
//! is deliberately small:
//!
//! - fenced code (three backticks, optional language tag), unterminated
//!   fences run to the end of input
//! - inline code, then `**bold**`, then `*italic*`, all shortest-match
//! - `#`..`###` headings, `* `/`- `/`N. ` list items, `---` rules
//! - every other non-blank line is its own paragraph
//!
//! Code is extracted before anything else and is never reinterpreted.
//! [`render`] never fails; malformed markup degrades to paragraphs.
//!
//! # Example
//!
//! ```rust
//! use omni::markup::{render, Block};
//!
//! let doc = render("# Hi\n- a\n- b");
//! assert_eq!(doc.blocks.len(), 2);
//! assert!(matches!(doc.blocks[1], Block::List(ref items) if items.len() == 2));
//! ```

mod block;
mod document;
mod html;
mod inline;
mod plain;

pub use document::{Block, Document, Inline, ListItem, ListMarker, DEFAULT_CODE_LABEL};
pub use html::escape_html;

/// Transform raw text into a renderable document. Pure and infallible.
pub fn render(raw: &str) -> Document {
    Document {
        blocks: block::parse_blocks(raw),
    }
}

impl Document {
    /// Sanitized HTML fragment using the `md-*` class vocabulary
    pub fn to_html(&self) -> String {
        html::to_html(self)
    }

    /// Terminal-friendly rendition: `#` heading runs, `›`/`N.` items, framed code
    pub fn to_plain_text(&self) -> String {
        plain::to_plain_text(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_render_is_deterministic() {
        let input = "# A\n**b** `c`\n```\nd\n```";
        assert_eq!(render(input), render(input));
    }

    #[test]
    fn test_code_is_exempt_from_block_passes() {
        let doc = render("```\n# not a heading\n- not a list item\n---\n**x**\n```");
        assert_eq!(
            doc.blocks,
            vec![Block::Code {
                language: None,
                text: "# not a heading\n- not a list item\n---\n**x**".to_string(),
            }]
        );
    }

    #[test]
    fn test_unterminated_fence_consumes_rest() {
        let doc = render("intro\n```py\ncode here");
        assert_eq!(
            doc.blocks,
            vec![
                Block::Paragraph(vec![t("intro")]),
                Block::Code { language: Some("py".into()), text: "code here".into() },
            ]
        );
        assert!(!doc.to_html().contains("```"));
    }

    #[test]
    fn test_three_items_group_into_one_list() {
        let doc = render("- one\n- two\n- three");
        assert_eq!(doc.blocks.len(), 1);
        match &doc.blocks[0] {
            Block::List(items) => {
                let texts: Vec<_> = items.iter().map(|i| i.content.clone()).collect();
                assert_eq!(texts, vec![vec![t("one")], vec![t("two")], vec![t("three")]]);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_mixed_markers_share_a_list() {
        let doc = render("1. first\n- second");
        match &doc.blocks[0] {
            Block::List(items) => {
                assert_eq!(items[0].marker, ListMarker::Ordered(1));
                assert_eq!(items[1].marker, ListMarker::Bullet);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_headings_carry_inline_spans() {
        let doc = render("### **Key** point");
        assert_eq!(
            doc.blocks,
            vec![Block::Heading {
                level: 3,
                content: vec![Inline::Bold(vec![t("Key")]), t(" point")],
            }]
        );
    }

    #[test]
    fn test_blank_lines_produce_nothing() {
        assert!(render("").is_empty());
        assert!(render("\n\n   \n").is_empty());
    }

    #[test]
    fn test_each_line_is_its_own_paragraph() {
        let doc = render("first\nsecond");
        assert_eq!(
            doc.blocks,
            vec![Block::Paragraph(vec![t("first")]), Block::Paragraph(vec![t("second")])]
        );
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        let inputs = [
            "```", "``", "`", "**", "*", "#", "# ", "1.", "1. ", "- ", "```\n```\n```",
            "***a***", "`**`**`", "\r\n\r\n", "é**ü*ß`ñ`", "#\u{0}", "```\u{feff}\n<",
        ];
        for input in inputs {
            let doc = render(input);
            let _ = doc.to_html();
            let _ = doc.to_plain_text();
        }
    }
}
