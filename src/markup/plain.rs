//! Plain-text emission for line-oriented terminals

use super::document::{Block, Document, Inline, ListMarker, DEFAULT_CODE_LABEL};

const RULE_WIDTH: usize = 40;

pub fn to_plain_text(doc: &Document) -> String {
    let mut out: Vec<String> = Vec::new();
    for block in &doc.blocks {
        out.push(block_text(block));
    }
    out.join("\n\n")
}

fn block_text(block: &Block) -> String {
    match block {
        Block::Paragraph(spans) => spans_text(spans),
        Block::Heading { level, content } => {
            format!("{} {}", "#".repeat(usize::from(*level)), spans_text(content))
        }
        Block::List(items) => items
            .iter()
            .map(|item| match item.marker {
                ListMarker::Bullet => format!("  › {}", spans_text(&item.content)),
                ListMarker::Ordered(n) => format!("  {n}. {}", spans_text(&item.content)),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Block::Code { language, text } => {
            let mut lines = vec![format!("┌─ {}", language.as_deref().unwrap_or(DEFAULT_CODE_LABEL))];
            lines.extend(text.lines().map(|l| format!("│ {l}")));
            lines.push("└─".to_string());
            lines.join("\n")
        }
        Block::Rule => "─".repeat(RULE_WIDTH),
    }
}

fn spans_text(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Code(code) => format!("`{code}`"),
            Inline::Bold(children) | Inline::Italic(children) => spans_text(children),
            Inline::Text(text) => text.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::render;

    #[test]
    fn test_plain_rendition() {
        let text = to_plain_text(&render("## Plan\n1. **first**\n- second\n```sh\nls\n```"));
        assert_eq!(
            text,
            "## Plan\n\n  1. first\n  › second\n\n┌─ sh\n│ ls\n└─"
        );
    }

    #[test]
    fn test_heading_levels_keep_hash_runs() {
        assert_eq!(to_plain_text(&render("# Title\n### Sub")), "# Title\n\n### Sub");
    }

    #[test]
    fn test_nested_code_keeps_backticks() {
        assert_eq!(
            to_plain_text(&render("`a` **run `b`** *see `c`*")),
            "`a` run `b` see `c`"
        );
    }
}
