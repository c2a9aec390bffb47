use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::markup::{Block, Document, Inline, ListMarker, DEFAULT_CODE_LABEL};

/// A styled line ready for Ratatui rendering.
pub type StyledLines = Vec<Line<'static>>;

const RULE_WIDTH: usize = 40;

fn heading_style(level: u8) -> Style {
    match level {
        1 => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        2 => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
    }
}

fn inline_spans(spans: &[Inline], style: Style, out: &mut Vec<Span<'static>>) {
    for span in spans {
        match span {
            Inline::Text(t) => out.push(Span::styled(t.clone(), style)),
            Inline::Code(t) => out.push(Span::styled(
                t.clone(),
                Style::default().fg(Color::Yellow).bg(Color::DarkGray),
            )),
            Inline::Bold(children) => inline_spans(children, style.add_modifier(Modifier::BOLD), out),
            Inline::Italic(children) => inline_spans(children, style.add_modifier(Modifier::ITALIC), out),
        }
    }
}

fn inline_line(prefix: Option<Span<'static>>, spans: &[Inline], style: Style) -> Line<'static> {
    let mut out: Vec<Span<'static>> = prefix.into_iter().collect();
    inline_spans(spans, style, &mut out);
    Line::from(out)
}

/// Convert a rendered document into styled lines, `base` applying to body text
pub fn document_lines(doc: &Document, base: Style) -> StyledLines {
    let mut lines: StyledLines = Vec::new();
    let frame = Style::default().fg(Color::DarkGray);

    for (i, block) in doc.blocks.iter().enumerate() {
        match block {
            Block::Paragraph(spans) => lines.push(inline_line(None, spans, base)),
            Block::Heading { level, content } => {
                if i > 0 {
                    lines.push(Line::default());
                }
                lines.push(inline_line(None, content, heading_style(*level)));
            }
            Block::List(items) => {
                for item in items {
                    let marker = match item.marker {
                        ListMarker::Bullet => Span::styled("  • ", Style::default().fg(Color::Cyan)),
                        ListMarker::Ordered(n) => Span::styled(format!("  {}. ", n), Style::default().fg(Color::Cyan)),
                    };
                    lines.push(inline_line(Some(marker), &item.content, base));
                }
            }
            Block::Code { language, text } => {
                let label = language.as_deref().unwrap_or(DEFAULT_CODE_LABEL);
                lines.push(Line::from(Span::styled(format!("┌─ {}", label), frame)));
                for code_line in text.split('\n') {
                    lines.push(Line::from(vec![
                        Span::styled("│ ", frame),
                        Span::styled(code_line.to_string(), Style::default().fg(Color::Cyan)),
                    ]));
                }
                lines.push(Line::from(Span::styled("└─", frame)));
            }
            Block::Rule => lines.push(Line::from(Span::styled("─".repeat(RULE_WIDTH), frame))),
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::render;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_document_lines_shapes() {
        let doc = render("# Title\nplain **bold**\n- one\n3. three\n```rust\nfn main() {}\n```\n---");
        let lines = document_lines(&doc, Style::default());
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(
            texts,
            vec![
                "Title",
                "plain bold",
                "  • one",
                "  3. three",
                "┌─ rust",
                "│ fn main() {}",
                "└─",
                "─".repeat(RULE_WIDTH).as_str(),
            ]
        );
    }

    #[test]
    fn test_bold_span_is_styled() {
        let lines = document_lines(&render("a **b** *c*"), Style::default());
        let spans = &lines[0].spans;
        let bold = spans.iter().find(|s| s.content == "b").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
        let italic = spans.iter().find(|s| s.content == "c").unwrap();
        assert!(italic.style.add_modifier.contains(Modifier::ITALIC));
    }
}
