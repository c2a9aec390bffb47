//! Renderable document model

/// Label shown on code blocks that carry no language tag
pub const DEFAULT_CODE_LABEL: &str = "code";

/// Structured, sanitized form of a reply, recomputed on every display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// Block-level node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    /// Level is always 1..=3
    Heading { level: u8, content: Vec<Inline> },
    /// A run of strictly consecutive list-item lines
    List(Vec<ListItem>),
    /// Opaque literal; never reinterpreted by inline parsing
    Code { language: Option<String>, text: String },
    Rule,
}

/// Inline span within a text-bearing block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub marker: ListMarker,
    pub content: Vec<Inline>,
}

/// Ordered-vs-unordered is kept per item, not per list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Ordered(u64),
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over every code block as `(label, text)`
    pub fn code_blocks(&self) -> impl Iterator<Item = (&str, &str)> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Code { language, text } => Some((
                language.as_deref().unwrap_or(DEFAULT_CODE_LABEL),
                text.as_str(),
            )),
            _ => None,
        })
    }
}

impl Block {
    /// Short tag naming the block kind, handy in logs and tests
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading { .. } => "heading",
            Block::List(_) => "list",
            Block::Code { .. } => "code",
            Block::Rule => "rule",
        }
    }
}

impl Inline {
    /// Concatenated literal text with all emphasis stripped
    pub fn text_content(&self) -> String {
        match self {
            Inline::Text(t) | Inline::Code(t) => t.clone(),
            Inline::Bold(children) | Inline::Italic(children) => plain_text(children),
        }
    }
}

pub(crate) fn plain_text(spans: &[Inline]) -> String {
    spans.iter().map(Inline::text_content).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_flattens_nesting() {
        let span = Inline::Bold(vec![
            Inline::Text("a ".into()),
            Inline::Italic(vec![Inline::Text("b".into())]),
            Inline::Code(" c".into()),
        ]);
        assert_eq!(span.text_content(), "a b c");
    }

    #[test]
    fn test_code_blocks_default_label() {
        let doc = Document {
            blocks: vec![
                Block::Rule,
                Block::Code { language: None, text: "x".into() },
                Block::Code { language: Some("rust".into()), text: "y".into() },
            ],
        };
        let blocks: Vec<_> = doc.code_blocks().collect();
        assert_eq!(blocks, vec![("code", "x"), ("rust", "y")]);
    }
}
