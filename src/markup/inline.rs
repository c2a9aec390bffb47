//! Inline span parsing for text-bearing blocks
//!
//! Runs in three passes over a flat piece list: backtick code spans become
//! opaque atoms first, then `**` pairs, then `*` pairs. Atoms are never
//! searched for delimiters, so emphasis can neither start nor end inside code.

use super::document::Inline;

#[derive(Debug, Clone)]
enum Piece {
    Char(char),
    Atom(Inline),
}

pub(crate) fn parse_inline(text: &str) -> Vec<Inline> {
    let pieces = split_code(text);
    let pieces = pair_delimiters(&pieces, 2, bold);
    collapse(pair_delimiters(&pieces, 1, italic))
}

fn bold(inner: Vec<Piece>) -> Inline {
    Inline::Bold(collapse(pair_delimiters(&inner, 1, italic)))
}

fn italic(inner: Vec<Piece>) -> Inline {
    Inline::Italic(collapse(inner))
}

/// Backtick spans need at least one character; "``" stays literal
fn split_code(text: &str) -> Vec<Piece> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '`' {
            let rest = &chars[i + 1..];
            if let Some(len) = rest.iter().position(|c| *c == '`') {
                if len > 0 {
                    let code: String = rest[..len].iter().collect();
                    pieces.push(Piece::Atom(Inline::Code(code)));
                    i += len + 2;
                    continue;
                }
            }
        }
        pieces.push(Piece::Char(chars[i]));
        i += 1;
    }

    pieces
}

fn is_delimiter(pieces: &[Piece], at: usize, width: usize) -> bool {
    at + width <= pieces.len()
        && pieces[at..at + width].iter().all(|p| matches!(p, Piece::Char('*')))
}

/// Pair each opening delimiter with the nearest closing one that leaves a
/// non-empty span between them (shortest match, scanning left to right).
fn pair_delimiters(pieces: &[Piece], width: usize, wrap: fn(Vec<Piece>) -> Inline) -> Vec<Piece> {
    let len = pieces.len();
    let mut next_delimiter = vec![None; len + 1];
    for at in (0..len).rev() {
        next_delimiter[at] = if is_delimiter(pieces, at, width) {
            Some(at)
        } else {
            next_delimiter[at + 1]
        };
    }

    let mut out = Vec::with_capacity(len);
    let mut at = 0;
    while at < len {
        if next_delimiter[at] == Some(at) {
            let content_start = at + width;
            if let Some(close) = next_delimiter.get(content_start + 1).copied().flatten() {
                out.push(Piece::Atom(wrap(pieces[content_start..close].to_vec())));
                at = close + width;
                continue;
            }
        }
        out.push(pieces[at].clone());
        at += 1;
    }

    out
}

fn collapse(pieces: Vec<Piece>) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut buf = String::new();

    for piece in pieces {
        match piece {
            Piece::Char(c) => buf.push(c),
            Piece::Atom(inline) => {
                if !buf.is_empty() {
                    spans.push(Inline::Text(std::mem::take(&mut buf)));
                }
                spans.push(inline);
            }
        }
    }
    if !buf.is_empty() {
        spans.push(Inline::Text(buf));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_inline("hello world"), vec![t("hello world")]);
        assert!(parse_inline("").is_empty());
    }

    #[test]
    fn test_bold_is_non_greedy() {
        assert_eq!(
            parse_inline("**a** x **b**"),
            vec![Inline::Bold(vec![t("a")]), t(" x "), Inline::Bold(vec![t("b")])]
        );
    }

    #[test]
    fn test_bold_not_consumed_as_italic() {
        assert_eq!(parse_inline("**x**"), vec![Inline::Bold(vec![t("x")])]);
    }

    #[test]
    fn test_italic() {
        assert_eq!(
            parse_inline("an *emphasised* word"),
            vec![t("an "), Inline::Italic(vec![t("emphasised")]), t(" word")]
        );
    }

    #[test]
    fn test_nested_emphasis() {
        assert_eq!(
            parse_inline("**a *b* c**"),
            vec![Inline::Bold(vec![t("a "), Inline::Italic(vec![t("b")]), t(" c")])]
        );
        assert_eq!(
            parse_inline("*a **b** c*"),
            vec![Inline::Italic(vec![t("a "), Inline::Bold(vec![t("b")]), t(" c")])]
        );
    }

    #[test]
    fn test_code_is_opaque() {
        assert_eq!(
            parse_inline("run `**not bold**` now"),
            vec![t("run "), Inline::Code("**not bold**".into()), t(" now")]
        );
        assert_eq!(
            parse_inline("**a `*b*` c**"),
            vec![Inline::Bold(vec![t("a "), Inline::Code("*b*".into()), t(" c")])]
        );
    }

    #[test]
    fn test_emphasis_cannot_close_inside_code() {
        assert_eq!(
            parse_inline("*a `b*` c"),
            vec![t("*a "), Inline::Code("b*".into()), t(" c")]
        );
    }

    #[test]
    fn test_empty_backticks_are_literal() {
        assert_eq!(parse_inline("``"), vec![t("``")]);
        assert_eq!(parse_inline("``a`"), vec![t("`"), Inline::Code("a".into())]);
        assert_eq!(parse_inline("`open"), vec![t("`open")]);
    }

    #[test]
    fn test_unpaired_delimiters_stay_literal() {
        assert_eq!(parse_inline("**a"), vec![t("**a")]);
        assert_eq!(parse_inline("5 * 3"), vec![t("5 * 3")]);
        // No bold fits (needs a non-empty span); the leftmost single pair wins
        assert_eq!(parse_inline("****"), vec![Inline::Italic(vec![t("*")]), t("*")]);
    }

    #[test]
    fn test_long_runs_of_asterisks_terminate() {
        let input = "*".repeat(10_000);
        let spans = parse_inline(&input);
        assert!(!spans.is_empty());
    }
}
