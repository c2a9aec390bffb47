//! Line classifiers for block-level structure
//!
//! Fenced code is carved out first; only the lines outside fences are
//! classified as heading, list item, rule, blank or paragraph text.

use std::str::Lines;

use super::document::{Block, ListItem, ListMarker};
use super::inline::parse_inline;

const FENCE: &str = "```";
const RULE: &str = "---";
const MAX_HEADING_LEVEL: usize = 3;

/// Classification of a single line outside any code fence
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Rule,
    Heading(u8, &'a str),
    Item(ListMarker, &'a str),
    Text(&'a str),
}

/// How a fence-opening line starts its block
#[derive(Debug, PartialEq, Eq)]
enum FenceOpen<'a> {
    /// Opening and closing fence on the same line
    SingleLine(&'a str),
    Multi {
        language: Option<&'a str>,
        first_line: Option<&'a str>,
    },
}

pub(crate) fn parse_blocks(raw: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut pending_items: Vec<ListItem> = Vec::new();
    let mut lines = raw.lines();
    // Text left over on the line that closed a fence
    let mut carry: Option<&str> = None;

    while let Some(line) = carry.take().or_else(|| lines.next()) {
        if let Some(open) = fence_open(line) {
            flush_list(&mut blocks, &mut pending_items);
            let (code, rest) = read_fence(open, &mut lines);
            blocks.push(code);
            carry = rest;
            continue;
        }

        let kind = classify(line);
        if let LineKind::Item(marker, text) = kind {
            pending_items.push(ListItem {
                marker,
                content: parse_inline(text.trim_end()),
            });
            continue;
        }

        // Anything that is not a list item, blank lines included, ends the run
        flush_list(&mut blocks, &mut pending_items);
        match kind {
            LineKind::Blank | LineKind::Item(..) => {}
            LineKind::Rule => blocks.push(Block::Rule),
            LineKind::Heading(level, text) => blocks.push(Block::Heading {
                level,
                content: parse_inline(text.trim()),
            }),
            LineKind::Text(text) => blocks.push(Block::Paragraph(parse_inline(text.trim()))),
        }
    }

    flush_list(&mut blocks, &mut pending_items);
    blocks
}

fn flush_list(blocks: &mut Vec<Block>, items: &mut Vec<ListItem>) {
    if !items.is_empty() {
        blocks.push(Block::List(std::mem::take(items)));
    }
}

fn fence_open(line: &str) -> Option<FenceOpen<'_>> {
    let rest = line.trim_start().strip_prefix(FENCE)?;
    if let Some(end) = rest.find(FENCE) {
        return Some(FenceOpen::SingleLine(&rest[..end]));
    }

    let info = rest.trim();
    let open = if info.is_empty() {
        FenceOpen::Multi { language: None, first_line: None }
    } else if info.chars().any(|c| c.is_whitespace() || c == '`') {
        FenceOpen::Multi { language: None, first_line: Some(info) }
    } else {
        FenceOpen::Multi { language: Some(info), first_line: None }
    };
    Some(open)
}

/// Split a body line at its closing fence, if it has one.
///
/// Returns the code before the fence (dropped when blank) and any non-blank
/// text after it.
fn fence_close(line: &str) -> Option<(Option<&str>, Option<&str>)> {
    let at = line.find(FENCE)?;
    let code = &line[..at];
    let rest = &line[at + FENCE.len()..];
    Some((
        Some(code).filter(|c| !c.trim().is_empty()),
        Some(rest).filter(|r| !r.trim().is_empty()),
    ))
}

/// Consume lines up to and including the closing fence. A missing close
/// swallows the rest of the input into this block. Text following the
/// closing fence on the same line is handed back to the caller.
fn read_fence<'a>(open: FenceOpen<'a>, lines: &mut Lines<'a>) -> (Block, Option<&'a str>) {
    let (language, first_line) = match open {
        FenceOpen::SingleLine(text) => {
            return (Block::Code { language: None, text: text.to_string() }, None);
        }
        FenceOpen::Multi { language, first_line } => (language, first_line),
    };

    let mut body: Vec<&str> = first_line.into_iter().collect();
    let mut rest = None;
    for line in lines.by_ref() {
        if let Some((code, after)) = fence_close(line) {
            body.extend(code);
            rest = after;
            break;
        }
        body.push(line);
    }

    let code = Block::Code {
        language: language.map(str::to_string),
        text: body.join("\n"),
    };
    (code, rest)
}

fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if line == RULE {
        return LineKind::Rule;
    }
    if let Some((level, text)) = heading(line) {
        return LineKind::Heading(level, text);
    }
    if let Some((marker, text)) = list_item(line) {
        return LineKind::Item(marker, text);
    }
    LineKind::Text(line)
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > MAX_HEADING_LEVEL {
        return None;
    }
    let text = line[hashes..].strip_prefix(' ')?;
    if text.trim().is_empty() {
        return None;
    }
    Some((hashes as u8, text))
}

fn list_item(line: &str) -> Option<(ListMarker, &str)> {
    let (marker, text) = if let Some(text) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
        (ListMarker::Bullet, text)
    } else {
        let digits = line.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let text = line[digits..].strip_prefix(". ")?;
        (ListMarker::Ordered(parse_ordinal(&line[..digits])), text)
    };

    if text.trim().is_empty() {
        return None;
    }
    Some((marker, text))
}

fn parse_ordinal(digits: &str) -> u64 {
    digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}
