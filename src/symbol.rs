//! Document symbol provider for Markdown documents.
//!
//! Produces the structural symbol tree consumed by the document-link
//! provider: one symbol per heading and one per inline link. A link symbol
//! carries exactly one child whose name is the raw link target and whose
//! selection range is the selectable span inside the parentheses; that
//! shape is what [`is_link_symbol`] recognizes.

use std::ops::Range as ByteRange;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use ropey::Rope;
use tower_lsp::lsp_types::{DocumentSymbol, DocumentSymbolResponse, Position, Range, SymbolKind};

use crate::headings::get_headers;
use crate::workspace::Workspace;

/// `[display](target)`, target captured without its parentheses.
static INLINE_LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(?<display>[^\[\]]*)\]\((?<target>[^\(\)]*)\)").unwrap());

/// True only for symbols shaped like a Markdown link: exactly one child,
/// and that child names a non-empty raw target.
pub fn is_link_symbol(symbol: &DocumentSymbol) -> bool {
    match symbol.children.as_deref() {
        Some([child]) => !child.name.is_empty(),
        _ => false,
    }
}

/// Build the symbol tree for a document: headings and inline links, in
/// document order.
pub fn document_symbols(workspace: &Workspace, path: &Path) -> Option<DocumentSymbolResponse> {
    let text = workspace.document_text(path)?;
    let rope = Rope::from_str(&text);

    let mut symbols: Vec<DocumentSymbol> = Vec::new();

    // Headings carry no children; the link classifier ignores them.
    let mut heading_lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| line.trim_start().starts_with('#'));
    for header in get_headers(&text) {
        let (line_nr, line) = heading_lines.next()?;
        symbols.push(plain_symbol(
            header.text,
            SymbolKind::STRUCT,
            line_range(line_nr, line),
        ));
    }

    for captures in INLINE_LINK_REGEX.captures_iter(&text) {
        let (Some(full), Some(display), Some(target)) = (
            captures.get(0),
            captures.name("display"),
            captures.name("target"),
        ) else {
            continue;
        };

        let name = if display.as_str().is_empty() {
            full.as_str().to_string()
        } else {
            display.as_str().to_string()
        };

        let child = plain_symbol(
            target.as_str().to_string(),
            SymbolKind::KEY,
            range_from_bytes(&rope, target.range()),
        );

        let mut link = plain_symbol(name, SymbolKind::STRING, range_from_bytes(&rope, full.range()));
        link.children = Some(vec![child]);
        symbols.push(link);
    }

    if symbols.is_empty() {
        return None;
    }

    symbols.sort_by_key(|symbol| (symbol.range.start.line, symbol.range.start.character));

    Some(DocumentSymbolResponse::Nested(symbols))
}

#[allow(deprecated)] // the `deprecated` field has been deprecated in favor of tags
fn plain_symbol(name: String, kind: SymbolKind, range: Range) -> DocumentSymbol {
    DocumentSymbol {
        name,
        detail: None,
        kind,
        tags: None,
        deprecated: None,
        range,
        selection_range: range,
        children: None,
    }
}

fn line_range(line_nr: usize, line: &str) -> Range {
    Range {
        start: Position {
            line: line_nr as u32,
            character: 0,
        },
        end: Position {
            line: line_nr as u32,
            character: line.chars().count() as u32,
        },
    }
}

/// Convert a byte-offset span into an LSP range via rope character
/// counting.
fn range_from_bytes(rope: &Rope, range: ByteRange<usize>) -> Range {
    let char_start = rope.byte_to_char(range.start);
    let char_end = rope.byte_to_char(range.end);

    let start_line = rope.char_to_line(char_start);
    let start_offset = char_start - rope.line_to_char(start_line);

    let end_line = rope.char_to_line(char_end);
    let end_offset = char_end - rope.line_to_char(end_line);

    Range {
        start: Position {
            line: start_line as u32,
            character: start_offset as u32,
        },
        end: Position {
            line: end_line as u32,
            character: end_offset as u32,
        },
    }
}
