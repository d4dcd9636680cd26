//! Header extraction from Markdown documents.
//!
//! Scans a document top-to-bottom for heading lines and yields one
//! [`MDHeader`] per line, carrying the zero-based occurrence index and the
//! display text. Per-line parsing is two-tier: a structural mdast parse via
//! the `markdown` crate, falling back to a textual heuristic when the
//! structural parse rejects the line. The tier that produced a given text is
//! kept explicit in [`HeaderText`] so both paths stay independently
//! testable. The extractor itself never fails the caller.

use markdown::mdast::Node;
use markdown::ParseOptions;

/// One heading line of a document.
///
/// `order` is the zero-based index of the heading among the document's
/// heading lines in scan order; orders are strictly increasing and unique
/// within one document snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MDHeader {
    pub order: usize,
    pub text: String,
}

/// Display text of a heading, tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderText {
    /// Extracted from a successful mdast parse of the line.
    Structural(String),
    /// Extracted by the textual fallback after the structural parse failed.
    Heuristic(String),
}

impl HeaderText {
    pub fn text(&self) -> &str {
        match self {
            HeaderText::Structural(text) | HeaderText::Heuristic(text) => text,
        }
    }
}

/// Extract all headers of a document, in scan order.
pub fn get_headers(text: &str) -> Vec<MDHeader> {
    text.lines()
        .filter(|line| line.trim_start().starts_with('#'))
        .enumerate()
        .map(|(order, line)| MDHeader {
            order,
            text: parse_header_line(line).text().trim().to_string(),
        })
        .collect()
}

/// Parse one heading line into its display text.
///
/// Prefers a structural parse; single-line parsing can reject edge-case
/// syntax, so a textual fallback guarantees a result.
pub fn parse_header_line(line: &str) -> HeaderText {
    match structural_header_text(line) {
        Some(text) => HeaderText::Structural(text),
        None => HeaderText::Heuristic(heuristic_header_text(line)),
    }
}

/// Structural tier: parse the line as Markdown and read the heading's
/// inline text. Returns `None` when the line does not parse to a heading.
fn structural_header_text(line: &str) -> Option<String> {
    let tree = markdown::to_mdast(line, &ParseOptions::default()).ok()?;

    let children = match tree {
        Node::Root(root) => root.children,
        _ => return None,
    };

    let heading = match children.first() {
        Some(Node::Heading(heading)) => heading,
        _ => return None,
    };

    let mut text = String::new();
    for span in &heading.children {
        match span {
            Node::Text(run) => text.push_str(&run.value),
            // A heading that is itself a link contributes only its display text
            Node::Link(link) => {
                for inner in &link.children {
                    if let Node::Text(run) = inner {
                        text.push_str(&run.value);
                    }
                }
            }
            _ => {}
        }
    }

    Some(text)
}

/// Heuristic tier: strip the leading marker and, if the remaining text is a
/// link, keep only the link's display text.
fn heuristic_header_text(line: &str) -> String {
    let text = match line.find("# ") {
        Some(index) => &line[index + 2..],
        None => line.trim_start().trim_start_matches('#'),
    };

    let text = text.trim();
    if let Some(rest) = text.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return rest[..end].to_string();
        }
    }

    text.to_string()
}
