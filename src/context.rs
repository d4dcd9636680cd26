//! Recognition of the Markdown link construct under the cursor.
//!
//! Given the text of a single line and a zero-based character offset, this
//! module classifies the link-authoring state at the cursor: the raw matched
//! span, the target path split into components, and the optional query and
//! fragment portions. Recognition never looks beyond the one line and never
//! fails; a cursor outside any link-like construct simply yields `None`.

use once_cell::sync::Lazy;
use regex::Regex;

/// `[display](target` with the cursor at the end of the (possibly still
/// unterminated) target portion.
static LINK_TARGET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(?<display>[^\[\]\(\)]*)\]\((?<target>[^\[\]\(\)]*)$").unwrap()
});

/// The Markdown link construct enclosing the cursor.
///
/// Recomputed per keystroke; owned by a single completion request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkContext {
    /// Raw matched text, from the opening `[` up to the cursor.
    pub text: String,
    /// Target with query and fragment stripped.
    pub path: String,
    /// Slash-delimited components of `path`, empties dropped.
    pub path_components: Vec<String>,
    /// Portion after `?`, before any `#`.
    pub query: Option<String>,
    /// Portion after `#`.
    pub fragment: Option<String>,
}

impl LinkContext {
    /// Recognize the link construct enclosing `character` on `line`.
    ///
    /// Returns `None` when the cursor is not inside the target portion of a
    /// `[display](target` construct. Malformed syntax is treated the same
    /// way, never as an error.
    pub fn recognize(line: &str, character: usize) -> Option<LinkContext> {
        let to_cursor: String = line.chars().take(character).collect();
        let captures = LINK_TARGET_REGEX.captures(&to_cursor)?;

        let text = captures.get(0)?.as_str().to_string();
        let target = captures.name("target")?.as_str();

        let (path, query, fragment) = split_target(target);
        let path_components = path
            .split('/')
            .filter(|component| !component.is_empty())
            .map(str::to_string)
            .collect();

        Some(LinkContext {
            text,
            path,
            path_components,
            query,
            fragment,
        })
    }
}

/// Split a link target on its `?` (query) and `#` (fragment) boundaries.
///
/// The fragment starts at the first `#`; the query starts at the first `?`
/// before the fragment. Absent portions come back as `None`, and the
/// returned path carries neither.
pub fn split_target(target: &str) -> (String, Option<String>, Option<String>) {
    let (before_fragment, fragment) = match target.split_once('#') {
        Some((before, fragment)) => (before, Some(fragment.to_string())),
        None => (target, None),
    };

    let (path, query) = match before_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (before_fragment, None),
    };

    (path.to_string(), query, fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_plain_target() {
        let line = "See [link](docs/notes.md";
        let context = LinkContext::recognize(line, line.len()).unwrap();

        assert_eq!(context.text, "[link](docs/notes.md");
        assert_eq!(context.path, "docs/notes.md");
        assert_eq!(context.path_components, vec!["docs", "notes.md"]);
        assert_eq!(context.query, None);
        assert_eq!(context.fragment, None);
    }

    #[test]
    fn test_recognize_query_and_fragment() {
        let line = "[x](a/b.md?version=2#setup-steps";
        let context = LinkContext::recognize(line, line.len()).unwrap();

        assert_eq!(context.path, "a/b.md");
        assert_eq!(context.path_components, vec!["a", "b.md"]);
        assert_eq!(context.query.as_deref(), Some("version=2"));
        assert_eq!(context.fragment.as_deref(), Some("setup-steps"));
    }

    #[test]
    fn test_recognize_fragment_only_target() {
        let line = "[x](#";
        let context = LinkContext::recognize(line, line.len()).unwrap();

        assert_eq!(context.path, "");
        assert!(context.path_components.is_empty());
        assert_eq!(context.fragment.as_deref(), Some(""));
    }

    #[test]
    fn test_recognize_outside_link_returns_none() {
        assert_eq!(LinkContext::recognize("plain text, no link", 10), None);
        assert_eq!(LinkContext::recognize("", 0), None);
    }

    #[test]
    fn test_recognize_cursor_before_target_returns_none() {
        // Cursor inside the display portion is not a link-target context.
        let line = "[link](target)";
        assert_eq!(LinkContext::recognize(line, 3), None);
    }

    #[test]
    fn test_recognize_closed_link_returns_none() {
        // Cursor after the closing parenthesis.
        let line = "[link](target) and more";
        assert_eq!(LinkContext::recognize(line, line.len()), None);
    }

    #[test]
    fn test_split_target_fragment_before_query_marker() {
        // A `?` after the `#` belongs to the fragment, not the query.
        let (path, query, fragment) = split_target("file.md#what?now");
        assert_eq!(path, "file.md");
        assert_eq!(query, None);
        assert_eq!(fragment.as_deref(), Some("what?now"));
    }

    #[test]
    fn test_split_target_empty() {
        let (path, query, fragment) = split_target("");
        assert_eq!(path, "");
        assert_eq!(query, None);
        assert_eq!(fragment, None);
    }
}
