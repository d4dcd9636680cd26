//! Document link provider: navigable targets for Markdown links.
//!
//! Walks the document's structural symbol tree, keeps the symbols the link
//! classifier recognizes, and resolves each raw target into an absolute
//! file location. Targets with a non-`file` scheme are skipped, never
//! resolved; every other failure degrades to fewer links.

use std::borrow::Cow;
use std::path::Path;

use tower_lsp::lsp_types::{DocumentLink, DocumentSymbolResponse, Url};

use crate::context::split_target;
use crate::paths::{resolve_target, uri_scheme};
use crate::symbol::{document_symbols, is_link_symbol};
use crate::workspace::Workspace;

/// Build `textDocument/documentLink` results for one document.
pub fn document_links(workspace: &Workspace, path: &Path) -> Option<Vec<DocumentLink>> {
    let symbols = match document_symbols(workspace, path)? {
        DocumentSymbolResponse::Nested(symbols) => symbols,
        DocumentSymbolResponse::Flat(_) => return Some(Vec::new()),
    };

    let links = symbols
        .iter()
        .filter(|symbol| is_link_symbol(symbol))
        .filter_map(|symbol| {
            let child = symbol.children.as_ref()?.first()?;
            let raw_target = child.name.as_str();

            // Non-local targets are skipped rather than resolved
            if uri_scheme(raw_target).is_some_and(|scheme| scheme != "file") {
                return None;
            }

            let (target_path, _query, _fragment) = split_target(raw_target);
            let decoded = urlencoding::decode(&target_path)
                .unwrap_or(Cow::Borrowed(target_path.as_str()));

            // A pure-fragment link points back into the document itself
            let absolute = if decoded.is_empty() {
                path.to_path_buf()
            } else {
                resolve_target(path, &decoded)
            };

            Some(DocumentLink {
                range: child.selection_range,
                target: Url::from_file_path(&absolute).ok(),
                tooltip: Some(raw_target.to_string()),
                data: None,
            })
        })
        .collect();

    Some(links)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_utils::create_test_workspace;

    #[test]
    fn test_relative_link_resolves_to_absolute_target() {
        let (_temp_dir, root, workspace) = create_test_workspace(|dir| {
            fs::create_dir(dir.join("docs")).unwrap();
            fs::write(dir.join("docs/source.md"), "See [guide](guide.md).\n").unwrap();
            fs::write(dir.join("docs/guide.md"), "# Guide\n").unwrap();
        });

        let links = document_links(&workspace, &root.join("docs/source.md")).unwrap();
        assert_eq!(links.len(), 1);

        let expected = Url::from_file_path(root.join("docs/guide.md")).unwrap();
        assert_eq!(links[0].target.as_ref().unwrap(), &expected);
    }

    #[test]
    fn test_leading_separator_is_stripped() {
        let (_temp_dir, root, workspace) = create_test_workspace(|dir| {
            fs::write(dir.join("source.md"), "See [notes](/notes.md).\n").unwrap();
        });

        let links = document_links(&workspace, &root.join("source.md")).unwrap();
        let expected = Url::from_file_path(root.join("notes.md")).unwrap();
        assert_eq!(links[0].target.as_ref().unwrap(), &expected);
    }

    #[test]
    fn test_remote_targets_are_skipped() {
        let (_temp_dir, root, workspace) = create_test_workspace(|dir| {
            fs::write(
                dir.join("source.md"),
                "[site](https://example.com) and [local](a.md)\n",
            )
            .unwrap();
        });

        let links = document_links(&workspace, &root.join("source.md")).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].tooltip.as_deref(), Some("a.md"));
    }

    #[test]
    fn test_fragment_is_dropped_from_target_path() {
        let (_temp_dir, root, workspace) = create_test_workspace(|dir| {
            fs::write(dir.join("source.md"), "[setup](guide.md#setup-steps)\n").unwrap();
        });

        let links = document_links(&workspace, &root.join("source.md")).unwrap();
        let expected = Url::from_file_path(root.join("guide.md")).unwrap();
        assert_eq!(links[0].target.as_ref().unwrap(), &expected);
    }

    #[test]
    fn test_fragment_only_link_points_at_document_itself() {
        let (_temp_dir, root, workspace) = create_test_workspace(|dir| {
            fs::write(dir.join("source.md"), "# Intro\n\n[up](#intro)\n").unwrap();
        });

        let links = document_links(&workspace, &root.join("source.md")).unwrap();
        let expected = Url::from_file_path(root.join("source.md")).unwrap();
        assert_eq!(links[0].target.as_ref().unwrap(), &expected);
    }

    #[test]
    fn test_percent_encoded_target_is_decoded() {
        let (_temp_dir, root, workspace) = create_test_workspace(|dir| {
            fs::write(dir.join("source.md"), "[spaced](file%20name.md)\n").unwrap();
        });

        let links = document_links(&workspace, &root.join("source.md")).unwrap();
        let expected = Url::from_file_path(root.join("file name.md")).unwrap();
        assert_eq!(links[0].target.as_ref().unwrap(), &expected);
    }

    #[test]
    fn test_document_without_links_yields_no_entries() {
        let (_temp_dir, root, workspace) = create_test_workspace(|dir| {
            fs::write(dir.join("source.md"), "# Only A Heading\n").unwrap();
        });

        let links = document_links(&workspace, &root.join("source.md")).unwrap();
        assert!(links.is_empty());
    }
}
