//! Path arithmetic for link targets.
//!
//! Turns possibly-relative link targets into absolute, lexically-normalized
//! locations anchored at the referencing document, and produces the relative
//! forms inserted into documents. Purely textual; nothing here touches the
//! file system.

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme prefix of a URI-shaped target. Two characters minimum so Windows
/// drive letters (`C:`) are not mistaken for schemes.
static SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?<scheme>[A-Za-z][A-Za-z0-9+.\-]+):").unwrap());

/// The scheme of a URI-shaped link target, lowercased, or `None` for
/// scheme-less (local) targets.
pub fn uri_scheme(target: &str) -> Option<String> {
    SCHEME_REGEX
        .captures(target)
        .and_then(|captures| captures.name("scheme"))
        .map(|scheme| scheme.as_str().to_lowercase())
}

/// Resolve a link target against the directory of the referencing document.
///
/// A leading path separator is stripped first; a generic URI parse
/// introduces one that is not present in the Markdown source. The result is
/// lexically normalized (`.` removed, `..` collapsed) without consulting
/// the file system.
pub fn resolve_target(document_path: &Path, target: &str) -> PathBuf {
    let target = target.strip_prefix('/').unwrap_or(target);

    let base = document_path.parent().unwrap_or(document_path);

    normalize_lexically(&base.join(target))
}

/// Collapse `.` and `..` components without touching the file system.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// The path of `target` relative to `base_dir`, slash-normalized for
/// insertion into a Markdown link. Falls back to `.` when the target is the
/// base directory itself.
pub fn relative_to(base_dir: &Path, target: &Path) -> String {
    let relative =
        pathdiff::diff_paths(target, base_dir).unwrap_or_else(|| target.to_path_buf());

    let relative = relative.to_string_lossy().replace('\\', "/");
    if relative.is_empty() {
        ".".to_string()
    } else {
        relative
    }
}
