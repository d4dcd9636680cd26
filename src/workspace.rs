//! The in-memory representation of the edited workspace.
//!
//! Holds a rope per open document and knows the workspace root. Data is
//! exposed through select-style methods; no interpretation of the text
//! happens here, and no derived state is cached. File enumeration walks the
//! directory tree on every call so suggestion lists never observe stale
//! state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glob::Pattern;
use itertools::Itertools;
use ropey::Rope;
use walkdir::WalkDir;

use crate::config::Settings;

#[derive(Debug, Default, Clone)]
pub struct Workspace {
    ropes: HashMap<PathBuf, Rope>,
    root_dir: PathBuf,
}

impl Workspace {
    pub fn new(root_dir: &Path) -> Workspace {
        Workspace {
            ropes: HashMap::new(),
            root_dir: root_dir.to_path_buf(),
        }
    }

    /// Sync an opened or changed document's text into the workspace.
    pub fn update_document(&mut self, path: &Path, text: &str) {
        let new_rope = Rope::from_str(text);
        match self.ropes.get_mut(path) {
            Some(rope) => *rope = new_rope,
            None => {
                self.ropes.insert(path.to_path_buf(), new_rope);
            }
        }
    }

    pub fn close_document(&mut self, path: &Path) {
        self.ropes.remove(path);
    }

    /// The characters of one line of a document; the open rope when the
    /// document is synced, the on-disk text otherwise.
    pub fn select_line(&self, path: &Path, line: usize) -> Option<Vec<char>> {
        if let Some(rope) = self.ropes.get(path) {
            return rope.get_line(line).map(|slice| slice.chars().collect_vec());
        }

        let text = std::fs::read_to_string(path).ok()?;
        Rope::from_str(&text)
            .get_line(line)
            .map(|slice| slice.chars().collect_vec())
    }

    /// Full text of a document by location, preferring the open rope.
    pub fn document_text(&self, path: &Path) -> Option<String> {
        if let Some(rope) = self.ropes.get(path) {
            return Some(rope.to_string());
        }

        std::fs::read_to_string(path).ok()
    }

    pub fn root_dir(&self) -> &PathBuf {
        &self.root_dir
    }

    /// Enumerate workspace files that no exclusion glob matches.
    ///
    /// A file appears in the result only when it is excluded by zero of the
    /// configured patterns; matching any single pattern removes it. Globs
    /// are matched against the path relative to the workspace root, with
    /// forward slashes. Hidden directories are never entered. The result is
    /// sorted so candidate ordering is stable across requests.
    pub fn enumerate_files(&self, settings: &Settings) -> Vec<PathBuf> {
        let patterns = settings
            .exclude_globs
            .iter()
            .filter_map(|glob| Pattern::new(glob).ok())
            .collect_vec();

        WalkDir::new(&self.root_dir)
            .into_iter()
            .filter_entry(|entry| {
                !entry
                    .file_name()
                    .to_str()
                    .map(|name| name.starts_with('.'))
                    .unwrap_or(false)
            })
            .flatten()
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path().to_path_buf())
            .filter(|path| {
                let relative = path
                    .strip_prefix(&self.root_dir)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .replace('\\', "/");

                patterns.iter().all(|pattern| !pattern.matches(&relative))
            })
            .sorted()
            .collect_vec()
    }
}
