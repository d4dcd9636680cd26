//! Shared helpers for tests that need a workspace on disk.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::workspace::Workspace;

/// An empty workspace directory inside a fresh temp dir. The directory is
/// named, not hidden, so file enumeration descends into it.
pub fn create_test_workspace_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let root = temp_dir.path().join("workspace");
    fs::create_dir(&root).expect("failed to create workspace dir");
    (temp_dir, root)
}

/// A workspace over a directory populated by `setup`. Documents are read
/// from disk, as for files the editor has not opened.
pub fn create_test_workspace<F: FnOnce(&PathBuf)>(setup: F) -> (TempDir, PathBuf, Workspace) {
    let (temp_dir, root) = create_test_workspace_dir();
    setup(&root);
    let workspace = Workspace::new(&root);
    (temp_dir, root, workspace)
}
