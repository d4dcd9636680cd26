//! linkmark: a Language Server for Markdown link authoring
//!
//! This crate provides the core functionality for the linkmark LSP server:
//! completion of Markdown link targets and navigation of existing links in
//! plain-Markdown workspaces.
//!
//! # Overview
//!
//! - **Link Completion**: files, folders, and header anchors of the
//!   workspace, offered while a `[display](target)` construct is being
//!   typed
//! - **Document Links**: every inline link resolved to an absolute,
//!   navigable location
//! - **Document Symbols**: headings and links as a structural outline
//!
//! # Architecture
//!
//! - [`workspace`]: open-document ropes and workspace file enumeration
//! - [`completion`]: the completer seam and the link completer behind it
//! - [`context`], [`headings`], [`anchor`], [`paths`]: the small analyses
//!   the providers are built from
//! - [`config`]: settings layered from user and workspace files
//!
//! The crate is primarily the backing library for the `linkmark` binary,
//! which implements the LSP server over stdio.

// LSP feature modules
pub mod completion;
pub mod document_links;
pub mod symbol;

// Analyses shared by the features
pub mod anchor;
pub mod context;
pub mod headings;
pub mod paths;

// Workspace state and configuration
pub mod config;
pub mod workspace;

// Test utilities (only available in test builds)
#[cfg(test)]
pub mod test_utils;
