use std::path::{Path, PathBuf};

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, Position, Range, TextEdit, Url,
};

use crate::anchor::anchorize;
use crate::config::Settings;
use crate::context::LinkContext;
use crate::headings::{get_headers, MDHeader};
use crate::paths::{normalize_lexically, relative_to};
use crate::workspace::Workspace;

use super::{CancelToken, Completable, Completer, Context};

/// The trigger state the cursor is in, decided by the typed character and
/// the text immediately before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestMode {
    /// `[` typed: propose an entire `label](target)` construct.
    Full,
    /// `(` typed right after `]`: propose only the target portion.
    Partial,
    /// `#` typed right after `](`: propose only local header anchors.
    Header,
}

pub struct LinkCompleter<'a> {
    pub mode: SuggestMode,
    /// The editor already auto-inserted the matching closing brace at the
    /// cursor, so candidates must not add their own.
    pub brace_completed: bool,
    pub brace_completion_range: Range,
    /// The link construct enclosing the cursor, as far as it is typed.
    /// Classifies manual invocations and narrows candidates to the typed
    /// portion of the target.
    pub link_context: LinkContext,
    workspace: &'a Workspace,
    context_path: &'a Path,
    settings: &'a Settings,
    cancel: &'a CancelToken,
}

impl<'a> Completer<'a> for LinkCompleter<'a> {
    fn construct(context: Context<'a>, line: usize, character: usize) -> Option<Self> {
        let line_chars = context.workspace.select_line(context.path, line)?;
        let line_string = String::from_iter(&line_chars);

        // Trigger character, or the character before the cursor on an
        // unconditional (Ctrl+Space style) invocation.
        let explicit = context.trigger_character.is_some();
        let trigger = context.trigger_character.or_else(|| {
            character
                .checked_sub(1)
                .and_then(|index| line_chars.get(index).copied())
        });

        let link_context = LinkContext::recognize(&line_string, character).unwrap_or_default();

        let mode = match trigger {
            Some('[') => {
                if !context.settings.full_suggest_mode {
                    return None;
                }
                SuggestMode::Full
            }
            // A bare parenthesis is not a Markdown link
            Some('(') if cursor_preceded_by(&line_chars, character, &[']', '(']) => {
                SuggestMode::Partial
            }
            Some('#') if cursor_preceded_by(&line_chars, character, &[']', '(', '#']) => {
                SuggestMode::Header
            }
            // An explicit trigger that is not link syntax
            _ if explicit => return None,
            // Manual invocation away from a trigger character; the
            // recognizer decides whether the cursor sits in a link target
            _ => {
                if link_context.text.is_empty() {
                    return None;
                }
                if link_context.path.is_empty() && link_context.fragment.is_some() {
                    SuggestMode::Header
                } else {
                    SuggestMode::Partial
                }
            }
        };

        let closing = match mode {
            SuggestMode::Full => ']',
            SuggestMode::Partial | SuggestMode::Header => ')',
        };
        let brace_completed = line_chars.get(character) == Some(&closing);

        Some(LinkCompleter {
            mode,
            brace_completed,
            brace_completion_range: Range {
                start: Position {
                    line: line as u32,
                    character: character as u32,
                },
                end: Position {
                    line: line as u32,
                    character: character as u32 + 1,
                },
            },
            link_context,
            workspace: context.workspace,
            context_path: context.path,
            settings: context.settings,
            cancel: context.cancel,
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, LinkCompleter<'a>>> {
        match self.mode {
            // Only the current document's headers are offered
            SuggestMode::Header => {
                let text = self
                    .workspace
                    .document_text(self.context_path)
                    .unwrap_or_default();

                get_headers(&text)
                    .into_iter()
                    .map(|header| LinkCandidate::Header {
                        path: self.context_path.to_path_buf(),
                        header,
                    })
                    .collect()
            }
            SuggestMode::Full | SuggestMode::Partial => self.enumerate_candidates(),
        }
    }
}

impl LinkCompleter<'_> {
    /// One candidate per included file, one per header of each Markdown
    /// file, and one per distinct parent directory.
    fn enumerate_candidates(&self) -> Vec<LinkCandidate> {
        let files = self.workspace.enumerate_files(self.settings);

        let mut candidates = Vec::new();
        let mut directories: Vec<PathBuf> = Vec::new();

        for file in files {
            // A superseded request stops walking the workspace
            if self.cancel.is_cancelled() {
                return Vec::new();
            }

            // Resources outside the local file scheme end the enumeration
            if Url::from_file_path(&file).is_err() {
                break;
            }

            if let Some(parent) = file.parent() {
                if !directories.iter().any(|dir| dir == parent) {
                    directories.push(parent.to_path_buf());
                }
            }

            let is_markdown = file
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| extension.eq_ignore_ascii_case("md"));

            candidates.push(LinkCandidate::File { path: file.clone() });

            if is_markdown && self.settings.heading_completions {
                if let Some(text) = self.workspace.document_text(&file) {
                    candidates.extend(get_headers(&text).into_iter().map(|header| {
                        LinkCandidate::Header {
                            path: file.clone(),
                            header,
                        }
                    }));
                }
            }
        }

        candidates.extend(
            directories
                .into_iter()
                .map(|path| LinkCandidate::Folder { path }),
        );

        candidates
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkCandidate {
    File { path: PathBuf },
    Folder { path: PathBuf },
    Header { path: PathBuf, header: MDHeader },
}

impl<'a> Completable<'a, LinkCompleter<'a>> for LinkCandidate {
    fn completions(&self, completer: &LinkCompleter<'a>) -> Option<CompletionItem> {
        let document_dir = completer.context_path.parent()?;

        let (absolute, header) = match self {
            LinkCandidate::File { path } | LinkCandidate::Folder { path } => (path, None),
            LinkCandidate::Header { path, header } => (path, Some(header)),
        };

        let file_name = absolute.file_name()?.to_string_lossy().to_string();
        let header_only = completer.mode == SuggestMode::Header;

        // `name # header (directory if not current)`
        let name_with_header = match header {
            Some(header) if header_only => header.text.clone(),
            Some(header) => format!("{} # {}", file_name, header.text),
            None => file_name.clone(),
        };

        let relative_dir = relative_to(document_dir, absolute.parent().unwrap_or(absolute));
        let label = if relative_dir == "." {
            name_with_header
        } else {
            format!("{} ({})", name_with_header, relative_dir)
        };

        let absolute_normalized = normalize_lexically(absolute).to_string_lossy().to_string();
        let anchor = header.map(|header| anchorize(&header.text));
        let relative_file_path = relative_to(document_dir, absolute);

        // A manual invocation midway through a target keeps only the
        // candidates matching the typed portion
        let typed = &completer.link_context;
        if !typed.path.is_empty() && !relative_file_path.starts_with(&typed.path) {
            return None;
        }
        if let Some(fragment) = typed.fragment.as_deref() {
            if !fragment.is_empty()
                && !anchor
                    .as_deref()
                    .is_some_and(|anchor| anchor.starts_with(fragment))
            {
                return None;
            }
        }

        let insert_text = match completer.mode {
            // The opening bracket is already typed; insert the rest whole
            SuggestMode::Full => format!(
                "{}]({}{})",
                file_name,
                relative_file_path,
                anchor
                    .as_ref()
                    .map(|anchor| format!("#{}", anchor))
                    .unwrap_or_default()
            ),
            SuggestMode::Partial => {
                let mut text = match &anchor {
                    Some(anchor) => format!("{}#{}", relative_file_path, anchor),
                    None => relative_file_path.clone(),
                };
                if !completer.brace_completed {
                    text.push(')');
                }
                text
            }
            SuggestMode::Header => {
                let mut text = anchor.clone().unwrap_or_default();
                if !completer.brace_completed {
                    text.push(')');
                }
                text
            }
        };

        // Relative path first; headers keep document order within one file
        let mut sort_text = relative_file_path.clone();
        if let Some(header) = header {
            sort_text.push_str(&format!(" {:05} # {}", header.order, header.text));
        }

        // Both slash variants so filtering works however the user types paths
        let filter_text = format!(
            "{},{}",
            absolute_normalized.replace('\\', "/"),
            absolute_normalized.replace('/', "\\")
        );

        let kind = match self {
            LinkCandidate::File { .. } => CompletionItemKind::FILE,
            LinkCandidate::Folder { .. } => CompletionItemKind::FOLDER,
            LinkCandidate::Header { .. } => CompletionItemKind::REFERENCE,
        };

        // In full-suggest mode we insert our own closing bracket and then
        // some, so a brace-completed `]` has to go
        let additional_text_edits = (completer.mode == SuggestMode::Full
            && completer.brace_completed)
            .then(|| {
                vec![TextEdit {
                    range: completer.brace_completion_range,
                    new_text: String::new(),
                }]
            });

        Some(CompletionItem {
            label,
            kind: Some(kind),
            detail: Some(
                header
                    .map(|header| header.text.clone())
                    .unwrap_or(file_name),
            ),
            documentation: Some(Documentation::String(absolute_normalized)),
            insert_text: Some(insert_text),
            sort_text: Some(sort_text),
            filter_text: Some(filter_text),
            additional_text_edits,
            ..Default::default()
        })
    }
}

fn cursor_preceded_by(line_chars: &[char], character: usize, expected: &[char]) -> bool {
    character
        .checked_sub(expected.len())
        .and_then(|start| line_chars.get(start..character))
        .is_some_and(|window| window == expected)
}
