use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tower_lsp::lsp_types::{CompletionItem, CompletionList, CompletionParams, CompletionResponse};

use crate::{config::Settings, workspace::Workspace};

use self::link_completer::LinkCompleter;

pub mod link_completer;

/// Cooperative cancellation for an in-flight completion request.
///
/// The server cancels the previous request's token whenever a new request
/// arrives; the completer checks the token inside its file-enumeration
/// loop, so a superseded request stops early instead of walking the whole
/// workspace.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Copy)]
pub struct Context<'a> {
    workspace: &'a Workspace,
    path: &'a Path,
    settings: &'a Settings,
    trigger_character: Option<char>,
    cancel: &'a CancelToken,
}

pub trait Completer<'a>: Sized {
    fn construct(context: Context<'a>, line: usize, character: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>;

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized;
}

pub trait Completable<'a, T: Completer<'a>>: Sized {
    fn completions(&self, completer: &T) -> Option<CompletionItem>;
}

pub fn get_completions(
    workspace: &Workspace,
    params: &CompletionParams,
    path: &Path,
    config: &Settings,
    cancel: &CancelToken,
) -> Option<CompletionResponse> {
    let trigger_character = params
        .context
        .as_ref()
        .and_then(|context| context.trigger_character.as_ref())
        .and_then(|trigger| trigger.chars().next());

    let completion_context = Context {
        workspace,
        path,
        settings: config,
        trigger_character,
        cancel,
    };

    run_completer::<LinkCompleter>(
        completion_context,
        params.text_document_position.position.line,
        params.text_document_position.position.character,
    )
}

fn run_completer<'a, T: Completer<'a>>(
    context: Context<'a>,
    line: u32,
    character: u32,
) -> Option<CompletionResponse> {
    let completer = T::construct(context, line as usize, character as usize)?;
    let completions = completer.completions();

    let completions = completions
        .into_iter()
        .flat_map(|completable| completable.completions(&completer))
        .collect::<Vec<CompletionItem>>();

    Some(CompletionResponse::List(CompletionList {
        is_incomplete: false,
        items: completions,
    }))
}
