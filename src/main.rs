use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use linkmark::completion::{get_completions, CancelToken};
use linkmark::config::Settings;
use linkmark::document_links::document_links;
use linkmark::symbol::document_symbols;
use linkmark::workspace::Workspace;

struct Backend {
    client: Client,
    workspace: Arc<RwLock<Option<Workspace>>>,
    settings: Arc<RwLock<Option<Settings>>>,
    /// Token of the in-flight completion request; superseded on each new
    /// request.
    completion_cancel: Mutex<CancelToken>,
}

impl Backend {
    async fn sync_document(&self, uri: &Url, text: &str) {
        let Ok(path) = uri.to_file_path() else {
            self.client
                .log_message(
                    MessageType::WARNING,
                    format!("ignoring non-file document {uri}"),
                )
                .await;
            return;
        };

        let mut workspace = self.workspace.write().await;
        if let Some(workspace) = workspace.as_mut() {
            workspace.update_document(&path, text);
        }
    }

    fn root_dir(params: &InitializeParams) -> Option<PathBuf> {
        params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .map(|folder| &folder.uri)
            .or(params.root_uri.as_ref())
            .and_then(|uri| uri.to_file_path().ok())
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root_dir = Backend::root_dir(&params)
            .ok_or_else(|| Error::invalid_params("expected a local workspace folder"))?;

        let settings = Settings::new(&root_dir).map_err(|err| {
            let mut error = Error::internal_error();
            error.message = format!("failed to load settings: {err}").into();
            error
        })?;

        *self.settings.write().await = Some(settings);
        *self.workspace.write().await = Some(Workspace::new(&root_dir));

        self.client
            .log_message(
                MessageType::INFO,
                format!("linkmark serving {}", root_dir.display()),
            )
            .await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(true),
                        })),
                        ..Default::default()
                    },
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![
                        "[".to_string(),
                        "(".to_string(),
                        "#".to_string(),
                    ]),
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                document_symbol_provider: Some(OneOf::Left(true)),
                document_link_provider: Some(DocumentLinkOptions {
                    resolve_provider: Some(false),
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "linkmark initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.sync_document(&params.text_document.uri, &params.text_document.text)
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // Full sync; the last change carries the entire document
        if let Some(change) = params.content_changes.into_iter().last() {
            self.sync_document(&params.text_document.uri, &change.text)
                .await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        if let Some(text) = params.text.as_deref() {
            self.sync_document(&params.text_document.uri, text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let Ok(path) = params.text_document.uri.to_file_path() else {
            return;
        };

        let mut workspace = self.workspace.write().await;
        if let Some(workspace) = workspace.as_mut() {
            workspace.close_document(&path);
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let Ok(path) = params
            .text_document_position
            .text_document
            .uri
            .to_file_path()
        else {
            return Ok(None);
        };

        // Supersede the previous request before starting this one
        let cancel = {
            let mut current = self.completion_cancel.lock().await;
            current.cancel();
            *current = CancelToken::new();
            current.clone()
        };

        let workspace = self.workspace.read().await;
        let settings = self.settings.read().await;
        let (Some(workspace), Some(settings)) = (workspace.as_ref(), settings.as_ref()) else {
            return Ok(None);
        };

        Ok(get_completions(workspace, &params, &path, settings, &cancel))
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let Ok(path) = params.text_document.uri.to_file_path() else {
            return Ok(None);
        };

        let workspace = self.workspace.read().await;
        let Some(workspace) = workspace.as_ref() else {
            return Ok(None);
        };

        Ok(document_symbols(workspace, &path))
    }

    async fn document_link(&self, params: DocumentLinkParams) -> Result<Option<Vec<DocumentLink>>> {
        let Ok(path) = params.text_document.uri.to_file_path() else {
            return Ok(None);
        };

        let workspace = self.workspace.read().await;
        let Some(workspace) = workspace.as_ref() else {
            return Ok(None);
        };

        Ok(document_links(workspace, &path))
    }
}

#[tokio::main]
async fn main() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| Backend {
        client,
        workspace: Arc::new(RwLock::new(None)),
        settings: Arc::new(RwLock::new(None)),
        completion_cancel: Mutex::new(CancelToken::new()),
    });
    Server::new(stdin, stdout, socket).serve(service).await;
}
