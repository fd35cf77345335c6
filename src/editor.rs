//! Document edit-session controller
//!
//! An [`Editor`] owns exactly one [`EditSession`]. It loads the document once,
//! accepts content changes from the view, and saves on request. Gateway
//! failures never escape: each becomes one notification and one log entry.
//!
//! Editors are built by an [`EditorFactory`] that the host constructs with the
//! gateway and notifier it wants; there is no global registry.

use std::sync::Arc;

use tokio::sync::watch;

use crate::core::mimetype::is_text_editable;
use crate::core::{
    DocumentId, EditSession, InvocationContext, LoadedDocument, Notification, Notifier, Phase,
    SessionStore,
};
use crate::error::{ContextError, EditorError};
use crate::gateway::{DocumentGateway, GatewayKind};

pub const LOAD_FAILED: &str = "Failed to load document";
pub const LOAD_ERROR: &str = "Error loading document";
pub const SAVE_SUCCEEDED: &str = "Document saved successfully";
pub const SAVE_FAILED: &str = "Failed to save document";
pub const SAVE_ERROR: &str = "Error saving document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
    /// The session had already left the loading phase
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed,
    /// Nothing was sent because the session was not ready
    Skipped,
}

/// Clears a session flag when dropped, however the owning future ends
struct FlagGuard<'a> {
    store: &'a SessionStore,
    clear: fn(&mut EditSession),
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.store.update(self.clear);
    }
}

/// Ends the loading phase when dropped; a fetch that never finished leaves
/// the session read-only
struct LoadGuard<'a> {
    store: &'a SessionStore,
    settled: bool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            self.store.update(|s| s.loading = false);
            return;
        }

        let document_id = self.store.snapshot().document_id;
        log::warn!("load of document {} abandoned before completion", document_id);
        self.store.update(|s| {
            s.loading = false;
            s.editable = false;
        });
    }
}

/// Controller for one open editing interaction
pub struct Editor {
    gateway: Arc<dyn DocumentGateway>,
    notifier: Arc<dyn Notifier>,
    store: SessionStore,
    /// A fetch has completed, successfully or not
    settled: bool,
}

impl Editor {
    /// Create an editor in the loading phase without touching the backend
    pub fn new(
        context: &InvocationContext,
        gateway: Arc<dyn DocumentGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ContextError> {
        let document_id = context.resolve_document_id()?;
        let session = EditSession::new(document_id, context.initial_name().unwrap_or_default());

        Ok(Self {
            gateway,
            notifier,
            store: SessionStore::new(session),
            settled: false,
        })
    }

    /// Create an editor and load its document
    pub async fn open(
        context: &InvocationContext,
        gateway: Arc<dyn DocumentGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ContextError> {
        let mut editor = Self::new(context, gateway, notifier)?;
        editor.initialize().await;
        Ok(editor)
    }

    /// Fetch the document; runs until one fetch completes, then never again
    pub async fn initialize(&mut self) -> LoadOutcome {
        if self.settled {
            log::warn!(
                "document {} already initialized, ignoring reload",
                self.document_id()
            );
            return LoadOutcome::Skipped;
        }

        if self.store.phase() != Phase::Loading {
            log::info!("retrying abandoned load of document {}", self.document_id());
            self.store.update(|s| s.loading = true);
        }

        let mut loading = LoadGuard {
            store: &self.store,
            settled: false,
        };
        let document_id = self.document_id();

        let outcome = match self.gateway.load(document_id).await {
            Ok(document) => {
                log::debug!(
                    "loaded document {} ({} bytes)",
                    document_id,
                    document.content.len()
                );
                self.store.update(|s| apply_loaded(s, document));
                LoadOutcome::Loaded
            }
            Err(err) => {
                log::error!("failed to load document {}: {}", document_id, err);
                self.notifier
                    .notify(Notification::error(failure_message(&err, LOAD_FAILED, LOAD_ERROR)));
                self.store.update(|s| s.editable = false);
                LoadOutcome::Failed
            }
        };

        loading.settled = true;
        drop(loading);
        self.settled = true;
        outcome
    }

    /// Replace the content with whatever the view now holds
    pub fn on_content_change(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.store.update(|s| s.content = text);
    }

    /// Send the current content to the backend
    pub async fn save(&mut self) -> SaveOutcome {
        // Empty content of an unfetched document must not reach the backend.
        if !self.settled {
            log::warn!(
                "save of document {} ignored, content was never loaded",
                self.document_id()
            );
            return SaveOutcome::Skipped;
        }

        let phase = self.store.phase();
        if phase != Phase::Ready {
            log::warn!(
                "save of document {} ignored while {:?}",
                self.document_id(),
                phase
            );
            return SaveOutcome::Skipped;
        }

        let EditSession {
            document_id,
            content,
            ..
        } = self.store.snapshot();

        self.store.update(|s| s.saving = true);
        let _saving = FlagGuard {
            store: &self.store,
            clear: |s| s.saving = false,
        };

        match self.gateway.save(document_id, &content).await {
            Ok(receipt) => {
                log::info!("saved document {} ({} bytes)", document_id, content.len());
                let message = receipt.message.unwrap_or_else(|| SAVE_SUCCEEDED.to_string());
                self.notifier.notify(Notification::success(message));
                SaveOutcome::Saved
            }
            Err(err) => {
                log::error!("failed to save document {}: {}", document_id, err);
                self.notifier
                    .notify(Notification::error(failure_message(&err, SAVE_FAILED, SAVE_ERROR)));
                SaveOutcome::Failed
            }
        }
    }

    /// Dismiss the editor, returning the final state of its session
    pub fn close(self) -> EditSession {
        self.store.update(|s| s.closed = true);
        log::debug!("closed editor for document {}", self.document_id());
        self.store.snapshot()
    }

    pub fn document_id(&self) -> DocumentId {
        self.store.snapshot().document_id
    }

    pub fn session(&self) -> EditSession {
        self.store.snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.store.phase()
    }

    /// Feed of session snapshots, one per mutation
    pub fn subscribe(&self) -> watch::Receiver<EditSession> {
        self.store.subscribe()
    }

    pub fn gateway_kind(&self) -> GatewayKind {
        self.gateway.kind()
    }
}

fn apply_loaded(session: &mut EditSession, document: LoadedDocument) {
    let LoadedDocument {
        name,
        content,
        mimetype,
        editable,
    } = document;

    if let Some(name) = name {
        session.document_name = name;
    }
    session.content = content;
    session.editable =
        editable.unwrap_or_else(|| mimetype.as_deref().is_none_or(is_text_editable));
    session.mimetype = mimetype;
}

/// User-facing text for a failed call
fn failure_message(err: &EditorError, failed: &str, errored: &str) -> String {
    match err {
        EditorError::Backend { .. } => err.backend_message().unwrap_or(failed).to_string(),
        EditorError::MissingData(what) => format!("{}: {} not found", failed, what),
        EditorError::Decode(_) => failed.to_string(),
        EditorError::Network(_) => errored.to_string(),
    }
}

/// Opens editors over a fixed gateway and notifier
#[derive(Clone)]
pub struct EditorFactory {
    gateway: Arc<dyn DocumentGateway>,
    notifier: Arc<dyn Notifier>,
}

impl EditorFactory {
    pub fn new(gateway: Arc<dyn DocumentGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self { gateway, notifier }
    }

    pub fn create(&self, context: &InvocationContext) -> Result<Editor, ContextError> {
        Editor::new(context, self.gateway.clone(), self.notifier.clone())
    }

    pub async fn open(&self, context: &InvocationContext) -> Result<Editor, ContextError> {
        Editor::open(context, self.gateway.clone(), self.notifier.clone()).await
    }

    pub fn gateway_kind(&self) -> GatewayKind {
        self.gateway.kind()
    }
}
