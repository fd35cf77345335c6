//! Invocation context
//!
//! An editor is opened either with explicit action params (the document the
//! user asked to edit) or from ambient navigation context (the record that is
//! currently active). Explicit params win.

use serde::Deserialize;

use super::document::DocumentId;
use crate::error::ContextError;

/// Parameters attached to the action that opens the editor
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionParams {
    pub document_id: Option<i64>,
    pub document_name: Option<String>,
}

/// Everything the host knows when it asks for an editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub params: ActionParams,
    /// Id of the record active in the host's current view
    pub active_id: Option<i64>,
}

impl InvocationContext {
    pub fn for_document(document_id: i64) -> Self {
        Self {
            params: ActionParams {
                document_id: Some(document_id),
                document_name: None,
            },
            active_id: None,
        }
    }

    pub fn from_active_id(active_id: i64) -> Self {
        Self {
            params: ActionParams::default(),
            active_id: Some(active_id),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.params.document_name = Some(name.into());
        self
    }

    /// Document to edit: explicit params first, then the active record
    pub fn resolve_document_id(&self) -> Result<DocumentId, ContextError> {
        match self.params.document_id.or(self.active_id) {
            Some(id) => DocumentId::new(id),
            None => Err(ContextError::MissingDocumentId),
        }
    }

    /// Display name to show until the backend answers
    pub fn initial_name(&self) -> Option<&str> {
        self.params.document_name.as_deref()
    }
}
