//! Edit session state
//!
//! One [`EditSession`] per open editor. Every mutation goes through a
//! [`SessionStore`], which publishes a fresh snapshot to all subscribers so a
//! view can re-render without polling.

use tokio::sync::watch;

use super::document::DocumentId;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Saving,
    Closed,
}

/// In-memory state of one editing interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub document_id: DocumentId,
    pub document_name: String,
    /// Always decoded plain text
    pub content: String,
    pub mimetype: Option<String>,
    /// Advisory; the editor never refuses input on this basis
    pub editable: bool,
    pub loading: bool,
    pub saving: bool,
    pub closed: bool,
}

impl EditSession {
    pub fn new(document_id: DocumentId, document_name: impl Into<String>) -> Self {
        Self {
            document_id,
            document_name: document_name.into(),
            content: String::new(),
            mimetype: None,
            editable: true,
            loading: true,
            saving: false,
            closed: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.closed {
            Phase::Closed
        } else if self.loading {
            Phase::Loading
        } else if self.saving {
            Phase::Saving
        } else {
            Phase::Ready
        }
    }
}

/// Owner of a session's state and its change feed
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<EditSession>,
}

impl SessionStore {
    pub fn new(session: EditSession) -> Self {
        let (tx, _rx) = watch::channel(session);
        Self { tx }
    }

    /// Apply `f` and notify subscribers, even if nothing changed
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut EditSession),
    {
        self.tx.send_modify(f);
    }

    pub fn snapshot(&self) -> EditSession {
        self.tx.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.tx.borrow().phase()
    }

    pub fn subscribe(&self) -> watch::Receiver<EditSession> {
        self.tx.subscribe()
    }
}
