//! Document identity and the shapes gateways hand back.

use std::fmt;

use crate::error::ContextError;

/// Backend record id of a `documents.document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(i64);

impl DocumentId {
    pub fn new(id: i64) -> Result<Self, ContextError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(ContextError::InvalidDocumentId(id))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decoded content and metadata returned by a gateway load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedDocument {
    pub name: Option<String>,
    pub content: String,
    pub mimetype: Option<String>,
    /// Editability as judged by the backend, when it says
    pub editable: Option<bool>,
}

/// Acknowledgement of a successful save
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReceipt {
    /// Confirmation text supplied by the backend
    pub message: Option<String>,
}
