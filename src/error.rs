//! Error taxonomy for edit sessions.
//!
//! Gateway failures never escape the editor: each one is turned into a
//! notification plus a log entry. The types here only travel between the
//! gateways and the editor, and out of the constructors the host calls.

use thiserror::Error;

use crate::rpc::RpcError;

/// Failure of a gateway read or write
#[derive(Debug, Error)]
pub enum EditorError {
    /// The request was rejected or threw before a usable answer came back
    #[error("request failed: {0}")]
    Network(#[from] RpcError),

    /// The backend answered, but reported `success = false`
    #[error("backend reported failure: {}", .message.as_deref().unwrap_or("no message"))]
    Backend { message: Option<String> },

    /// An expected record or attachment does not exist
    #[error("missing data: {0}")]
    MissingData(String),

    /// Attachment payload was not valid base64
    #[error("invalid attachment payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl EditorError {
    /// Message the backend supplied for a failed call, if any
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            EditorError::Backend { message } => message.as_deref(),
            _ => None,
        }
    }
}

/// The invocation context did not name a document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("no document id in action params or navigation context")]
    MissingDocumentId,

    #[error("invalid document id: {0}")]
    InvalidDocumentId(i64),
}

/// Configuration could not be assembled
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}
