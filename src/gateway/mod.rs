//! Persistence gateways
//!
//! Two incompatible backend contracts exist for the same editor, so each is a
//! separate [`DocumentGateway`] strategy and configuration picks one:
//!
//! - [`EndpointGateway`]: custom `/document/editor/*` routes, plain text on
//!   the wire.
//! - [`RecordGateway`]: generic ORM reads and writes against the document and
//!   its attachment, base64 on the wire.

pub mod codec;
pub mod endpoint;
pub mod record;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::{DocumentId, LoadedDocument, SaveReceipt};
use crate::error::EditorError;
use crate::rpc::{RpcError, RpcTransport};

pub use endpoint::EndpointGateway;
pub use record::RecordGateway;

/// Which backend contract to speak
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GatewayKind {
    /// Custom editor endpoints
    #[default]
    Endpoint,
    /// Generic record read/write on the attachment
    Record,
}

impl fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayKind::Endpoint => write!(f, "endpoint"),
            GatewayKind::Record => write!(f, "record"),
        }
    }
}

/// Outbound reads and writes for one document
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    fn kind(&self) -> GatewayKind;

    /// Fetch display name and decoded content
    async fn load(&self, id: DocumentId) -> Result<LoadedDocument, EditorError>;

    /// Persist `content`, encoding it as the backend expects
    async fn save(&self, id: DocumentId, content: &str) -> Result<SaveReceipt, EditorError>;
}

/// Construct the gateway strategy for `kind` over `transport`
pub fn build(kind: GatewayKind, transport: Arc<dyn RpcTransport>) -> Arc<dyn DocumentGateway> {
    match kind {
        GatewayKind::Endpoint => Arc::new(EndpointGateway::new(transport)),
        GatewayKind::Record => Arc::new(RecordGateway::new(transport)),
    }
}

fn parse<T: DeserializeOwned>(value: Value) -> Result<T, EditorError> {
    serde_json::from_value(value).map_err(|e| EditorError::Network(RpcError::Malformed(e.to_string())))
}

/// Backend fields report "no value" as `false`
fn falsy_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Many2one fields come back as `[id, display_name]` or `false`
fn many2one_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(pair) => pair.first().and_then(Value::as_i64),
        Value::Number(n) => n.as_i64(),
        _ => None,
    })
}
