use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{DocumentGateway, GatewayKind, falsy_string, parse};
use crate::core::{DocumentId, LoadedDocument, SaveReceipt};
use crate::error::EditorError;
use crate::rpc::RpcTransport;

pub const GET_ROUTE: &str = "/document/editor/get";
pub const SAVE_ROUTE: &str = "/document/editor/save";

/// Answer of the get route; a bare `{error}` counts as `success = false`
#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, deserialize_with = "falsy_string")]
    content: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    error: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    mimetype: Option<String>,
    #[serde(default)]
    is_editable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, deserialize_with = "falsy_string")]
    error: Option<String>,
    #[serde(default, deserialize_with = "falsy_string")]
    message: Option<String>,
}

/// Talks to the editor's dedicated routes; content travels as plain text
pub struct EndpointGateway {
    transport: Arc<dyn RpcTransport>,
}

impl EndpointGateway {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl DocumentGateway for EndpointGateway {
    fn kind(&self) -> GatewayKind {
        GatewayKind::Endpoint
    }

    async fn load(&self, id: DocumentId) -> Result<LoadedDocument, EditorError> {
        let value = self
            .transport
            .call(GET_ROUTE, json!({"document_id": id.get()}))
            .await?;
        let response: GetResponse = parse(value)?;

        if !response.success {
            return Err(EditorError::Backend {
                message: response.error,
            });
        }

        Ok(LoadedDocument {
            name: response.name,
            content: response.content.unwrap_or_default(),
            mimetype: response.mimetype,
            editable: response.is_editable,
        })
    }

    async fn save(&self, id: DocumentId, content: &str) -> Result<SaveReceipt, EditorError> {
        let value = self
            .transport
            .call(
                SAVE_ROUTE,
                json!({"document_id": id.get(), "content": content}),
            )
            .await?;
        let response: SaveResponse = parse(value)?;

        if !response.success {
            return Err(EditorError::Backend {
                message: response.error,
            });
        }

        Ok(SaveReceipt {
            message: response.message,
        })
    }
}
