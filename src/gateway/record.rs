use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{DocumentGateway, GatewayKind, codec, falsy_string, many2one_id, parse};
use crate::core::{DocumentId, LoadedDocument, SaveReceipt};
use crate::error::EditorError;
use crate::rpc::{RpcTransport, call_kw};

pub const DOCUMENT_MODEL: &str = "documents.document";
pub const ATTACHMENT_MODEL: &str = "ir.attachment";

#[derive(Debug, Deserialize)]
struct DocumentRecord {
    #[serde(default, deserialize_with = "falsy_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "many2one_id")]
    attachment_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AttachmentRecord {
    #[serde(default, deserialize_with = "falsy_string")]
    datas: Option<String>,
}

/// Reads and writes the document's attachment through the generic ORM
/// endpoint; content travels base64-encoded
pub struct RecordGateway {
    transport: Arc<dyn RpcTransport>,
}

impl RecordGateway {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    async fn read_one<T: DeserializeOwned>(
        &self,
        model: &str,
        id: i64,
        fields: &[&str],
    ) -> Result<Option<T>, EditorError> {
        let value = call_kw(
            self.transport.as_ref(),
            model,
            "read",
            json!([[id], fields]),
            json!({}),
        )
        .await?;
        let records: Vec<T> = parse(value)?;
        Ok(records.into_iter().next())
    }

    async fn document(&self, id: DocumentId) -> Result<DocumentRecord, EditorError> {
        self.read_one(DOCUMENT_MODEL, id.get(), &["name", "attachment_id"])
            .await?
            .ok_or_else(|| EditorError::MissingData(format!("document {}", id)))
    }
}

#[async_trait]
impl DocumentGateway for RecordGateway {
    fn kind(&self) -> GatewayKind {
        GatewayKind::Record
    }

    async fn load(&self, id: DocumentId) -> Result<LoadedDocument, EditorError> {
        let document = self.document(id).await?;
        let mut loaded = LoadedDocument {
            name: document.name,
            ..LoadedDocument::default()
        };

        let Some(attachment_id) = document.attachment_id else {
            log::debug!("document {} has no attachment, loading empty content", id);
            return Ok(loaded);
        };

        let attachment: Option<AttachmentRecord> = self
            .read_one(ATTACHMENT_MODEL, attachment_id, &["datas"])
            .await?;
        match attachment.and_then(|a| a.datas) {
            Some(datas) => loaded.content = codec::decode(&datas)?,
            None => log::debug!(
                "attachment {} of document {} holds no data",
                attachment_id,
                id
            ),
        }

        Ok(loaded)
    }

    async fn save(&self, id: DocumentId, content: &str) -> Result<SaveReceipt, EditorError> {
        // Re-resolve: the attachment may have been replaced since load.
        let attachment_id = self.document(id).await?.attachment_id.ok_or_else(|| {
            EditorError::MissingData(format!("attachment of document {}", id))
        })?;

        let written = call_kw(
            self.transport.as_ref(),
            ATTACHMENT_MODEL,
            "write",
            json!([[attachment_id], {"datas": codec::encode(content)}]),
            json!({}),
        )
        .await?;

        if written.as_bool() == Some(false) {
            return Err(EditorError::Backend { message: None });
        }

        Ok(SaveReceipt::default())
    }
}
