//! Shared fixtures: an in-memory backend speaking both editor contracts.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::{Semaphore, mpsc};

use document_editor::core::{ChannelNotifier, InvocationContext, Notification};
use document_editor::gateway::{self, GatewayKind, codec};
use document_editor::rpc::{RpcError, RpcTransport};
use document_editor::{Editor, EditorFactory};

struct StoredDocument {
    name: String,
    attachment_id: Option<i64>,
}

#[derive(Default)]
struct State {
    documents: HashMap<i64, StoredDocument>,
    /// attachment id -> base64 `datas`, `None` when empty
    attachments: HashMap<i64, Option<String>>,
    scripted: HashMap<String, VecDeque<Result<Value, RpcError>>>,
    calls: Vec<(String, Value)>,
}

/// Stateful stand-in for the backend
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document whose attachment holds `text`
    pub fn with_document(self, id: i64, name: &str, text: &str) -> Self {
        self.with_raw_attachment(id, name, Some(&codec::encode(text)))
    }

    /// Document whose attachment holds `datas` verbatim
    pub fn with_raw_attachment(self, id: i64, name: &str, datas: Option<&str>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let attachment_id = id + 1000;
            state.documents.insert(
                id,
                StoredDocument {
                    name: name.to_string(),
                    attachment_id: Some(attachment_id),
                },
            );
            state
                .attachments
                .insert(attachment_id, datas.map(str::to_string));
        }
        self
    }

    pub fn with_document_without_attachment(self, id: i64, name: &str) -> Self {
        self.state.lock().unwrap().documents.insert(
            id,
            StoredDocument {
                name: name.to_string(),
                attachment_id: None,
            },
        );
        self
    }

    /// Answer the next call to `route` with `result` instead of the stored state
    pub fn script(&self, route: &str, result: Result<Value, RpcError>) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .entry(route.to_string())
            .or_default()
            .push_back(result);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn routes(&self) -> Vec<String> {
        self.calls().into_iter().map(|(route, _)| route).collect()
    }

    /// Decoded text currently stored for document `id`
    pub fn stored_text(&self, id: i64) -> Option<String> {
        let state = self.state.lock().unwrap();
        let attachment_id = state.documents.get(&id)?.attachment_id?;
        let datas = state.attachments.get(&attachment_id)?.as_ref()?;
        Some(codec::decode(datas).unwrap())
    }

    fn handle(&self, route: &str, params: &Value) -> Result<Value, RpcError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((route.to_string(), params.clone()));

        if let Some(scripted) = state.scripted.get_mut(route).and_then(VecDeque::pop_front) {
            return scripted;
        }

        match route {
            "/document/editor/get" => {
                let id = params["document_id"].as_i64().unwrap();
                let Some(document) = state.documents.get(&id) else {
                    return Ok(json!({"error": "Document not found"}));
                };
                let content = document
                    .attachment_id
                    .and_then(|aid| state.attachments.get(&aid).cloned().flatten())
                    .map(|datas| codec::decode(&datas).unwrap())
                    .unwrap_or_default();
                Ok(json!({
                    "success": true,
                    "content": content,
                    "name": document.name,
                    "mimetype": "text/plain",
                    "is_editable": true,
                }))
            }
            "/document/editor/save" => {
                let id = params["document_id"].as_i64().unwrap();
                let content = params["content"].as_str().unwrap();
                let Some(document) = state.documents.get_mut(&id) else {
                    return Ok(json!({"error": "Document not found"}));
                };
                let attachment_id = *document.attachment_id.get_or_insert(id + 1000);
                state
                    .attachments
                    .insert(attachment_id, Some(codec::encode(content)));
                Ok(json!({"success": true, "message": "Document saved successfully"}))
            }
            "/web/dataset/call_kw/documents.document/read" => {
                let id = params["args"][0][0].as_i64().unwrap();
                Ok(match state.documents.get(&id) {
                    Some(document) => json!([{
                        "id": id,
                        "name": document.name,
                        "attachment_id": match document.attachment_id {
                            Some(aid) => json!([aid, document.name]),
                            None => json!(false),
                        },
                    }]),
                    None => json!([]),
                })
            }
            "/web/dataset/call_kw/ir.attachment/read" => {
                let id = params["args"][0][0].as_i64().unwrap();
                Ok(match state.attachments.get(&id) {
                    Some(datas) => json!([{
                        "id": id,
                        "datas": datas.clone().map(Value::String).unwrap_or(Value::Bool(false)),
                    }]),
                    None => json!([]),
                })
            }
            "/web/dataset/call_kw/ir.attachment/write" => {
                let id = params["args"][0][0].as_i64().unwrap();
                let datas = params["args"][1]["datas"].as_str().unwrap().to_string();
                state.attachments.insert(id, Some(datas));
                Ok(json!(true))
            }
            other => Err(RpcError::Malformed(format!("no route {}", other))),
        }
    }
}

#[async_trait]
impl RpcTransport for FakeBackend {
    async fn call(&self, route: &str, params: Value) -> Result<Value, RpcError> {
        self.handle(route, &params)
    }
}

/// Holds every call until the test releases a permit
pub struct GatedTransport {
    pub backend: Arc<FakeBackend>,
    pub gate: Arc<Semaphore>,
}

impl GatedTransport {
    pub fn new(backend: Arc<FakeBackend>) -> Self {
        Self {
            backend,
            gate: Arc::new(Semaphore::new(0)),
        }
    }
}

#[async_trait]
impl RpcTransport for GatedTransport {
    async fn call(&self, route: &str, params: Value) -> Result<Value, RpcError> {
        self.gate.acquire().await.unwrap().forget();
        self.backend.call(route, params).await
    }
}

pub fn factory(
    kind: GatewayKind,
    transport: Arc<dyn RpcTransport>,
) -> (EditorFactory, mpsc::UnboundedReceiver<Notification>) {
    let (notifier, rx) = ChannelNotifier::new();
    (
        EditorFactory::new(gateway::build(kind, transport), Arc::new(notifier)),
        rx,
    )
}

/// Open and load an editor for `id`
pub async fn open(
    kind: GatewayKind,
    backend: Arc<FakeBackend>,
    id: i64,
) -> (Editor, mpsc::UnboundedReceiver<Notification>) {
    let (factory, rx) = factory(kind, backend);
    let editor = factory
        .open(&InvocationContext::for_document(id))
        .await
        .expect("document id resolves");
    (editor, rx)
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut notifications = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        notifications.push(notification);
    }
    notifications
}
