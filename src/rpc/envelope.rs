//! JSON-RPC 2.0 envelopes as spoken by the backend's web controllers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RpcError;

/// Outgoing request envelope
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: &'a Value,
    id: u64,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, params: &'a Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "call",
            params,
            id,
        }
    }
}

/// Incoming response envelope
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

/// `error` member of a failed response
#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<RpcErrorData>,
}

/// Server-side exception details
#[derive(Debug, Deserialize)]
pub struct RpcErrorData {
    pub name: Option<String>,
    pub message: Option<String>,
}

impl RpcResponse {
    /// Unwrap the envelope, preferring the exception message over the generic one
    pub fn into_result(self) -> Result<Value, RpcError> {
        if let Some(error) = self.error {
            let message = error
                .data
                .and_then(|data| data.message)
                .filter(|message| !message.is_empty())
                .unwrap_or(error.message);
            return Err(RpcError::Server {
                code: error.code,
                message,
            });
        }

        Ok(self.result.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_as_call() {
        let params = json!({"document_id": 42});
        let request = RpcRequest::new(7, &params);
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            json!({
                "jsonrpc": "2.0",
                "method": "call",
                "params": {"document_id": 42},
                "id": 7
            })
        );
    }

    #[test]
    fn result_is_returned() {
        let response: RpcResponse =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": {"success": true}}))
                .unwrap();
        assert_eq!(response.into_result().unwrap(), json!({"success": true}));
    }

    #[test]
    fn null_result_is_not_an_error() {
        let response: RpcResponse =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": null})).unwrap();
        assert_eq!(response.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn server_error_prefers_exception_message() {
        let response: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": 200,
                "message": "Odoo Server Error",
                "data": {"name": "odoo.exceptions.UserError", "message": "Error saving document: locked"}
            }
        }))
        .unwrap();

        match response.into_result() {
            Err(RpcError::Server { code, message }) => {
                assert_eq!(code, 200);
                assert_eq!(message, "Error saving document: locked");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn server_error_without_data_keeps_message() {
        let response: RpcResponse = serde_json::from_value(json!({
            "error": {"code": 100, "message": "Session expired"}
        }))
        .unwrap();

        match response.into_result() {
            Err(RpcError::Server { message, .. }) => assert_eq!(message, "Session expired"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
