//! Backend RPC
//!
//! The transport seam between gateways and the backend. Gateways only ever
//! see [`RpcTransport`]; the HTTP implementation lives in [`http`].

pub mod envelope;
pub mod http;

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;

pub use self::http::HttpTransport;

/// Failure to obtain a usable answer from the backend
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("server error {code}: {message}")]
    Server { code: i64, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("authentication rejected for login '{0}'")]
    Authentication(String),
}

/// Something that can post a JSON-RPC `call` to a backend route
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Call `route` with `params`, returning the unwrapped `result`
    async fn call(&self, route: &str, params: Value) -> Result<Value, RpcError>;
}

/// Route of the generic ORM entry point for `model.method`
pub fn call_kw_route(model: &str, method: &str) -> String {
    format!("/web/dataset/call_kw/{model}/{method}")
}

/// Invoke an ORM method through the generic `call_kw` endpoint
pub async fn call_kw(
    transport: &dyn RpcTransport,
    model: &str,
    method: &str,
    args: Value,
    kwargs: Value,
) -> Result<Value, RpcError> {
    let params = json!({
        "model": model,
        "method": method,
        "args": args,
        "kwargs": kwargs,
    });
    transport.call(&call_kw_route(model, method), params).await
}
