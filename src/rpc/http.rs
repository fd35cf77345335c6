use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use super::envelope::{RpcRequest, RpcResponse};
use super::{RpcError, RpcTransport};

/// JSON-RPC over HTTP with a cookie-backed backend session
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open a backend session; the session cookie is kept for later calls
    pub async fn authenticate(
        &self,
        database: &str,
        login: &str,
        password: &str,
    ) -> Result<i64, RpcError> {
        let result = self
            .call(
                "/web/session/authenticate",
                json!({"db": database, "login": login, "password": password}),
            )
            .await?;

        let uid = parse_uid(&result).ok_or_else(|| RpcError::Authentication(login.to_string()))?;
        log::info!("authenticated as '{}' (uid {}) on {}", login, uid, database);
        Ok(uid)
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, route: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        log::debug!("rpc #{} -> {}", id, route);

        let response = self
            .client
            .post(self.url(route))
            .json(&RpcRequest::new(id, &params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("rpc #{} <- HTTP {}", id, status);
            return Err(RpcError::Status(status.as_u16()));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::Malformed(e.to_string()))?;
        envelope.into_result()
    }
}

/// `uid` of an authenticate result; `false` means the login was refused
fn parse_uid(result: &Value) -> Option<i64> {
    result.get("uid")?.as_i64()
}
