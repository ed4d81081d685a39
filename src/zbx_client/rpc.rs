use std::future::Future;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Invokes a Zabbix JSON-RPC method and decodes its `result` member.
///
/// Implementations own transport, authentication and retries; callers only see
/// the decoded value or the transport's error, unchanged.
pub trait ZbxRpc: Send + Sync {
    fn invoke<T>(&self, method: &str, params: Value) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send;
}

impl<R: ZbxRpc> ZbxRpc for &R {
    fn invoke<T>(&self, method: &str, params: Value) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send,
    {
        (**self).invoke(method, params)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RpcEnvelope<T> {
    pub(super) result: Option<T>,
    pub(super) error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RpcError {
    pub(super) code: i64,
    pub(super) message: String,
    #[serde(default)]
    pub(super) data: Option<String>,
}

#[derive(Serialize)]
pub(super) struct RpcRequest<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) method: &'a str,
    pub(super) params: &'a Value,
    pub(super) id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) auth: Option<&'a str>,
}

pub(super) fn body_preview(body: &[u8]) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }
    let end = body.len().min(BODY_PREVIEW_LIMIT);
    let mut preview = String::from_utf8_lossy(&body[..end]).to_string();
    if body.len() > BODY_PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview.replace('\n', "\\n")
}
