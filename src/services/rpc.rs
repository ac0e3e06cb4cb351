//! `Bug.attachments` queries over the tracker's JSON-RPC endpoint

use crate::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

/// One attachment as the tracker reports it, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAttachment {
    pub id: u64,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub last_change_time: String,
    /// Base64 payload; `None` when the query excluded it.
    #[serde(default)]
    pub data: Option<String>,
}

impl RawAttachment {
    /// Decode the base64 payload, if present.
    ///
    /// Tracker responses wrap long payloads across lines, so whitespace is
    /// stripped before decoding.
    pub fn decode_data(&self) -> Result<Option<Vec<u8>>> {
        let Some(encoded) = &self.data else {
            return Ok(None);
        };

        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = BASE64
            .decode(compact)
            .map_err(|e| Error::Parse(format!("attachment {}: invalid base64 data: {e}", self.id)))?;
        Ok(Some(bytes))
    }
}

/// Capability to list a bug's attachments. The production implementation
/// talks JSON-RPC; tests substitute canned responses.
pub trait AttachmentQuery {
    /// Fetch the attachments of `bug_id`. `include_data` asks the tracker
    /// to ship the (potentially large) base64 payloads as well.
    fn attachments(&self, bug_id: &str, include_data: bool) -> Result<Vec<RawAttachment>>;
}

/// Build the JSON-RPC request body for one `Bug.attachments` call.
#[must_use]
pub fn request_body(bug_id: &str, include_data: bool) -> serde_json::Value {
    let mut params = json!({ "ids": [bug_id] });
    if !include_data {
        // The data field dwarfs everything else; leave it on the server
        // unless a download was requested.
        params["exclude_fields"] = json!(["data"]);
    }

    json!({
        "method": "Bug.attachments",
        "params": [params],
        "id": 1,
    })
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<RpcResult>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcResult {
    bugs: HashMap<String, Vec<RawAttachment>>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    message: String,
}

/// Pull the attachment list for `bug_id` out of a `Bug.attachments` response.
pub fn parse_response(body: &str, bug_id: &str) -> Result<Vec<RawAttachment>> {
    let response: RpcResponse = serde_json::from_str(body)?;

    if let Some(err) = response.error {
        return Err(Error::Transport(format!(
            "tracker rejected Bug.attachments for bug {bug_id}: {} (code {})",
            err.message, err.code
        )));
    }

    let mut result = response.result.ok_or_else(|| {
        Error::Parse(format!(
            "Bug.attachments response for bug {bug_id} carries neither result nor error"
        ))
    })?;

    result
        .bugs
        .remove(bug_id)
        .ok_or_else(|| Error::Parse(format!("Bug.attachments response is missing bug {bug_id}")))
}

/// JSON-RPC client bound to one tracker's `jsonrpc.cgi`.
pub struct JsonRpcClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl JsonRpcClient {
    #[must_use]
    pub fn new(client: reqwest::blocking::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/jsonrpc.cgi", base_url.trim_end_matches('/')),
        }
    }
}

impl AttachmentQuery for JsonRpcClient {
    fn attachments(&self, bug_id: &str, include_data: bool) -> Result<Vec<RawAttachment>> {
        let body = request_body(bug_id, include_data);
        log::trace!("POST {}: {body}", self.endpoint);

        let response = self.client.post(&self.endpoint).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "POST {} returned {status}",
                self.endpoint
            )));
        }

        let text = response.text()?;
        parse_response(&text, bug_id)
    }
}
