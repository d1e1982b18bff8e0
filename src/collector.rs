use std::collections::HashMap;
use std::env;

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, UpstreamError};

pub const VOLUME_PATH: &str = "/metrics/volume";
pub const ERROR_PATH: &str = "/metrics/error";
pub const TOP_SRC_PATH: &str = "/metrics/top-src";

const DEFAULT_BASE: &str = "http://localhost:8080";

/// HTTP client for the external metrics collector.
///
/// The client is deliberately thin: it forwards query parameters verbatim,
/// issues a single GET, and hands back the decoded JSON body. No retries, no
/// explicit timeout; whatever the transport defaults to applies.
///
/// The configured base is kept verbatim and resolved per request, so a
/// misconfigured base surfaces as a fetch failure rather than a silent
/// substitute.
#[derive(Debug, Clone)]
pub struct CollectorClient {
    http: Client,
    base: String,
}

impl CollectorClient {
    pub fn new(base: &str) -> Self {
        Self {
            http: Client::new(),
            base: base.to_string(),
        }
    }

    /// Reads `COLLECTOR_API_BASE`; unset or empty falls back to the default.
    pub fn from_env() -> Self {
        let base = env::var("COLLECTOR_API_BASE")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE.to_string());
        Self::new(&base)
    }

    /// GET `{base}{path}` with every inbound query parameter set on the URL.
    /// Any 2xx response yields the decoded JSON body, untouched.
    pub async fn fetch(&self, path: &str, query: &HashMap<String, String>) -> Result<Value> {
        let url = self.url_for(path, query)?;
        debug!("querying collector at {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(UpstreamError::Transport)?;
        serde_json::from_slice(&body).map_err(UpstreamError::Decode)
    }

    pub fn url_for(&self, path: &str, query: &HashMap<String, String>) -> Result<Url> {
        let mut url = Url::parse(&self.base)
            .map_err(|err| UpstreamError::BadBaseUrl(format!("{:?}: {}", self.base, err)))?;
        url.set_path(path);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}
