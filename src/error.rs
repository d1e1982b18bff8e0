use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure reaching or decoding the upstream collector.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid collector base URL: {0}")]
    BadBaseUrl(String),

    #[error("collector responded with status {0}")]
    Status(u16),

    #[error("collector unreachable: {0}")]
    Transport(reqwest::Error),

    #[error("collector returned malformed JSON: {0}")]
    Decode(serde_json::Error),
}

/// Client-facing proxy failure. Carries only the fixed per-endpoint
/// message; the upstream detail stays in the server logs.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProxyError {
    message: &'static str,
}

impl ProxyError {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_error_responds_with_500() {
        let response = ProxyError::new("failed to load volume metrics").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn upstream_status_display_names_the_code() {
        let err = UpstreamError::Status(502);
        assert_eq!(err.to_string(), "collector responded with status 502");
    }
}
