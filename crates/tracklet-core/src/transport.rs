//! HTTP transport for the webhook endpoint.

use crate::error::{TrackletError, TransportError};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use tracklet_protocol::WebhookRequest;

/// Response body as received from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    /// Body parsed as JSON. A quoted JSON string lands here as `Value::String`.
    Json(Value),
    /// Body that is not JSON, kept verbatim.
    Text(String),
}

impl ResponseBody {
    /// Classify a raw body: blank, JSON, or bare text.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw.to_string()),
        }
    }
}

/// Status and body of a completed round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: ResponseBody,
}

impl HttpReply {
    pub fn new(status: u16, body: ResponseBody) -> Self {
        Self { status, body }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, ResponseBody::Json(body))
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, ResponseBody::Text(body.into()))
    }

    pub fn empty(status: u16) -> Self {
        Self::new(status, ResponseBody::Empty)
    }
}

/// Performs one webhook round trip.
///
/// Any status code is a successful transport result; only failures that
/// prevent observing a status are `TransportError`s.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// Issue the request and wait at most `timeout` for the full response.
    async fn send(
        &self,
        request: &WebhookRequest,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError>;

    /// Endpoint the transport is bound to.
    fn endpoint(&self) -> &str;
}

/// Validate an endpoint as an absolute http(s) URL.
pub fn parse_endpoint(url: &str) -> Result<Url, TrackletError> {
    let invalid = |reason: String| TrackletError::InvalidEndpoint {
        url: url.to_string(),
        reason,
    };
    let parsed = Url::parse(url.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(parsed)
}

/// `reqwest`-backed transport bound to a single endpoint.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    endpoint: Url,
    endpoint_str: String,
}

impl ReqwestTransport {
    /// Build a transport for the endpoint, failing on malformed URLs.
    pub fn new(endpoint: &str) -> Result<Self, TrackletError> {
        let endpoint = parse_endpoint(endpoint)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("tracklet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TrackletError::HttpClient)?;
        debug!("webhook transport ready (host={:?})", endpoint.host_str());
        Ok(Self {
            http,
            endpoint_str: endpoint.to_string(),
            endpoint,
        })
    }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &WebhookRequest,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let map_err = |err: reqwest::Error| classify_error(err, timeout_ms);
        debug!(
            "sending webhook request (workflow={}, message_len={}, timeout_ms={})",
            request.workflow,
            request.message.len(),
            timeout_ms
        );
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&request.query_pairs())
            .timeout(timeout)
            .send()
            .await
            .map_err(map_err)?;
        let status = response.status().as_u16();
        let raw = response.text().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout(timeout_ms)
            } else {
                TransportError::Body(err.to_string())
            }
        })?;
        debug!(
            "webhook responded (workflow={}, status={}, body_len={})",
            request.workflow,
            status,
            raw.len()
        );
        Ok(HttpReply::new(status, ResponseBody::parse(&raw)))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint_str
    }
}

fn classify_error(err: reqwest::Error, timeout_ms: u64) -> TransportError {
    warn!("webhook request failed: {err}");
    if err.is_timeout() {
        TransportError::Timeout(timeout_ms)
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn body_classification() {
        assert_eq!(ResponseBody::parse("  "), ResponseBody::Empty);
        assert_eq!(
            ResponseBody::parse(r#"{"response":"hi"}"#),
            ResponseBody::Json(json!({"response": "hi"}))
        );
        assert_eq!(
            ResponseBody::parse(r#""quoted""#),
            ResponseBody::Json(json!("quoted"))
        );
        assert_eq!(
            ResponseBody::parse("plain words"),
            ResponseBody::Text("plain words".to_string())
        );
    }

    #[test]
    fn endpoint_validation() {
        assert!(parse_endpoint("https://n8n.example.com/webhook/abc").is_ok());
        assert!(parse_endpoint("http://127.0.0.1:5678/webhook-test/abc").is_ok());
        assert!(matches!(
            parse_endpoint("ftp://example.com"),
            Err(TrackletError::InvalidEndpoint { .. })
        ));
        assert!(parse_endpoint("not a url").is_err());
    }
}
