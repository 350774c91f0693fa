use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracklet_core::{HttpReply, ResponseBody, TransportError, WebhookTransport};
use tracklet_protocol::WebhookRequest;

const SCRIPTED_ENDPOINT: &str = "http://scripted.invalid/webhook";

/// A request observed by `ScriptedTransport`, with the timeout it was given.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub request: WebhookRequest,
    pub timeout: Duration,
}

/// Transport that replays queued replies in order and records every call.
///
/// When the script runs out, calls fail with a connect error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Result<HttpReply, TransportError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary result.
    pub fn push(&self, result: Result<HttpReply, TransportError>) -> &Self {
        self.script.lock().push_back(result);
        self
    }

    pub fn reply_json(&self, status: u16, body: Value) -> &Self {
        self.push(Ok(HttpReply::json(status, body)))
    }

    pub fn reply_text(&self, status: u16, body: impl Into<String>) -> &Self {
        self.push(Ok(HttpReply::text(status, body)))
    }

    pub fn reply_empty(&self, status: u16) -> &Self {
        self.push(Ok(HttpReply::new(status, ResponseBody::Empty)))
    }

    pub fn fail(&self, error: TransportError) -> &Self {
        self.push(Err(error))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl WebhookTransport for ScriptedTransport {
    async fn send(
        &self,
        request: &WebhookRequest,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        self.calls.lock().push(RecordedCall {
            request: request.clone(),
            timeout,
        });
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connect("script exhausted".to_string())))
    }

    fn endpoint(&self) -> &str {
        SCRIPTED_ENDPOINT
    }
}
