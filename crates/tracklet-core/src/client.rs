//! Webhook client shared by the panels.

use crate::chart::ChartService;
use crate::error::TrackletError;
use crate::interpret::{interpret, needs_settle};
use crate::transport::{ReqwestTransport, WebhookTransport, parse_endpoint};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tracklet_config::{TimeoutsConfig, TrackletConfig};
use tracklet_protocol::{
    BackendOutcome, ChatMessage, EncodeRequest, HabitRecord, MeasurementRecord, WebhookRequest,
    Workflow,
};

/// Encodes records, performs the round trip and interprets the reply.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct WebhookClient {
    transport: Arc<dyn WebhookTransport>,
    charts: ChartService,
    timeouts: TimeoutsConfig,
    settle_delay: Duration,
}

impl WebhookClient {
    /// Build a client bound to the endpoint selected by the config.
    pub fn from_config(config: &TrackletConfig) -> Result<Self, TrackletError> {
        let endpoint = config.selected_endpoint()?;
        info!(
            "creating webhook client (use_test={}, settle_delay_ms={})",
            config.webhook.use_test, config.settle_delay_ms
        );
        let transport = ReqwestTransport::new(endpoint)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a client over an explicit transport.
    pub fn with_transport(
        config: &TrackletConfig,
        transport: Arc<dyn WebhookTransport>,
    ) -> Result<Self, TrackletError> {
        config.validate()?;
        Ok(Self {
            transport,
            charts: ChartService::new(&config.chart.base_url)?,
            timeouts: config.timeouts.clone(),
            settle_delay: config.settle_delay(),
        })
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Timeout applied to a workflow's calls.
    pub fn timeout_for(&self, workflow: Workflow) -> Duration {
        match workflow {
            Workflow::Habit | Workflow::Chat => self.timeouts.short(),
            Workflow::Physique => self.timeouts.long(),
        }
    }

    /// Full URL a request would be sent to, without sending it.
    pub fn preview_url(&self, request: &WebhookRequest) -> Result<String, TrackletError> {
        let mut url = parse_endpoint(self.endpoint())?;
        url.query_pairs_mut().extend_pairs(request.query_pairs());
        Ok(url.into())
    }

    /// Perform one round trip for an encoded request.
    pub async fn execute(&self, request: &WebhookRequest) -> BackendOutcome {
        let workflow = request.workflow;
        let timeout = self.timeout_for(workflow);
        let result = self.transport.send(request, timeout).await;
        let outcome = interpret(workflow, result, &self.charts);
        if needs_settle(&outcome) && !self.settle_delay.is_zero() {
            debug!(
                "no persistence acknowledgement; settling (workflow={}, delay_ms={})",
                workflow,
                self.settle_delay.as_millis()
            );
            tokio::time::sleep(self.settle_delay).await;
        }
        info!(
            "webhook call finished (workflow={}, status={:?}, succeeded={})",
            workflow, outcome.status, outcome.succeeded
        );
        outcome
    }

    /// Send today's habit flags.
    pub async fn submit_habit(&self, record: &HabitRecord) -> Result<BackendOutcome, TrackletError> {
        let request = record.to_request()?;
        debug!("submitting habits (note_len={})", record.note.len());
        Ok(self.execute(&request).await)
    }

    /// Send a measurement set for analysis.
    pub async fn submit_measurement(
        &self,
        record: &MeasurementRecord,
    ) -> Result<BackendOutcome, TrackletError> {
        let request = record.to_request()?;
        debug!("submitting measurements (note_len={})", record.note.len());
        Ok(self.execute(&request).await)
    }

    /// Send a chat message; blank messages are rejected before any call.
    pub async fn send_chat(&self, message: &ChatMessage) -> Result<BackendOutcome, TrackletError> {
        let request = message.to_request()?;
        debug!("sending chat message (len={})", message.text.len());
        Ok(self.execute(&request).await)
    }
}

impl std::fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookClient")
            .field("endpoint", &self.endpoint())
            .field("timeouts", &self.timeouts)
            .field("settle_delay", &self.settle_delay)
            .finish()
    }
}
