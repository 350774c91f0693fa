//! Assistant chat session.

use crate::client::WebhookClient;
use crate::error::TrackletError;
use crate::interpret::{CHAT_APOLOGY, CHAT_PLACEHOLDER};
use crate::notify::{Notifier, outcome_notice};
use log::{debug, info};
use std::sync::Arc;
use tracklet_config::AssistantConfig;
use tracklet_protocol::{
    BackendOutcome, ChatMessage, ChatTurn, DeliveryStatus, EncodeRequest, TurnError,
};
use uuid::Uuid;

/// Chat transcript with the assistant persona.
///
/// Turns are appended in submission order. Each user turn starts as
/// `Sending` and resolves exactly once; a successful round trip appends the
/// assistant's answer and a failed one appends an apology.
pub struct ChatSession {
    client: WebhookClient,
    notifier: Arc<dyn Notifier>,
    assistant_name: String,
    transcript: Vec<ChatTurn>,
}

impl ChatSession {
    /// Start a session, opening with the configured greeting if any.
    pub fn new(
        client: WebhookClient,
        notifier: Arc<dyn Notifier>,
        assistant: &AssistantConfig,
    ) -> Self {
        let transcript = assistant
            .greeting
            .as_ref()
            .map(|greeting| vec![ChatTurn::assistant(greeting.clone())])
            .unwrap_or_default();
        Self {
            client,
            notifier,
            assistant_name: assistant.name.clone(),
            transcript,
        }
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Send a message. Blank input is rejected before a turn is recorded.
    pub async fn send(&mut self, text: &str) -> Result<BackendOutcome, TrackletError> {
        let message = ChatMessage::new(text.trim());
        let request = message.to_request()?;

        let turn = ChatTurn::user(message.text.clone());
        let turn_id = turn.id;
        self.transcript.push(turn);
        debug!(
            "chat turn submitted (turn_id={}, len={})",
            turn_id,
            message.text.len()
        );

        let outcome = self.client.execute(&request).await;

        let status = self.resolve_turn(turn_id, outcome.succeeded)?;
        let reply = if outcome.succeeded {
            outcome.assistant_text.as_deref().unwrap_or(CHAT_PLACEHOLDER)
        } else {
            self.notifier.notify(outcome_notice(&outcome));
            outcome.assistant_text.as_deref().unwrap_or(CHAT_APOLOGY)
        };
        self.transcript.push(ChatTurn::assistant(reply));
        info!(
            "chat turn resolved (turn_id={}, status={:?}, transcript_len={})",
            turn_id,
            status,
            self.transcript.len()
        );
        Ok(outcome)
    }

    /// Resolve a user turn's delivery state. Resolving twice is rejected.
    pub fn resolve_turn(
        &mut self,
        turn_id: Uuid,
        succeeded: bool,
    ) -> Result<DeliveryStatus, TurnError> {
        self.transcript
            .iter_mut()
            .find(|turn| turn.id == turn_id)
            .ok_or(TurnError::UnknownTurn(turn_id))?
            .resolve(succeeded)
    }
}
