//! Wire types for the tracklet webhook: records, encoded requests, outcomes,
//! chat turns and notices.

mod chat;
mod error;
mod notice;
mod outcome;
mod record;

pub use chat::{Author, ChatTurn, DeliveryStatus};
pub use error::{EncodeError, TurnError};
pub use notice::{Notice, NoticeLevel};
pub use outcome::BackendOutcome;
pub use record::{
    BmiCategory, ChatMessage, HabitKind, HabitRecord, MeasurementField, MeasurementRecord, bmi,
    coerce_measurement,
};

use serde::{Deserialize, Serialize};

/// Command tag prefixed to habit submissions.
pub const HABIT_TAG: &str = "-msg";
/// Command tag prefixed to measurement submissions.
pub const MEASUREMENT_TAG: &str = "-msr";
/// Command tag prefixed to chat submissions.
pub const CHAT_TAG: &str = "-chat";

/// Backend workflow branch a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    /// Daily habit toggles.
    Habit,
    /// Assistant chat.
    Chat,
    /// Body measurements.
    Physique,
}

impl Workflow {
    /// Value of the `navigate` routing parameter.
    pub fn navigate(self) -> u8 {
        match self {
            Workflow::Habit => 0,
            Workflow::Chat => 1,
            Workflow::Physique => 2,
        }
    }

    /// Value of the `type` routing parameter; chat requests omit it.
    pub fn type_param(self) -> Option<&'static str> {
        match self {
            Workflow::Habit => Some("habit"),
            Workflow::Chat => None,
            Workflow::Physique => Some("physique"),
        }
    }

    /// Stable lowercase name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Workflow::Habit => "habit",
            Workflow::Chat => "chat",
            Workflow::Physique => "physique",
        }
    }
}

impl std::fmt::Display for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully encoded webhook call: the command string plus its routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRequest {
    /// Workflow branch the request targets.
    pub workflow: Workflow,
    /// Command string sent as the `message` parameter.
    pub message: String,
}

impl WebhookRequest {
    /// Build a request for a workflow from an already encoded command.
    pub fn new(workflow: Workflow, message: impl Into<String>) -> Self {
        Self {
            workflow,
            message: message.into(),
        }
    }

    /// Query parameters in the order the backend documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("message", self.message.clone()),
            ("navigate", self.workflow.navigate().to_string()),
        ];
        if let Some(kind) = self.workflow.type_param() {
            pairs.push(("type", kind.to_string()));
        }
        pairs
    }
}

/// Anything that can be encoded into a webhook request.
pub trait EncodeRequest {
    /// Encode the value, rejecting inputs the backend cannot accept.
    fn to_request(&self) -> Result<WebhookRequest, EncodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn routing_parameters_per_workflow() {
        assert_eq!(Workflow::Habit.navigate(), 0);
        assert_eq!(Workflow::Chat.navigate(), 1);
        assert_eq!(Workflow::Physique.navigate(), 2);
        assert_eq!(Workflow::Chat.type_param(), None);
        assert_eq!(Workflow::Physique.type_param(), Some("physique"));
    }

    #[test]
    fn chat_query_omits_type() {
        let request = WebhookRequest::new(Workflow::Chat, "-chat hi");
        assert_eq!(
            request.query_pairs(),
            vec![
                ("message", "-chat hi".to_string()),
                ("navigate", "1".to_string()),
            ]
        );
    }

    #[test]
    fn habit_query_carries_type() {
        let request = WebhookRequest::new(Workflow::Habit, "-msg 1,0,0,1,");
        let pairs = request.query_pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2], ("type", "habit".to_string()));
    }
}
