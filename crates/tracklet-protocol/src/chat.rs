//! Chat transcript turns and their delivery lifecycle.

use crate::TurnError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who wrote a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Assistant,
}

/// Delivery state of a user turn: `Sending` resolves once to `Sent` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sending,
    Sent,
    Failed,
}

/// Single entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub text: String,
    pub author: Author,
    pub timestamp: DateTime<Utc>,
    /// Present on user turns only.
    #[serde(default)]
    pub delivery: Option<DeliveryStatus>,
}

impl ChatTurn {
    /// New user turn in the `Sending` state.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            author: Author::User,
            timestamp: Utc::now(),
            delivery: Some(DeliveryStatus::Sending),
        }
    }

    /// New assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            author: Author::Assistant,
            timestamp: Utc::now(),
            delivery: None,
        }
    }

    /// Resolve a sending user turn to `Sent` or `Failed`.
    pub fn resolve(&mut self, succeeded: bool) -> Result<DeliveryStatus, TurnError> {
        match self.delivery {
            None => Err(TurnError::NotUserTurn(self.id)),
            Some(DeliveryStatus::Sending) => {
                let status = if succeeded {
                    DeliveryStatus::Sent
                } else {
                    DeliveryStatus::Failed
                };
                self.delivery = Some(status);
                Ok(status)
            }
            Some(status) => Err(TurnError::AlreadyResolved {
                id: self.id,
                status,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn user_turn_starts_sending() {
        let turn = ChatTurn::user("hi");
        assert_eq!(turn.delivery, Some(DeliveryStatus::Sending));
        assert_eq!(turn.author, Author::User);
    }

    #[test]
    fn resolution_is_final() {
        let mut turn = ChatTurn::user("hi");
        assert_eq!(turn.resolve(false), Ok(DeliveryStatus::Failed));
        let err = turn.resolve(true).unwrap_err();
        assert_eq!(
            err,
            TurnError::AlreadyResolved {
                id: turn.id,
                status: DeliveryStatus::Failed,
            }
        );
        assert_eq!(turn.delivery, Some(DeliveryStatus::Failed));
    }

    #[test]
    fn assistant_turn_has_no_delivery() {
        let mut turn = ChatTurn::assistant("hello");
        assert_eq!(turn.resolve(true), Err(TurnError::NotUserTurn(turn.id)));
    }
}
