//! Error types for encoding requests and tracking chat turns.

use crate::DeliveryStatus;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while encoding a record into a webhook request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Chat text was empty after trimming.
    #[error("chat message cannot be empty")]
    EmptyMessage,
}

/// Errors raised by illegal chat-turn transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    /// The turn already left the `sending` state.
    #[error("turn {id} already resolved as {status:?}")]
    AlreadyResolved { id: Uuid, status: DeliveryStatus },
    /// Only user turns carry a delivery status.
    #[error("turn {0} is not a user turn")]
    NotUserTurn(Uuid),
    /// No turn with this id exists in the transcript.
    #[error("unknown turn: {0}")]
    UnknownTurn(Uuid),
}
