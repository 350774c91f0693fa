//! Error types for the tracklet client.

use thiserror::Error;
use tracklet_config::ConfigError;
use tracklet_protocol::{EncodeError, TurnError};

/// Errors surfaced by client construction and panel operations.
///
/// Backend and network failures are not errors here; they arrive as failed
/// `BackendOutcome`s.
#[derive(Debug, Error)]
pub enum TrackletError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid webhook url {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Turn(#[from] TurnError),
}

/// Failures of a single round trip before a status code was observed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("could not connect to webhook: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}
