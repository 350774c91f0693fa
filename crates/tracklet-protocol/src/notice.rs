//! User-facing notices emitted after a round trip.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long success notices stay visible.
const SUCCESS_DURATION: Duration = Duration::from_millis(4000);
/// How long warning and error notices stay visible.
const PROBLEM_DURATION: Duration = Duration::from_millis(5000);

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    /// Display duration conventionally used for this level.
    pub fn default_duration(self) -> Duration {
        match self {
            NoticeLevel::Success => SUCCESS_DURATION,
            NoticeLevel::Warning | NoticeLevel::Error => PROBLEM_DURATION,
        }
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    pub duration: Duration,
}

impl Notice {
    /// Build a notice with the level's default duration.
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: Option<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message,
            duration: level.default_duration(),
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, Some(message.into()))
    }
}
