//! Normalized result of one webhook round trip.

use crate::{NoticeLevel, Workflow};
use serde::{Deserialize, Serialize};

/// Typed outcome the panels consume after a round trip.
///
/// `db_insert_succeeded` and `calculation_failed` are `None` when the
/// workflow has no such stage (chat) or the status does not speak to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendOutcome {
    pub workflow: Workflow,
    /// Whether the backend workflow ran.
    pub succeeded: bool,
    /// HTTP status, absent on transport failures.
    pub status: Option<u16>,
    /// Message shown to the user.
    pub user_message: String,
    #[serde(default)]
    pub assistant_text: Option<String>,
    #[serde(default)]
    pub chart_url: Option<String>,
    #[serde(default)]
    pub db_insert_succeeded: Option<bool>,
    #[serde(default)]
    pub calculation_failed: Option<bool>,
}

impl BackendOutcome {
    /// Chart URL, or an empty string when no chart was produced.
    pub fn chart_url_or_empty(&self) -> &str {
        self.chart_url.as_deref().unwrap_or_default()
    }

    /// Whether the workflow ran but one of its stages reported failure.
    pub fn is_degraded(&self) -> bool {
        self.succeeded
            && (self.db_insert_succeeded == Some(false) || self.calculation_failed == Some(true))
    }

    /// Severity the front end should present.
    pub fn severity(&self) -> NoticeLevel {
        if !self.succeeded {
            NoticeLevel::Error
        } else if self.is_degraded() {
            NoticeLevel::Warning
        } else {
            NoticeLevel::Success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn outcome() -> BackendOutcome {
        BackendOutcome {
            workflow: Workflow::Physique,
            succeeded: true,
            status: Some(211),
            user_message: "saved".to_string(),
            assistant_text: None,
            chart_url: None,
            db_insert_succeeded: Some(true),
            calculation_failed: Some(false),
        }
    }

    #[test]
    fn severity_tracks_stage_flags() {
        assert_eq!(outcome().severity(), NoticeLevel::Success);

        let calc_failed = BackendOutcome {
            db_insert_succeeded: Some(false),
            calculation_failed: Some(true),
            ..outcome()
        };
        assert_eq!(calc_failed.severity(), NoticeLevel::Warning);

        let failed = BackendOutcome {
            succeeded: false,
            status: None,
            ..outcome()
        };
        assert_eq!(failed.severity(), NoticeLevel::Error);
    }

    #[test]
    fn missing_chart_is_empty() {
        assert_eq!(outcome().chart_url_or_empty(), "");
    }
}
