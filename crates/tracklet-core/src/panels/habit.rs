//! Habit toggles panel.

use crate::client::WebhookClient;
use crate::error::TrackletError;
use crate::notify::{Notifier, outcome_notice};
use log::debug;
use std::sync::Arc;
use tracklet_protocol::{BackendOutcome, HabitKind, HabitRecord};

/// Form state and submission for the daily habits.
pub struct HabitPanel {
    client: WebhookClient,
    notifier: Arc<dyn Notifier>,
    form: HabitRecord,
    last_outcome: Option<BackendOutcome>,
}

impl HabitPanel {
    pub fn new(client: WebhookClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            form: HabitRecord::default(),
            last_outcome: None,
        }
    }

    pub fn form(&self) -> &HabitRecord {
        &self.form
    }

    /// Flip a habit; returns its new state.
    pub fn toggle(&mut self, kind: HabitKind) -> bool {
        self.form.toggle(kind)
    }

    pub fn set(&mut self, kind: HabitKind, done: bool) {
        self.form.set(kind, done);
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.form.note = note.into();
    }

    pub fn last_outcome(&self) -> Option<&BackendOutcome> {
        self.last_outcome.as_ref()
    }

    /// Submit the form. The form resets when the workflow ran and is kept
    /// otherwise so the user can retry.
    pub async fn submit(&mut self) -> Result<BackendOutcome, TrackletError> {
        let outcome = self.client.submit_habit(&self.form).await?;

        self.notifier.notify(outcome_notice(&outcome));
        if outcome.succeeded {
            debug!("habit submission accepted; resetting form");
            self.form = HabitRecord::default();
        }
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }
}
