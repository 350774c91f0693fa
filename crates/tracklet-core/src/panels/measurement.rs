//! Body measurement panel.

use crate::client::WebhookClient;
use crate::error::TrackletError;
use crate::notify::{Notifier, outcome_notice};
use log::debug;
use std::sync::Arc;
use tracklet_protocol::{BackendOutcome, BmiCategory, MeasurementField, MeasurementRecord};

/// Form state, local BMI preview and the last analysis result.
pub struct MeasurementPanel {
    client: WebhookClient,
    notifier: Arc<dyn Notifier>,
    form: MeasurementRecord,
    last_outcome: Option<BackendOutcome>,
}

impl MeasurementPanel {
    pub fn new(client: WebhookClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            form: MeasurementRecord::default(),
            last_outcome: None,
        }
    }

    pub fn form(&self) -> &MeasurementRecord {
        &self.form
    }

    /// Set a field from raw input; unparsable text is stored as 0.
    pub fn set_text(&mut self, field: MeasurementField, text: &str) -> f64 {
        self.form.set_text(field, text)
    }

    pub fn set(&mut self, field: MeasurementField, value: f64) {
        self.form.set(field, value);
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.form.note = note.into();
    }

    /// BMI of the current form, 0 until weight and height are positive.
    pub fn bmi(&self) -> f64 {
        self.form.bmi()
    }

    /// BMI rounded to one decimal for display.
    pub fn bmi_display(&self) -> String {
        format!("{:.1}", self.bmi())
    }

    /// Category of the current BMI, if there is one.
    pub fn bmi_category(&self) -> Option<BmiCategory> {
        let bmi = self.bmi();
        (bmi > 0.0).then(|| BmiCategory::from_bmi(bmi))
    }

    pub fn last_outcome(&self) -> Option<&BackendOutcome> {
        self.last_outcome.as_ref()
    }

    /// Analysis text from the most recent submission.
    pub fn assistant_text(&self) -> Option<&str> {
        self.last_outcome
            .as_ref()
            .and_then(|outcome| outcome.assistant_text.as_deref())
    }

    /// Progress chart from the most recent submission.
    pub fn chart_url(&self) -> Option<&str> {
        self.last_outcome
            .as_ref()
            .and_then(|outcome| outcome.chart_url.as_deref())
    }

    /// Submit the measurements. Resets the form when the workflow ran.
    pub async fn submit(&mut self) -> Result<BackendOutcome, TrackletError> {
        let outcome = self.client.submit_measurement(&self.form).await?;

        self.notifier.notify(outcome_notice(&outcome));
        if outcome.succeeded {
            debug!(
                "measurement submission accepted (has_text={}, has_chart={})",
                outcome.assistant_text.is_some(),
                outcome.chart_url.is_some()
            );
            self.form = MeasurementRecord::default();
        }
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }
}
