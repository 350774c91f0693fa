//! Maps raw webhook replies onto `BackendOutcome`s.
//!
//! Status mapping:
//!
//! | status | habit | physique | chat |
//! |---|---|---|---|
//! | 211 | ok, saved | ok, saved, calculated | ok |
//! | 411 | failed | ok, not saved, calculation failed | failed |
//! | other 2xx | ok, saved | ok, saved (legacy, calculation unknown) | ok |
//! | 400 | ok, not saved | ok, not saved, not calculated | failed, reply text or apology |
//! | anything else | failed | failed | failed |
//!
//! 211 and 411 are explicit persistence acknowledgements; other replies from
//! the habit and physique workflows are followed by the settle delay.

use crate::chart::ChartService;
use crate::error::TransportError;
use crate::transport::{HttpReply, ResponseBody};
use log::{debug, warn};
use serde_json::{Map, Value};
use tracklet_protocol::{BackendOutcome, Workflow};

/// Status acknowledging a persisted and analysed measurement.
pub const STATUS_PERSISTED: u16 = 211;
/// Status acknowledging a measurement whose calculation stage failed.
pub const STATUS_CALCULATION_FAILED: u16 = 411;
/// Status reporting the workflow ran but could not complete its write.
pub const STATUS_WORKFLOW_REJECTED: u16 = 400;

/// Assistant turn used when the chat workflow is unavailable.
pub const CHAT_APOLOGY: &str =
    "Sorry, I can't answer right now. Please try again in a little while.";
/// Assistant text used when a successful chat reply carries no text.
pub const CHAT_PLACEHOLDER: &str = "Got it, your message has been received.";

const HABIT_SAVED: &str = "Habit data sent successfully.";
const HABIT_NOT_SAVED: &str = "Your habits were received but could not be saved.";
const PHYSIQUE_SAVED: &str = "Your measurements were processed and saved.";
const PHYSIQUE_SENT: &str = "Measurement data sent successfully.";
const PHYSIQUE_CALCULATION_FAILED: &str =
    "Your measurements were received but the calculation step failed.";
const PHYSIQUE_NOT_SAVED: &str = "Your measurements were received but could not be saved.";
const CHAT_SENT: &str = "Message sent.";
const CHAT_UNAVAILABLE: &str = "The assistant is unavailable right now.";

/// Body fields the chat workflow may carry its answer in, by priority.
const CHAT_TEXT_FIELDS: [&str; 3] = ["response", "message", "reply"];
/// Body fields the physique workflow may carry its analysis in, by priority.
const PHYSIQUE_TEXT_FIELDS: [&str; 2] = ["ai_response", "response"];

/// Whether an outcome must be followed by the settle delay.
///
/// Only successful habit and physique replies without a 211/411
/// acknowledgement wait; failures are reported straight away.
pub fn needs_settle(outcome: &BackendOutcome) -> bool {
    if !outcome.succeeded {
        return false;
    }
    match (outcome.workflow, outcome.status) {
        (Workflow::Chat, _) | (_, None) => false,
        (_, Some(STATUS_PERSISTED | STATUS_CALCULATION_FAILED)) => false,
        _ => true,
    }
}

/// Classify one round trip.
pub fn interpret(
    workflow: Workflow,
    result: Result<HttpReply, TransportError>,
    charts: &ChartService,
) -> BackendOutcome {
    let reply = match result {
        Ok(reply) => reply,
        Err(err) => {
            warn!("webhook round trip failed (workflow={workflow}, error={err})");
            return failed(
                workflow,
                None,
                format!("Could not reach the server ({err}). Please try again."),
            );
        }
    };
    debug!(
        "interpreting reply (workflow={}, status={})",
        workflow, reply.status
    );
    match workflow {
        Workflow::Habit => interpret_habit(reply),
        Workflow::Physique => interpret_physique(reply, charts),
        Workflow::Chat => interpret_chat(reply),
    }
}

fn interpret_habit(reply: HttpReply) -> BackendOutcome {
    let status = reply.status;
    let (db_insert_succeeded, message) = match status {
        200..=299 => (true, HABIT_SAVED),
        STATUS_WORKFLOW_REJECTED => (false, HABIT_NOT_SAVED),
        _ => return unexpected_status(Workflow::Habit, status),
    };
    BackendOutcome {
        workflow: Workflow::Habit,
        succeeded: true,
        status: Some(status),
        user_message: message.to_string(),
        assistant_text: None,
        chart_url: None,
        db_insert_succeeded: Some(db_insert_succeeded),
        calculation_failed: None,
    }
}

fn interpret_physique(reply: HttpReply, charts: &ChartService) -> BackendOutcome {
    let status = reply.status;
    let (db_insert_succeeded, calculation_failed, message) = match status {
        STATUS_PERSISTED => (true, Some(false), PHYSIQUE_SAVED),
        STATUS_CALCULATION_FAILED => (false, Some(true), PHYSIQUE_CALCULATION_FAILED),
        STATUS_WORKFLOW_REJECTED => (false, Some(false), PHYSIQUE_NOT_SAVED),
        200..=299 => (true, None, PHYSIQUE_SENT),
        _ => return unexpected_status(Workflow::Physique, status),
    };
    let (assistant_text, chart_url) = match &reply.body {
        ResponseBody::Json(Value::Object(map)) => (
            first_text(map, &PHYSIQUE_TEXT_FIELDS),
            map.get("chart_data")
                .and_then(|chart_data| charts.chart_url(chart_data)),
        ),
        body => (bare_text(body), None),
    };
    BackendOutcome {
        workflow: Workflow::Physique,
        succeeded: true,
        status: Some(status),
        user_message: message.to_string(),
        assistant_text,
        chart_url,
        db_insert_succeeded: Some(db_insert_succeeded),
        calculation_failed,
    }
}

fn interpret_chat(reply: HttpReply) -> BackendOutcome {
    let status = reply.status;
    let text = match &reply.body {
        ResponseBody::Json(Value::Object(map)) => first_text(map, &CHAT_TEXT_FIELDS),
        body => bare_text(body),
    };
    match status {
        200..=299 => BackendOutcome {
            workflow: Workflow::Chat,
            succeeded: true,
            status: Some(status),
            user_message: CHAT_SENT.to_string(),
            assistant_text: Some(text.unwrap_or_else(|| CHAT_PLACEHOLDER.to_string())),
            chart_url: None,
            db_insert_succeeded: None,
            calculation_failed: None,
        },
        STATUS_WORKFLOW_REJECTED => BackendOutcome {
            assistant_text: Some(text.unwrap_or_else(|| CHAT_APOLOGY.to_string())),
            ..failed(Workflow::Chat, Some(status), CHAT_UNAVAILABLE.to_string())
        },
        _ => unexpected_status(Workflow::Chat, status),
    }
}

fn unexpected_status(workflow: Workflow, status: u16) -> BackendOutcome {
    warn!("unexpected webhook status (workflow={workflow}, status={status})");
    failed(
        workflow,
        Some(status),
        format!("The server returned an unexpected response (HTTP {status}). Please try again."),
    )
}

/// Failed outcome with stage flags set to false where the workflow has them.
fn failed(workflow: Workflow, status: Option<u16>, user_message: String) -> BackendOutcome {
    let (db_insert_succeeded, calculation_failed) = match workflow {
        Workflow::Habit => (Some(false), None),
        Workflow::Physique => (Some(false), Some(false)),
        Workflow::Chat => (None, None),
    };
    BackendOutcome {
        workflow,
        succeeded: false,
        status,
        user_message,
        assistant_text: None,
        chart_url: None,
        db_insert_succeeded,
        calculation_failed,
    }
}

fn first_text(map: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|field| map.get(*field).and_then(Value::as_str))
        .find_map(non_blank)
}

fn bare_text(body: &ResponseBody) -> Option<String> {
    match body {
        ResponseBody::Text(text) => non_blank(text),
        ResponseBody::Json(Value::String(text)) => non_blank(text),
        _ => None,
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn charts() -> ChartService {
        ChartService::new("https://quickchart.io/chart").expect("charts")
    }

    fn run(workflow: Workflow, reply: HttpReply) -> BackendOutcome {
        interpret(workflow, Ok(reply), &charts())
    }

    #[test]
    fn habit_success_and_rejection() {
        let ok = run(Workflow::Habit, HttpReply::empty(200));
        assert!(ok.succeeded);
        assert_eq!(ok.db_insert_succeeded, Some(true));
        assert_eq!(ok.calculation_failed, None);

        let rejected = run(Workflow::Habit, HttpReply::empty(400));
        assert!(rejected.succeeded);
        assert_eq!(rejected.db_insert_succeeded, Some(false));
    }

    #[test]
    fn physique_acknowledgement_codes() {
        let saved = run(Workflow::Physique, HttpReply::empty(211));
        assert!(saved.succeeded);
        assert_eq!(saved.db_insert_succeeded, Some(true));
        assert_eq!(saved.calculation_failed, Some(false));

        let calc = run(Workflow::Physique, HttpReply::empty(411));
        assert!(calc.succeeded);
        assert_eq!(calc.db_insert_succeeded, Some(false));
        assert_eq!(calc.calculation_failed, Some(true));

        let rejected = run(Workflow::Physique, HttpReply::empty(400));
        assert!(rejected.succeeded);
        assert_eq!(rejected.db_insert_succeeded, Some(false));
        assert_eq!(rejected.calculation_failed, Some(false));

        let legacy = run(Workflow::Physique, HttpReply::empty(200));
        assert!(legacy.succeeded);
        assert_eq!(legacy.db_insert_succeeded, Some(true));
        assert_eq!(legacy.calculation_failed, None);
    }

    #[test]
    fn physique_body_fields() {
        let chart = json!({"type": "line", "data": {"datasets": []}});
        let outcome = run(
            Workflow::Physique,
            HttpReply::json(
                211,
                json!({
                    "ai_response": "Down 0.4 kg this week.",
                    "response": "ignored",
                    "chart_data": chart.to_string(),
                }),
            ),
        );
        assert_eq!(
            outcome.assistant_text.as_deref(),
            Some("Down 0.4 kg this week.")
        );
        assert!(
            outcome
                .chart_url_or_empty()
                .starts_with("https://quickchart.io/chart?c=")
        );

        let fallback = run(
            Workflow::Physique,
            HttpReply::json(211, json!({"response": "Keep going", "chart_data": "{oops"})),
        );
        assert_eq!(fallback.assistant_text.as_deref(), Some("Keep going"));
        assert_eq!(fallback.chart_url, None);
        assert!(fallback.succeeded);
    }

    #[test]
    fn chat_body_shapes() {
        let bare = run(Workflow::Chat, HttpReply::text(200, "Hello there"));
        assert_eq!(bare.assistant_text.as_deref(), Some("Hello there"));

        let quoted = run(Workflow::Chat, HttpReply::json(200, json!("Quoted hello")));
        assert_eq!(quoted.assistant_text.as_deref(), Some("Quoted hello"));

        let object = run(
            Workflow::Chat,
            HttpReply::json(200, json!({"response": " ", "message": "From message"})),
        );
        assert_eq!(object.assistant_text.as_deref(), Some("From message"));

        let reply = run(Workflow::Chat, HttpReply::json(200, json!({"reply": "From reply"})));
        assert_eq!(reply.assistant_text.as_deref(), Some("From reply"));

        let empty = run(Workflow::Chat, HttpReply::empty(200));
        assert!(empty.succeeded);
        assert_eq!(empty.assistant_text.as_deref(), Some(CHAT_PLACEHOLDER));
    }

    #[test]
    fn chat_rejection_apologises() {
        let outcome = run(Workflow::Chat, HttpReply::empty(400));
        assert!(!outcome.succeeded);
        assert_eq!(outcome.assistant_text.as_deref(), Some(CHAT_APOLOGY));
        assert_eq!(outcome.db_insert_succeeded, None);

        let explained = run(
            Workflow::Chat,
            HttpReply::json(400, json!({"response": "Abidin is offline until 9am."})),
        );
        assert!(!explained.succeeded);
        assert_eq!(
            explained.assistant_text.as_deref(),
            Some("Abidin is offline until 9am.")
        );

        let blank = run(Workflow::Chat, HttpReply::text(400, "  "));
        assert_eq!(blank.assistant_text.as_deref(), Some(CHAT_APOLOGY));
    }

    #[test]
    fn unexpected_status_fails_with_flags_cleared() {
        let habit = run(Workflow::Habit, HttpReply::empty(500));
        assert!(!habit.succeeded);
        assert_eq!(habit.status, Some(500));
        assert_eq!(habit.db_insert_succeeded, Some(false));

        let physique = run(Workflow::Physique, HttpReply::empty(302));
        assert!(!physique.succeeded);
        assert_eq!(physique.db_insert_succeeded, Some(false));
        assert_eq!(physique.calculation_failed, Some(false));
    }

    #[test]
    fn timeouts_fail_every_workflow() {
        for workflow in [Workflow::Habit, Workflow::Physique, Workflow::Chat] {
            let outcome = interpret(
                workflow,
                Err(TransportError::Timeout(10_000)),
                &charts(),
            );
            assert!(!outcome.succeeded);
            assert_eq!(outcome.status, None);
            assert_ne!(outcome.db_insert_succeeded, Some(true));
            assert_ne!(outcome.calculation_failed, Some(true));
        }
    }

    #[test]
    fn settle_only_without_acknowledgement() {
        let settles = |workflow, reply| needs_settle(&run(workflow, reply));
        assert!(settles(Workflow::Habit, HttpReply::empty(200)));
        assert!(settles(Workflow::Habit, HttpReply::empty(400)));
        assert!(settles(Workflow::Physique, HttpReply::empty(200)));
        assert!(!settles(Workflow::Physique, HttpReply::empty(211)));
        assert!(!settles(Workflow::Physique, HttpReply::empty(411)));
        assert!(!settles(Workflow::Chat, HttpReply::empty(200)));
    }

    #[test]
    fn failures_never_settle() {
        assert!(!needs_settle(&run(Workflow::Habit, HttpReply::empty(500))));
        assert!(!needs_settle(&run(Workflow::Physique, HttpReply::empty(302))));
        assert!(!needs_settle(&interpret(
            Workflow::Habit,
            Err(TransportError::Timeout(10_000)),
            &charts(),
        )));
    }
}
