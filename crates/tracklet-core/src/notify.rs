//! Notice delivery to front ends.

use log::debug;
use tokio::sync::broadcast;
use tracklet_protocol::{BackendOutcome, Notice, NoticeLevel, Workflow};

/// Receives notices produced by the panels.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Broadcast-backed notifier; every subscriber sees every notice.
#[derive(Clone, Debug)]
pub struct NotificationBus {
    sender: broadcast::Sender<Notice>,
}

impl NotificationBus {
    /// Create a new bus with the given channel buffer size.
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer);
        debug!("notification bus initialized (buffer={})", buffer);
        Self { sender }
    }

    /// Subscribe to the notice stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for NotificationBus {
    fn notify(&self, notice: Notice) {
        // No subscribers is fine; notices are fire-and-forget.
        let _ = self.sender.send(notice);
    }
}

/// Notice summarising a habit or measurement outcome.
pub fn outcome_notice(outcome: &BackendOutcome) -> Notice {
    let level = outcome.severity();
    let title = match level {
        NoticeLevel::Success => match outcome.workflow {
            Workflow::Habit => "Habits saved",
            Workflow::Physique => "Measurements processed",
            Workflow::Chat => "Message sent",
        },
        NoticeLevel::Warning => "Partially processed",
        NoticeLevel::Error if outcome.status.is_none() => "Connection error",
        NoticeLevel::Error => "Request failed",
    };
    Notice::new(level, title, Some(outcome.user_message.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn outcome(succeeded: bool, status: Option<u16>, db: Option<bool>) -> BackendOutcome {
        BackendOutcome {
            workflow: Workflow::Habit,
            succeeded,
            status,
            user_message: "msg".to_string(),
            assistant_text: None,
            chart_url: None,
            db_insert_succeeded: db,
            calculation_failed: None,
        }
    }

    #[test]
    fn notice_levels_and_titles() {
        let ok = outcome_notice(&outcome(true, Some(200), Some(true)));
        assert_eq!(ok.level, NoticeLevel::Success);
        assert_eq!(ok.title, "Habits saved");
        assert_eq!(ok.duration, Duration::from_millis(4000));

        let partial = outcome_notice(&outcome(true, Some(400), Some(false)));
        assert_eq!(partial.level, NoticeLevel::Warning);
        assert_eq!(partial.duration, Duration::from_millis(5000));

        let offline = outcome_notice(&outcome(false, None, Some(false)));
        assert_eq!(offline.title, "Connection error");
        assert_eq!(offline.message.as_deref(), Some("msg"));
    }

    #[tokio::test]
    async fn bus_fans_out_to_subscribers() {
        let bus = NotificationBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        bus.notify(Notice::success("Saved", "ok"));
        assert_eq!(first.recv().await.expect("first").title, "Saved");
        assert_eq!(second.recv().await.expect("second").title, "Saved");
    }
}
