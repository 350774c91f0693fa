//! Public SDK surface for tracklet.
//!
//! This crate re-exports the building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use tracklet_config as config;
/// Re-export for convenience.
pub use tracklet_core as core;
/// Re-export for convenience.
pub use tracklet_protocol as protocol;

pub use tracklet_config::TrackletConfig;
pub use tracklet_core::{
    ChatSession, HabitPanel, MeasurementPanel, NotificationBus, Notifier, TrackletError,
    WebhookClient,
};
pub use tracklet_protocol::{BackendOutcome, Notice, NoticeLevel};

#[inline]
/// Initialize logging using env_logger (`RUST_LOG` controls the filter).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}
