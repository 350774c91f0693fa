//! Test helpers shared across tracklet crates.

pub mod notifier;
pub mod transport;

pub use notifier::RecordingNotifier;
pub use transport::{RecordedCall, ScriptedTransport};
