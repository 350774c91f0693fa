//! Webhook client, response interpretation and panel controllers for
//! tracklet.
//!
//! A `WebhookClient` encodes records from `tracklet-protocol`, performs a
//! single GET round trip through a `WebhookTransport` and turns whatever
//! comes back into a `BackendOutcome`. The panels wrap the client with form
//! or transcript state and publish notices through a `Notifier`.

pub mod chart;
pub mod client;
pub mod error;
pub mod interpret;
pub mod notify;
pub mod panels;
pub mod transport;

pub use chart::ChartService;
pub use client::WebhookClient;
pub use error::{TrackletError, TransportError};
pub use interpret::{CHAT_APOLOGY, CHAT_PLACEHOLDER, interpret, needs_settle};
pub use notify::{NotificationBus, Notifier, outcome_notice};
pub use panels::{ChatSession, HabitPanel, MeasurementPanel};
pub use transport::{HttpReply, ReqwestTransport, ResponseBody, WebhookTransport};
