//! Stateful controllers for the three tracking surfaces.
//!
//! Each panel owns its form or transcript and issues calls through
//! `&mut self`, so a panel never has more than one round trip in flight.

mod chat;
mod habit;
mod measurement;

pub use chat::ChatSession;
pub use habit::HabitPanel;
pub use measurement::MeasurementPanel;
