//! Configuration models and layered config loading.
//!
//! This crate owns the tracklet config schema, validation, endpoint
//! selection and the environment overlay used by the client and CLI.

mod env;
mod error;
mod loader;
mod model;

/// Environment variable names recognised by the overlay.
pub use env::{ENV_SETTLE_DELAY_MS, ENV_USE_TEST_WEBHOOK, ENV_WEBHOOK_TEST_URL, ENV_WEBHOOK_URL};
/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Configuration schema models.
pub use model::*;
