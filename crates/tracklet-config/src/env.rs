//! Environment-variable overrides applied on top of file layers.

use crate::{ConfigError, TrackletConfig};
use log::debug;

/// Production webhook URL.
pub const ENV_WEBHOOK_URL: &str = "TRACKLET_WEBHOOK_URL";
/// Test webhook URL.
pub const ENV_WEBHOOK_TEST_URL: &str = "TRACKLET_WEBHOOK_TEST_URL";
/// Selector between the two endpoints.
pub const ENV_USE_TEST_WEBHOOK: &str = "TRACKLET_USE_TEST_WEBHOOK";
/// Settle delay override in milliseconds.
pub const ENV_SETTLE_DELAY_MS: &str = "TRACKLET_SETTLE_DELAY_MS";

impl TrackletConfig {
    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Apply overrides using an arbitrary variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_WEBHOOK_URL) {
            debug!("webhook url overridden from env");
            self.webhook.url = Some(url);
        }
        if let Some(url) = lookup(ENV_WEBHOOK_TEST_URL) {
            debug!("test webhook url overridden from env");
            self.webhook.test_url = Some(url);
        }
        if let Some(value) = lookup(ENV_USE_TEST_WEBHOOK) {
            self.webhook.use_test = parse_flag(ENV_USE_TEST_WEBHOOK, &value)?;
            debug!("endpoint selector from env (use_test={})", self.webhook.use_test);
        }
        if let Some(value) = lookup(ENV_SETTLE_DELAY_MS) {
            self.settle_delay_ms = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_SETTLE_DELAY_MS.to_string(),
                value: value.clone(),
            })?;
        }
        Ok(())
    }
}

/// Parse a boolean-ish environment value.
fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
