//! Configuration schema for tracklet.

use crate::ConfigError;
use crate::env::{ENV_WEBHOOK_TEST_URL, ENV_WEBHOOK_URL};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root config for the tracklet client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackletConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    /// Wait applied after habit/measurement responses that carry no
    /// persistence acknowledgement. Zero disables it.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl Default for TrackletConfig {
    fn default() -> Self {
        Self {
            schema: None,
            webhook: WebhookConfig::default(),
            timeouts: TimeoutsConfig::default(),
            settle_delay_ms: default_settle_delay_ms(),
            chart: ChartConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

impl TrackletConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> TrackletConfigBuilder {
        TrackletConfigBuilder::new()
    }

    /// The webhook URL chosen by `webhook.use_test`.
    pub fn selected_endpoint(&self) -> Result<&str, ConfigError> {
        let (url, endpoint, key, env) = if self.webhook.use_test {
            (
                self.webhook.test_url.as_deref(),
                "test",
                "test_url",
                ENV_WEBHOOK_TEST_URL,
            )
        } else {
            (
                self.webhook.url.as_deref(),
                "production",
                "url",
                ENV_WEBHOOK_URL,
            )
        };
        match url.map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ConfigError::MissingEndpoint { endpoint, key, env }),
        }
    }

    /// Settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeouts.short_ms == 0 || self.timeouts.long_ms == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        let base = self.chart.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidField {
                path: "chart.base_url".to_string(),
                message: "expected http(s) url".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for assembling a `TrackletConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct TrackletConfigBuilder {
    config: TrackletConfig,
}

impl TrackletConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: TrackletConfig::default(),
        }
    }

    /// Set the production webhook URL.
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.config.webhook.url = Some(url.into());
        self
    }

    /// Set the test webhook URL.
    pub fn test_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.config.webhook.test_url = Some(url.into());
        self
    }

    /// Select the test endpoint instead of production.
    pub fn use_test_endpoint(mut self, use_test: bool) -> Self {
        self.config.webhook.use_test = use_test;
        self
    }

    /// Replace the timeout configuration.
    pub fn timeouts(mut self, timeouts: TimeoutsConfig) -> Self {
        self.config.timeouts = timeouts;
        self
    }

    /// Set the settle delay in milliseconds.
    pub fn settle_delay_ms(mut self, millis: u64) -> Self {
        self.config.settle_delay_ms = millis;
        self
    }

    /// Replace the chart service configuration.
    pub fn chart(mut self, chart: ChartConfig) -> Self {
        self.config.chart = chart;
        self
    }

    /// Replace the assistant persona configuration.
    pub fn assistant(mut self, assistant: AssistantConfig) -> Self {
        self.config.assistant = assistant;
        self
    }

    /// Finalize and return the built `TrackletConfig`.
    pub fn build(self) -> TrackletConfig {
        self.config
    }
}

/// The two webhook endpoints and the selector between them.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub test_url: Option<String>,
    #[serde(default)]
    pub use_test: bool,
}

/// Request timeouts per workflow class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeoutsConfig {
    /// Chat and habit calls.
    #[serde(default = "default_short_timeout_ms")]
    pub short_ms: u64,
    /// Measurement calls, which include AI analysis and chart generation.
    #[serde(default = "default_long_timeout_ms")]
    pub long_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            short_ms: default_short_timeout_ms(),
            long_ms: default_long_timeout_ms(),
        }
    }
}

impl TimeoutsConfig {
    pub fn short(&self) -> Duration {
        Duration::from_millis(self.short_ms)
    }

    pub fn long(&self) -> Duration {
        Duration::from_millis(self.long_ms)
    }
}

fn default_short_timeout_ms() -> u64 {
    10_000
}

fn default_long_timeout_ms() -> u64 {
    60_000
}

fn default_settle_delay_ms() -> u64 {
    1_500
}

/// External chart-rendering service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartConfig {
    #[serde(default = "default_chart_base_url")]
    pub base_url: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            base_url: default_chart_base_url(),
        }
    }
}

fn default_chart_base_url() -> String {
    "https://quickchart.io/chart".to_string()
}

/// Assistant persona shown in the chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_name")]
    pub name: String,
    /// Opening assistant turn; `None` starts with an empty transcript.
    #[serde(default = "default_greeting")]
    pub greeting: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            greeting: default_greeting(),
        }
    }
}

fn default_assistant_name() -> String {
    "Abidin".to_string()
}

fn default_greeting() -> Option<String> {
    Some(
        "Hey! I'm Abidin, your assistant. We can talk about your habits, your \
         physical progress or anything else. How are you today?"
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selects_production_endpoint_by_default() {
        let config = TrackletConfig::builder()
            .webhook_url("https://hooks.example.com/prod")
            .test_webhook_url("https://hooks.example.com/test")
            .build();
        assert_eq!(
            config.selected_endpoint().expect("endpoint"),
            "https://hooks.example.com/prod"
        );
    }

    #[test]
    fn selects_test_endpoint_when_flagged() {
        let config = TrackletConfig::builder()
            .webhook_url("https://hooks.example.com/prod")
            .test_webhook_url("https://hooks.example.com/test")
            .use_test_endpoint(true)
            .build();
        assert_eq!(
            config.selected_endpoint().expect("endpoint"),
            "https://hooks.example.com/test"
        );
    }

    #[test]
    fn missing_selected_endpoint_is_an_error() {
        let config = TrackletConfig::builder()
            .webhook_url("https://hooks.example.com/prod")
            .use_test_endpoint(true)
            .build();
        let err = config.selected_endpoint().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEndpoint {
                endpoint: "test",
                ..
            }
        ));
        assert!(err.to_string().contains(ENV_WEBHOOK_TEST_URL));
    }

    #[test]
    fn blank_endpoint_counts_as_missing() {
        let config = TrackletConfig::builder().webhook_url("   ").build();
        assert!(config.selected_endpoint().is_err());
    }

    #[test]
    fn rejects_zero_timeouts() {
        let config = TrackletConfig::builder()
            .timeouts(TimeoutsConfig {
                short_ms: 0,
                long_ms: 1,
            })
            .build();
        assert!(config.validate().is_err());
    }
}
