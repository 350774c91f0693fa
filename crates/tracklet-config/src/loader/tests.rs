//! Tests for layered configuration loading.

use super::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Verify that a minimal config parses with defaults.
#[test]
fn parse_minimal_config() {
    let config = TrackletConfig::load_from_str("{}").expect("config");
    assert_eq!(config.timeouts.short_ms, 10_000);
    assert_eq!(config.timeouts.long_ms, 60_000);
    assert_eq!(config.settle_delay_ms, 1_500);
    assert_eq!(config.chart.base_url, "https://quickchart.io/chart");
    assert!(!config.webhook.use_test);
}

/// JSON5 niceties (comments, trailing commas, unquoted keys) are accepted.
#[test]
fn parse_full_json5_config() {
    let json5 = r#"{
        // production + test hooks
        webhook: {
            url: "https://hooks.example.com/prod",
            test_url: "https://hooks.example.com/test",
            use_test: true,
        },
        timeouts: { short_ms: 2000, long_ms: 30000 },
        settle_delay_ms: 0,
        assistant: { name: "Coach", greeting: null },
    }"#;
    let config = TrackletConfig::load_from_str(json5).expect("config");
    assert_eq!(
        config.selected_endpoint().expect("endpoint"),
        "https://hooks.example.com/test"
    );
    assert_eq!(config.settle_delay_ms, 0);
    assert_eq!(config.assistant.name, "Coach");
    assert_eq!(config.assistant.greeting, None);
}

/// Reject unexpected top-level config keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = TrackletConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

/// Reject wrongly typed nested values with their path.
#[test]
fn rejects_wrong_type_with_path() {
    let err = TrackletConfig::load_from_str(r#"{ webhook: { use_test: "yes" } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("webhook.use_test"));
}

/// Reject negative timeouts at schema level.
#[test]
fn rejects_negative_timeout() {
    let err = TrackletConfig::load_from_str(r#"{ timeouts: { short_ms: -1 } }"#).unwrap_err();
    assert!(format!("{err}").contains("timeouts.short_ms"));
}

/// Reject a chart service that is not an http(s) URL.
#[test]
fn rejects_non_http_chart_service() {
    let err =
        TrackletConfig::load_from_str(r#"{ chart: { base_url: "ftp://charts" } }"#).unwrap_err();
    assert!(format!("{err}").contains("chart.base_url"));
}

/// Runtime layers override cwd, which overrides user; objects merge.
#[test]
fn layered_config_precedence() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let cwd = root.join("work");
    fs::create_dir_all(&cwd).expect("cwd");

    let user_config = root.join("home").join(DEFAULT_CONFIG_FILE);
    write_json5(
        &user_config,
        r#"{ webhook: { url: "https://user.example.com", test_url: "https://user-test.example.com" } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ webhook: { url: "https://cwd.example.com" }, settle_delay_ms: 10 }"#,
    );
    let runtime = root.join("runtime.json5");
    write_json5(&runtime, r#"{ settle_delay_ms: 20 }"#);

    let mut options = LayeredConfigOptions::new(&cwd)
        .with_runtime_path(&runtime)
        .without_env();
    options.user_config_path = Some(user_config);

    let layered = TrackletConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.layers.len(), 3);
    assert_eq!(
        layered.config.webhook.url.as_deref(),
        Some("https://cwd.example.com")
    );
    assert_eq!(
        layered.config.webhook.test_url.as_deref(),
        Some("https://user-test.example.com")
    );
    assert_eq!(layered.config.settle_delay_ms, 20);
}

/// Missing optional layers are skipped; missing runtime layers are errors.
#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let mut options = LayeredConfigOptions::new(temp.path())
        .with_runtime_path(temp.path().join("absent.json5"))
        .without_env();
    options.user_config_path = Some(temp.path().join("nope.json5"));
    let err = TrackletConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

/// A bad key in any layer names the layer in the error.
#[test]
fn layer_errors_name_the_layer() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        r#"{ webhook: { endpoint: "x" } }"#,
    );
    let mut options = LayeredConfigOptions::new(temp.path()).without_env();
    options.user_config_path = None;
    let err = TrackletConfig::load_layered_with_options(options).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("webhook.endpoint"));
}

/// A user config that is also the cwd layer is loaded once.
#[test]
fn shared_user_and_cwd_file_loads_once() {
    let temp = TempDir::new().expect("tmp");
    let config_path = temp.path().join(DEFAULT_CONFIG_FILE);
    write_json5(&config_path, r#"{ settle_delay_ms: 0 }"#);

    let mut options = LayeredConfigOptions::new(temp.path()).without_env();
    options.user_config_path = Some(temp.path().join(".").join(DEFAULT_CONFIG_FILE));
    let layered = TrackletConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.layers.len(), 1);
    assert_eq!(layered.layers[0].source, ConfigLayerSource::User);
    assert_eq!(layered.config.settle_delay_ms, 0);
}
