//! Chart URL synthesis from backend chart specifications.

use crate::error::TrackletError;
use crate::transport::parse_endpoint;
use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Url;
use serde_json::Value;

/// Bytes left alone by `encodeURIComponent`; everything else is escaped.
const COMPONENT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Chart rendering service that takes its specification in the `c` parameter.
#[derive(Debug, Clone)]
pub struct ChartService {
    base: Url,
}

impl ChartService {
    pub fn new(base_url: &str) -> Result<Self, TrackletError> {
        Ok(Self {
            base: parse_endpoint(base_url)?,
        })
    }

    /// Build the chart URL for a `chart_data` value.
    ///
    /// Accepts the chart object itself or a JSON string encoding it. Anything
    /// that does not decode to an object yields `None`.
    pub fn chart_url(&self, chart_data: &Value) -> Option<String> {
        let Some(spec) = decode_spec(chart_data) else {
            debug!("chart_data not decodable; skipping chart");
            return None;
        };
        let mut url = self.base.clone();
        url.set_query(Some(&format!("c={}", utf8_percent_encode(&spec, COMPONENT_ESCAPE))));
        Some(url.into())
    }
}

/// Compact JSON for the chart object carried by `chart_data`.
fn decode_spec(chart_data: &Value) -> Option<String> {
    match chart_data {
        Value::Object(_) => Some(chart_data.to_string()),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(parsed @ Value::Object(_)) => Some(parsed.to_string()),
            _ => None,
        },
        _ => None,
    }
}
