//! Folding config layers into one JSON value.

use serde_json::{Map, Value};

/// Fold `overlay` into `base`.
///
/// Objects merge key by key so a layer only needs the keys it changes, such
/// as `webhook.use_test`. Any other value, `null` included, replaces what the
/// lower layer had.
pub(super) fn overlay_layer(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            overlay_object(base_map, overlay_map)
        }
        (slot, value) => *slot = value,
    }
}

fn overlay_object(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => overlay_layer(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_keys_merge_and_scalars_replace() {
        let mut base = json!({
            "webhook": {"url": "https://prod.example/hook", "use_test": false},
            "timeouts": {"short_ms": 10000, "long_ms": 60000},
        });
        overlay_layer(
            &mut base,
            json!({
                "webhook": {"use_test": true, "test_url": "http://localhost:5678/hook"},
                "timeouts": {"long_ms": 90000},
            }),
        );
        assert_eq!(
            base,
            json!({
                "webhook": {
                    "url": "https://prod.example/hook",
                    "use_test": true,
                    "test_url": "http://localhost:5678/hook",
                },
                "timeouts": {"short_ms": 10000, "long_ms": 90000},
            })
        );
    }

    #[test]
    fn null_or_scalar_overlay_replaces_objects() {
        let mut base = json!({"assistant": {"greeting": "Hi"}, "chart": {"base_url": "x"}});
        overlay_layer(&mut base, json!({"assistant": {"greeting": null}, "chart": 3}));
        assert_eq!(base, json!({"assistant": {"greeting": null}, "chart": 3}));
    }
}
