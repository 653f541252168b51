//! Option merging
//!
//! Caller-supplied options are layered over operation defaults before they are
//! sent. Objects merge key by key, recursively; anything else (arrays, scalars,
//! `null`) in the override replaces the default wholesale.

use serde_json::{Map, Value};

/// Merge `overrides` onto `defaults` without touching either input.
pub fn deep_merge(defaults: &Value, overrides: &Value) -> Value {
    match (defaults, overrides) {
        (Value::Object(base), Value::Object(over)) => Value::Object(merge_maps(base, over)),
        (_, over) => over.clone(),
    }
}

fn merge_maps(base: &Map<String, Value>, over: &Map<String, Value>) -> Map<String, Value> {
    let mut out = base.clone();
    for (key, value) in over {
        let merged = match out.get(key) {
            Some(existing) => deep_merge(existing, value),
            None => value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    out
}
