//! Item-model indirection documents (`assets/<ns>/items/*.json`).
//!
//! Newer asset layouts insert one of these between an item id and its model.
//! The document nests typed selector objects; rendering a static thumbnail
//! only needs the one model each selector would show in a neutral state, so
//! the walk picks a fixed branch per type instead of evaluating conditions.

use serde_json::Value;

use crate::foundation::math::approx_eq;

/// Extract the model id an indirection document points at.
///
/// Returns `None` for missing/malformed selectors or an unrecognized type;
/// the caller degrades to an empty document.
pub fn resolve_model_id(doc: &Value) -> Option<String> {
    walk(doc.get("model")?)
}

fn walk(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    match map.get("type")?.as_str()? {
        "minecraft:model" => map.get("model")?.as_str().map(str::to_string),
        "minecraft:special" => map.get("base")?.as_str().map(str::to_string),
        "minecraft:select" => walk(map.get("fallback")?),
        "minecraft:condition" => walk(map.get("on_false")?),
        "minecraft:range_dispatch" => {
            let entries = map.get("entries")?.as_array()?;
            for entry in entries {
                let threshold = entry
                    .get("threshold")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                if approx_eq(threshold, 0.0) {
                    return walk(entry.get("model")?);
                }
            }
            None
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/indirection.rs"]
mod tests;
