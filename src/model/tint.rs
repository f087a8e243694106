//! Palette of color multipliers applied to specific textures while loading.
//!
//! The table is namespace-scoped. An entry maps a texture path (namespace
//! prefix stripped) to either a 6-hex-digit color applied uniformly, or a
//! nested map keyed by item local name for palette-driven variants such as
//! spawn eggs.

use std::collections::HashMap;

use anyhow::Context;
use serde_json::Value;

use crate::foundation::color::parse_hex_rgba;
use crate::foundation::error::BlockRenderResult;

#[derive(Debug, Clone, Default)]
pub struct TintPalette {
    table: HashMap<String, HashMap<String, Value>>,
}

impl TintPalette {
    pub fn empty() -> Self {
        TintPalette::default()
    }

    pub fn from_value(value: Value) -> BlockRenderResult<Self> {
        let table = serde_json::from_value(value).context("parse tint palette table")?;
        Ok(TintPalette { table })
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Tint for `texture_name` in `namespace`, if any. `item_local` picks the
    /// variant out of nested per-item entries.
    pub fn color_for(
        &self,
        namespace: &str,
        texture_name: &str,
        item_local: &str,
    ) -> Option<[u8; 4]> {
        let entry = self.table.get(namespace)?.get(texture_name)?;
        match entry {
            Value::String(color) if color.len() == 6 => parse_hex_rgba(color),
            Value::Object(variants) => variants
                .get(item_local)
                .and_then(Value::as_str)
                .and_then(parse_hex_rgba),
            _ => None,
        }
    }
}
