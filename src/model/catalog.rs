//! Item discovery.
//!
//! The language table is the closest thing the asset layout has to an item
//! registry: every renderable block or item carries a `block.<ns>.<name>` or
//! `item.<ns>.<name>` display-name key. Newer layouts additionally require a
//! matching `assets/<ns>/items/<name>.json` indirection document.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::assets::source::AssetSource;
use crate::foundation::math::compare_versions;
use crate::model::document::ModelKind;

/// Versions above this cutoff use the `assets/<ns>/items/` indirection layout.
pub(crate) const ITEMS_LAYOUT_GATE: &str = "1.21.3";

/// One renderable item discovered in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Namespace-qualified id, `minecraft:stone`.
    pub id: String,
    /// Local part of the id, `stone`.
    pub local: String,
    /// Block or item, from the language key prefix. The resolver refines this
    /// once the model is merged.
    pub kind: ModelKind,
    pub display_name: String,
}

/// All renderable items of a bundle, sorted by id.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    entries: Vec<CatalogEntry>,
}

impl ItemCatalog {
    /// Scan the bundle's `en_us` language table. A missing or malformed table
    /// yields an empty catalog.
    pub fn scan(source: &dyn AssetSource, version: &str) -> Self {
        let ns = source.namespace();
        let lang_path = format!("assets/{ns}/lang/en_us.json");
        let Some(Value::Object(lang)) = source.read_json(&lang_path) else {
            debug!("no language table at '{lang_path}'");
            return ItemCatalog::default();
        };

        let block_marker = format!("block.{ns}");
        let item_marker = format!("item.{ns}");
        let block_prefix = format!("block.{ns}.");
        let item_prefix = format!("item.{ns}.");
        let ns_colon = format!("{ns}:");

        let items_dir = (compare_versions(version, ITEMS_LAYOUT_GATE) == Ordering::Greater)
            .then(|| source.list_files(&format!("assets/{ns}/items")));

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (key, value) in &lang {
            if !key.contains(&block_marker) && !key.contains(&item_marker) {
                continue;
            }

            if let Some(files) = &items_dir {
                let remainder = key.replace(&block_prefix, "").replace(&item_prefix, "");
                if !files.contains(&format!("{remainder}.json")) {
                    continue;
                }
            }

            // "block.<ns>.oak_door.description" becomes "<ns>:oak_door".
            let qualified = key
                .replace(&block_prefix, &ns_colon)
                .replace(&item_prefix, &ns_colon);
            let id = qualified.split('.').next().unwrap_or_default().to_string();
            if id.is_empty() || !seen.insert(id.clone()) {
                continue;
            }

            let kind = if key.contains(&block_marker) {
                ModelKind::Block
            } else {
                ModelKind::Item
            };
            let local = id.strip_prefix(&ns_colon).unwrap_or(&id).to_string();
            entries.push(CatalogEntry {
                id,
                local,
                kind,
                display_name: value.as_str().unwrap_or_default().to_string(),
            });
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        ItemCatalog { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn find(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Exact-match lookup by localized display name.
    pub fn find_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.display_name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/catalog.rs"]
mod tests;
