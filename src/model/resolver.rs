//! Parent-chain resolution and texture loading.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, warn};

use crate::assets::source::AssetSource;
use crate::compositor::{overlay, tint_in_place};
use crate::foundation::math::compare_versions;
use crate::model::catalog::{CatalogEntry, ITEMS_LAYOUT_GATE};
use crate::model::document::{ModelDocument, ModelKind, normalize_texture_key};
use crate::model::indirection;
use crate::model::tint::TintPalette;

/// Turns an item id into one fully merged [`ModelDocument`] with its textures
/// loaded and composited.
///
/// Every failure along the way is local: a missing document, parent, or
/// texture degrades to whatever was accumulated so far and the pipeline keeps
/// going.
pub struct ModelResolver<'a> {
    source: &'a dyn AssetSource,
    version: &'a str,
    palette: &'a TintPalette,
}

impl<'a> ModelResolver<'a> {
    pub fn new(source: &'a dyn AssetSource, version: &'a str, palette: &'a TintPalette) -> Self {
        ModelResolver {
            source,
            version,
            palette,
        }
    }

    /// Resolve one catalog entry into a merged document.
    pub fn resolve(&self, entry: &CatalogEntry) -> ModelDocument {
        let mut doc = ModelDocument::new(entry.id.clone(), entry.kind);

        let model_path = if compare_versions(self.version, ITEMS_LAYOUT_GATE) == Ordering::Greater {
            self.indirect_model_path(&entry.local)
        } else {
            let ns = self.source.namespace();
            Some(format!("assets/{ns}/models/item/{}.json", entry.local))
        };

        if let Some(path) = model_path {
            let mut visited = HashSet::new();
            self.merge_chain(&path, &mut doc, &mut visited);
        }

        self.load_textures(&mut doc);
        doc
    }

    /// Model path for layouts where `assets/<ns>/items/<local>.json` sits
    /// between the item and its model.
    fn indirect_model_path(&self, local: &str) -> Option<String> {
        let ns = self.source.namespace();
        let path = format!("assets/{ns}/items/{local}.json");
        let item_doc = self.source.read_json(&path)?;
        let id = indirection::resolve_model_id(&item_doc)?;
        if id.is_empty() {
            debug!("item document '{path}' resolves to an empty model id");
            return None;
        }
        Some(self.model_path(&id))
    }

    fn model_path(&self, id: &str) -> String {
        let ns = self.source.namespace();
        format!(
            "assets/{ns}/models/{}.json",
            id.replace(&format!("{ns}:"), "")
        )
    }

    /// Merge the document at `path` and, inline at its `parent` key, the rest
    /// of the chain. Reclassifies after each merged level so the final state
    /// reflects the full chain.
    fn merge_chain(&self, path: &str, doc: &mut ModelDocument, visited: &mut HashSet<String>) {
        if !visited.insert(path.to_string()) {
            warn!("parent chain of '{}' loops at '{path}'", doc.id);
            return;
        }
        let Some(value) = self.source.read_json(path) else {
            debug!("model document '{path}' missing or malformed");
            return;
        };
        let Some(map) = value.as_object() else {
            debug!("model document '{path}' is not an object");
            return;
        };

        doc.loaded_paths.push(path.to_string());
        for (key, v) in map {
            match key.as_str() {
                "elements" => doc.add_elements(v),
                "textures" => doc.add_textures(v),
                "display" => doc.add_displays(v),
                "parent" => {
                    if let Some(parent) = v.as_str() {
                        self.merge_chain(&self.model_path(parent), doc, visited);
                    }
                }
                _ => {}
            }
        }

        doc.kind = if doc.elements.is_empty() {
            ModelKind::Item
        } else {
            ModelKind::Block
        };
    }

    /// Load every literal texture binding, tint it if the palette says so,
    /// and stack layer-indexed bindings onto the shared `layer` slot.
    fn load_textures(&self, doc: &mut ModelDocument) {
        let ns = self.source.namespace();
        let ns_colon = format!("{ns}:");
        let item_local = doc.id.replace(&ns_colon, "");

        let bindings: Vec<(String, String)> = doc
            .textures
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        for (name, value) in bindings {
            if value.starts_with('#') {
                continue;
            }

            let texture_name = value.replace(&ns_colon, "");
            let texture_path = format!("assets/{ns}/textures/{texture_name}.png");
            let Some(mut raster) = self.source.read_raster(&texture_path) else {
                debug!("texture '{texture_path}' missing for '{}'", doc.id);
                continue;
            };

            if let Some(color) = self.palette.color_for(ns, &texture_name, &item_local) {
                tint_in_place(&mut raster, color);
            }

            let key = normalize_texture_key(&name).to_string();
            match doc.rasters.get(&key) {
                Some(existing) => {
                    let mut stacked = existing.clone();
                    overlay(&mut stacked, &raster, (0, 0));
                    doc.rasters.insert(key, stacked);
                }
                None => {
                    doc.rasters.insert(key, raster);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/resolver.rs"]
mod tests;
