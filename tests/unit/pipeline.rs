use super::*;

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::json;

struct MemSource {
    json: HashMap<String, serde_json::Value>,
    rasters: HashMap<String, Raster>,
    files: Vec<String>,
}

impl MemSource {
    fn new() -> Self {
        MemSource {
            json: HashMap::new(),
            rasters: HashMap::new(),
            files: Vec::new(),
        }
    }
}

impl AssetSource for MemSource {
    fn exists(&self, path: &str) -> bool {
        self.json.contains_key(path)
            || self.rasters.contains_key(path)
            || self.files.iter().any(|f| f == path)
    }

    fn read_json(&self, path: &str) -> Option<serde_json::Value> {
        self.json.get(path).cloned()
    }

    fn read_raster(&self, path: &str) -> Option<Raster> {
        self.rasters.get(path).cloned()
    }

    fn list_files(&self, dir: &str) -> Vec<String> {
        let prefix = format!("{dir}/");
        self.files
            .iter()
            .filter_map(|f| f.strip_prefix(&prefix))
            .map(str::to_string)
            .collect()
    }

    fn namespace(&self) -> &str {
        "minecraft"
    }
}

fn entry(local: &str, kind: ModelKind) -> CatalogEntry {
    CatalogEntry {
        id: format!("minecraft:{local}"),
        local: local.to_string(),
        kind,
        display_name: local.to_string(),
    }
}

fn stick_source() -> MemSource {
    let mut source = MemSource::new();
    source.json.insert(
        "assets/minecraft/models/item/stick.json".to_string(),
        json!({ "textures": { "layer0": "minecraft:item/stick" } }),
    );
    source.rasters.insert(
        "assets/minecraft/textures/item/stick.png".to_string(),
        Raster::filled(16, 16, [200, 30, 30, 255]),
    );
    source
}

fn stone_source() -> MemSource {
    let mut source = MemSource::new();
    let faces: serde_json::Value = json!({
        "up": { "texture": "#all" },
        "down": { "texture": "#all" },
        "north": { "texture": "#all" },
        "south": { "texture": "#all" },
        "west": { "texture": "#all" },
        "east": { "texture": "#all" }
    });
    source.json.insert(
        "assets/minecraft/models/item/stone.json".to_string(),
        json!({
            "textures": { "all": "minecraft:block/stone" },
            "elements": [ { "from": [0, 0, 0], "to": [16, 16, 16], "faces": faces } ]
        }),
    );
    source.rasters.insert(
        "assets/minecraft/textures/block/stone.png".to_string(),
        Raster::filled(16, 16, [180, 180, 180, 255]),
    );
    source
}

fn options(width: u32, height: u32) -> RenderOptions {
    RenderOptions {
        width,
        height,
        camera: CameraMode::Perspective,
        background: [9, 9, 9, 255],
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!(
        "blockrender_{name}_{}_{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn item_entry_renders_its_layer_texture_upscaled() {
    let source = stick_source();
    let palette = TintPalette::empty();
    let pipeline = ThumbnailPipeline::new(&source, "1.21", &palette, options(64, 64));

    let thumb = pipeline.render_entry(&entry("stick", ModelKind::Item)).unwrap();
    assert_eq!(thumb.file_name, "minecraft_stick_x64.png");
    assert_eq!(thumb.image.width(), 64);
    assert_eq!(thumb.image.height(), 64);
    assert_eq!(thumb.image.pixel(32, 32), [200, 30, 30, 255]);
}

#[test]
fn item_without_any_texture_yields_nothing() {
    let mut source = MemSource::new();
    source.json.insert(
        "assets/minecraft/models/item/ghost.json".to_string(),
        json!({ "textures": {} }),
    );
    let palette = TintPalette::empty();
    let pipeline = ThumbnailPipeline::new(&source, "1.21", &palette, options(64, 64));

    assert!(pipeline.render_entry(&entry("ghost", ModelKind::Item)).is_none());
}

#[test]
fn block_entry_rasterizes_over_the_background() {
    let source = stone_source();
    let palette = TintPalette::empty();
    let pipeline = ThumbnailPipeline::new(&source, "1.21", &palette, options(32, 32));

    let thumb = pipeline.render_entry(&entry("stone", ModelKind::Item)).unwrap();
    assert_eq!(thumb.image.width(), 32);
    assert_eq!(thumb.image.height(), 32);
    // The tilted cube overfills the tight perspective frustum.
    let center = thumb.image.pixel(16, 16);
    assert_ne!(center, [9, 9, 9, 255]);
    assert_eq!(center[3], 255);
}

#[test]
fn block_without_usable_textures_is_background_only() {
    let mut source = stone_source();
    source.rasters.clear();
    let palette = TintPalette::empty();
    let pipeline = ThumbnailPipeline::new(&source, "1.21", &palette, options(32, 32));

    let thumb = pipeline.render_entry(&entry("stone", ModelKind::Item)).unwrap();
    assert_eq!(thumb.image.pixel(16, 16), [9, 9, 9, 255]);
    assert_eq!(thumb.image.pixel(0, 0), [9, 9, 9, 255]);
}

#[test]
fn missing_document_with_block_kind_still_renders() {
    let source = MemSource::new();
    let palette = TintPalette::empty();
    let pipeline = ThumbnailPipeline::new(&source, "1.21", &palette, options(16, 16));

    let thumb = pipeline.render_entry(&entry("mystery", ModelKind::Block)).unwrap();
    assert_eq!(thumb.image.pixel(8, 8), [9, 9, 9, 255]);
}

#[test]
fn output_name_flattens_the_namespace_separator() {
    assert_eq!(
        output_file_name("minecraft:oak_log", 128),
        "minecraft_oak_log_x128.png"
    );
    assert_eq!(output_file_name("plain", 16), "plain_x16.png");
}

#[test]
fn export_writes_renderable_entries_and_skips_the_rest() {
    let mut source = stick_source();
    source.json.insert(
        "assets/minecraft/lang/en_us.json".to_string(),
        json!({
            "item.minecraft.stick": "Stick",
            "item.minecraft.ghost": "Ghost"
        }),
    );
    let palette = TintPalette::empty();
    let pipeline = ThumbnailPipeline::new(&source, "1.21", &palette, options(64, 64));
    let catalog = ItemCatalog::scan(&source, "1.21");
    assert_eq!(catalog.len(), 2);

    let dir = temp_dir("export_seq");
    let threading = ExportThreading {
        parallel: false,
        threads: None,
    };
    let stats = export_all(&pipeline, &catalog, &dir, &threading).unwrap();

    assert_eq!(
        stats,
        ExportStats {
            requested: 2,
            written: 1,
            skipped: 1
        }
    );
    assert!(dir.join("minecraft_stick_x64.png").is_file());
    assert!(!dir.join("minecraft_ghost_x64.png").exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn parallel_export_matches_sequential_counts() {
    let mut source = stick_source();
    source.json.insert(
        "assets/minecraft/lang/en_us.json".to_string(),
        json!({ "item.minecraft.stick": "Stick" }),
    );
    let palette = TintPalette::empty();
    let pipeline = ThumbnailPipeline::new(&source, "1.21", &palette, options(32, 32));
    let catalog = ItemCatalog::scan(&source, "1.21");

    let dir = temp_dir("export_par");
    let threading = ExportThreading {
        parallel: true,
        threads: Some(2),
    };
    let stats = export_all(&pipeline, &catalog, &dir, &threading).unwrap();

    assert_eq!(stats.written, 1);
    assert!(dir.join("minecraft_stick_x32.png").is_file());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn zero_thread_request_is_rejected() {
    let err = build_thread_pool(Some(0)).unwrap_err();
    assert!(matches!(err, BlockRenderError::Validation(_)));
}
