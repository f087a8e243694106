//! Thumbnail pipeline: resolve a catalog entry, build its scene, rasterize,
//! and name the output.
//!
//! Pipeline per entry:
//! 1. [`ModelResolver::resolve`](crate::model::resolver::ModelResolver::resolve)
//! 2. block documents: [`build_quads`] + [`render_scene`]
//! 3. item documents: the prepared south-face texture is the image, no 3D pass
//! 4. PNG encode under the deterministic output name

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::assets::raster::Raster;
use crate::assets::source::AssetSource;
use crate::foundation::error::{BlockRenderError, BlockRenderResult};
use crate::geom::material::prepare_face_material;
use crate::geom::mesh::{build_quads, synthetic_item_element};
use crate::model::catalog::{CatalogEntry, ItemCatalog};
use crate::model::document::{Direction, ModelDocument, ModelKind};
use crate::model::resolver::ModelResolver;
use crate::model::tint::TintPalette;
use crate::render::rasterizer::render_scene;
use crate::render::scene::{CameraMode, Scene};

/// Output settings shared by every thumbnail of a run.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub camera: CameraMode,
    pub background: [u8; 4],
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: 256,
            height: 256,
            camera: CameraMode::default(),
            background: [0, 0, 0, 0],
        }
    }
}

/// One rendered thumbnail, not yet on disk.
#[derive(Debug, Clone)]
pub struct RenderedThumb {
    pub entry: CatalogEntry,
    pub image: Raster,
    pub file_name: String,
}

/// Deterministic output name for an id at a given width: the namespace
/// separator flattens to `_` and the width lands in the suffix.
pub fn output_file_name(id: &str, width: u32) -> String {
    format!("{}_x{width}.png", id.replace(':', "_"))
}

/// Renders thumbnails for catalog entries out of one asset source.
pub struct ThumbnailPipeline<'a> {
    resolver: ModelResolver<'a>,
    options: RenderOptions,
}

impl<'a> ThumbnailPipeline<'a> {
    pub fn new(
        source: &'a dyn AssetSource,
        version: &'a str,
        palette: &'a TintPalette,
        options: RenderOptions,
    ) -> Self {
        ThumbnailPipeline {
            resolver: ModelResolver::new(source, version, palette),
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    #[tracing::instrument(skip(self, entry), fields(id = %entry.id))]
    /// Resolve and render one entry. `None` when the document yields nothing
    /// to draw, which happens only for texture-only documents whose first
    /// binding never resolves to an image.
    pub fn render_entry(&self, entry: &CatalogEntry) -> Option<RenderedThumb> {
        let doc = self.resolver.resolve(entry);
        let image = self.render_document(&doc)?;
        Some(RenderedThumb {
            entry: entry.clone(),
            image,
            file_name: output_file_name(&entry.id, self.options.width),
        })
    }

    /// Render an already resolved document.
    pub fn render_document(&self, doc: &ModelDocument) -> Option<Raster> {
        match doc.kind {
            ModelKind::Item => self.item_image(doc),
            ModelKind::Block => Some(self.block_image(doc)),
        }
    }

    /// Texture-only path: the prepared south-face texture is the output, at
    /// its own tile-times-upscale size.
    fn item_image(&self, doc: &ModelDocument) -> Option<Raster> {
        let element = synthetic_item_element(doc);
        let face = element.faces.get(&Direction::South)?;
        let material = prepare_face_material(doc, face, self.output_size())?;
        Some(material.color)
    }

    /// Cuboid path: always produces an image, background-only when no face
    /// survives.
    fn block_image(&self, doc: &ModelDocument) -> Raster {
        let quads = build_quads(doc, self.output_size());
        let scene = Scene::new(quads, self.options.camera, self.options.background);
        render_scene(&scene, self.options.width, self.options.height)
    }

    fn output_size(&self) -> u32 {
        self.options.width.min(self.options.height)
    }
}

/// Parallelism knobs for batch export.
#[derive(Debug, Clone)]
pub struct ExportThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl Default for ExportThreading {
    fn default() -> Self {
        ExportThreading {
            parallel: true,
            threads: None,
        }
    }
}

/// Batch export counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub requested: u64,
    pub written: u64,
    pub skipped: u64,
}

#[tracing::instrument(skip(pipeline, catalog))]
/// Render every catalog entry into `out_dir`, one PNG per entry.
///
/// Per-entry trouble degrades to a logged skip; only batch-level failures
/// (creating the directory, building the pool) abort.
pub fn export_all(
    pipeline: &ThumbnailPipeline<'_>,
    catalog: &ItemCatalog,
    out_dir: &Path,
    threading: &ExportThreading,
) -> BlockRenderResult<ExportStats> {
    use anyhow::Context;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create export dir '{}'", out_dir.display()))?;

    let entries = catalog.entries();
    let written: u64 = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            entries
                .par_iter()
                .filter(|entry| export_entry(pipeline, entry, out_dir))
                .count() as u64
        })
    } else {
        entries
            .iter()
            .filter(|entry| export_entry(pipeline, entry, out_dir))
            .count() as u64
    };

    let stats = ExportStats {
        requested: entries.len() as u64,
        written,
        skipped: entries.len() as u64 - written,
    };
    info!(
        requested = stats.requested,
        written = stats.written,
        skipped = stats.skipped,
        "export finished"
    );
    Ok(stats)
}

fn export_entry(pipeline: &ThumbnailPipeline<'_>, entry: &CatalogEntry, out_dir: &Path) -> bool {
    let Some(thumb) = pipeline.render_entry(entry) else {
        debug!("'{}' has no renderable output", entry.id);
        return false;
    };
    match thumb.image.write_png(&out_dir.join(&thumb.file_name)) {
        Ok(()) => {
            debug!("wrote '{}'", thumb.file_name);
            true
        }
        Err(err) => {
            warn!("skipping '{}': {err}", entry.id);
            false
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> BlockRenderResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(BlockRenderError::validation(
            "export threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BlockRenderError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
