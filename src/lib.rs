//! Blockrender turns declarative block/item model documents into PNG thumbnails.
//!
//! The pipeline has four stages:
//!
//! 1. **Resolve**: item name/id -> fully merged [`ModelDocument`] (parent chain
//!    walked recursively, textures composited and tinted along the way)
//! 2. **Mesh**: resolved document -> per-face textured quads ([`FaceQuad`])
//! 3. **Render**: quads + fixed light/camera rig -> RGBA raster (CPU
//!    rasterizer; flat item documents skip this stage and blit their layer
//!    texture directly)
//! 4. **Encode**: raster -> PNG on disk
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce identical pixels.
//! - **Degrade, don't abort**: a missing model file, texture, or indirection
//!   entry empties that part of the result and the pipeline keeps going. Hard
//!   errors are reserved for the outer boundary (opening an asset source,
//!   writing output).
//! - **Scope-owned buffers**: every raster and mesh is owned by the document
//!   or render call that produced it and dropped when superseded.
#![forbid(unsafe_code)]

pub mod assets;
pub mod compositor;
pub mod foundation;
pub mod geom;
pub mod model;
pub mod pipeline;
pub mod render;

pub use assets::raster::Raster;
pub use assets::source::{AssetSource, DirAssetSource, JarAssetSource, normalize_rel_path};
pub use foundation::color::parse_hex_rgba;
pub use foundation::error::{BlockRenderError, BlockRenderResult};
pub use geom::mesh::FaceQuad;
pub use model::catalog::{CatalogEntry, ItemCatalog};
pub use model::document::{Direction, Element, Face, ModelDocument, ModelKind};
pub use model::resolver::ModelResolver;
pub use model::tint::TintPalette;
pub use pipeline::{
    ExportStats, ExportThreading, RenderOptions, RenderedThumb, ThumbnailPipeline, export_all,
    output_file_name,
};
pub use render::scene::{CameraMode, Scene};
