//! Per-face texture preparation.
//!
//! Turns a face's texture reference plus its UV window into a pair of
//! rasters ready for sampling: the color image and the alpha-test mask.

use crate::assets::raster::Raster;
use crate::compositor::derive_mask;
use crate::foundation::math::upscale_factor;
use crate::model::document::{Face, ModelDocument};

/// Prepared sampling data for a single cuboid face.
#[derive(Debug, Clone)]
pub struct FaceMaterial {
    pub color: Raster,
    pub mask: Raster,
}

/// Prepares the texture for `face`: resolve the reference through the
/// document's bindings, cut the UV window, apply mirror flips and the
/// discrete rotation, then upscale to match `output_size`.
///
/// Returns `None` when the reference does not lead to a loaded raster,
/// which drops the face from the mesh.
pub fn prepare_face_material(
    doc: &ModelDocument,
    face: &Face,
    output_size: u32,
) -> Option<FaceMaterial> {
    let source = doc.texture(&face.texture)?;

    let rect = face.uv;
    let mut texture = source.cropped(
        rect.x.max(0) as u32,
        rect.y.max(0) as u32,
        rect.w.max(0) as u32,
        rect.h.max(0) as u32,
    );
    if face.flip_x {
        texture = texture.mirrored_x();
    }
    if face.flip_y {
        texture = texture.mirrored_y();
    }
    texture = match face.rotation {
        90 => texture.rotated_cw(),
        180 => texture.rotated_half(),
        270 => texture.rotated_ccw(),
        _ => texture,
    };
    let color = texture.upscaled(upscale_factor(output_size));
    let mask = derive_mask(&color);
    Some(FaceMaterial { color, mask })
}

#[cfg(test)]
#[path = "../../tests/unit/geom/material.rs"]
mod tests;
