//! Cuboid face geometry.
//!
//! Expands every element of a merged document into textured quads in scene
//! space: corner placement, the per-element pivot rotation, and the
//! whole-document orientation all happen here, so the rasterizer only ever
//! sees transformed quads.

use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3};

use crate::geom::material::{FaceMaterial, prepare_face_material};
use crate::model::document::{
    Axis, Direction, Element, Face, ModelDocument, ModelKind, normalize_texture_key,
};

/// Shift that centers the 0..16 model cube on the origin.
pub const MOVE_AMOUNT: f32 = -8.0;

/// Uniform vertex scale for documents without a `gui` display.
const DEFAULT_DISPLAY_SCALE: f32 = 0.625;

/// Whole-document orientation, degrees, for block documents without a `gui`
/// rotation. Item documents default to no rotation.
const BLOCK_ORIENTATION: [f32; 3] = [30.0, 135.0, 0.0];

/// Corner selection per face over the cuboid corner table, ordered top-left,
/// top-right, bottom-right, bottom-left as seen from outside.
const FACE_CORNERS: [(Direction, [usize; 4]); 6] = [
    (Direction::Up, [4, 7, 3, 0]),
    (Direction::Down, [1, 2, 6, 5]),
    (Direction::North, [7, 4, 5, 6]),
    (Direction::South, [0, 3, 2, 1]),
    (Direction::West, [4, 0, 1, 5]),
    (Direction::East, [3, 7, 6, 2]),
];

/// Texture coordinates matching the corner order of [`FACE_CORNERS`].
const QUAD_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// One textured quad in scene space, ready for rasterization.
#[derive(Debug, Clone)]
pub struct FaceQuad {
    pub corners: [Vec3; 4],
    pub uvs: [Vec2; 4],
    /// Flat face normal. Points into the cuboid, matching the winding the
    /// light rig was tuned for.
    pub normal: Vec3,
    pub material: FaceMaterial,
}

/// Expands every face of every element into a [`FaceQuad`]. Faces whose
/// texture reference cannot be resolved are dropped.
pub fn build_quads(doc: &ModelDocument, output_size: u32) -> Vec<FaceQuad> {
    let orient = orientation_matrix(doc);
    let scale = display_scale(doc);
    let mut quads = Vec::new();
    for element in &doc.elements {
        let transform = orient * pivot_matrix(element);
        let corners = element_corners(element, scale);
        for (direction, indices) in FACE_CORNERS {
            let Some(face) = element.faces.get(&direction) else {
                continue;
            };
            let Some(material) = prepare_face_material(doc, face, output_size) else {
                continue;
            };
            let quad = indices.map(|i| transform.transform_point3(corners[i]));
            quads.push(FaceQuad {
                corners: quad,
                uvs: QUAD_UVS,
                normal: quad_normal(&quad),
                material,
            });
        }
    }
    quads
}

/// The full-cube stand-in element a texture-only document renders: a single
/// south face bound to the document's first texture binding.
pub fn synthetic_item_element(doc: &ModelDocument) -> Element {
    let mut faces = HashMap::new();
    if let Some((first_key, _)) = doc.textures.iter().next() {
        let face = Face {
            texture: format!("#{}", normalize_texture_key(first_key)),
            ..Face::default()
        };
        faces.insert(Direction::South, face);
    }
    Element {
        from: Vec3::ZERO,
        to: Vec3::splat(16.0),
        rotation: None,
        faces,
    }
}

/// Per-axis vertex scale: the `gui` display's scale when that context exists
/// (zeros included), the uniform default otherwise.
fn display_scale(doc: &ModelDocument) -> Vec3 {
    match doc.gui_display() {
        Some(display) => Vec3::from_array(display.scale),
        None => Vec3::splat(DEFAULT_DISPLAY_SCALE),
    }
}

/// The eight corners of an element, centered and scaled. Index order is
/// fixed; [`FACE_CORNERS`] selects from it.
fn element_corners(element: &Element, scale: Vec3) -> [Vec3; 8] {
    let from = (element.from + MOVE_AMOUNT) * scale;
    let to = (element.to + MOVE_AMOUNT) * scale;
    [
        Vec3::new(from.x, to.y, to.z),
        Vec3::new(from.x, from.y, to.z),
        Vec3::new(to.x, from.y, to.z),
        Vec3::new(to.x, to.y, to.z),
        Vec3::new(from.x, to.y, from.z),
        Vec3::new(from.x, from.y, from.z),
        Vec3::new(to.x, from.y, from.z),
        Vec3::new(to.x, to.y, from.z),
    ]
}

/// Whole-document orientation. A `gui` display's rotation overrides the
/// per-kind default.
fn orientation_matrix(doc: &ModelDocument) -> Mat4 {
    let degrees = match doc.gui_display() {
        Some(display) => Vec3::from_array(display.rotation),
        None => match doc.kind {
            ModelKind::Block => Vec3::from_array(BLOCK_ORIENTATION),
            ModelKind::Item => Vec3::ZERO,
        },
    };
    rotation_matrix(degrees)
}

/// Intrinsic rotations applied X first, then Y, then Z, in degrees.
fn rotation_matrix(degrees: Vec3) -> Mat4 {
    Mat4::from_rotation_x(degrees.x.to_radians())
        * Mat4::from_rotation_y(degrees.y.to_radians())
        * Mat4::from_rotation_z(degrees.z.to_radians())
}

/// Pivot rotation about the element's origin. Identity when no axis is set.
/// The pivot point is centered with the same shift as the corners but never
/// display-scaled.
fn pivot_matrix(element: &Element) -> Mat4 {
    let Some(rotation) = &element.rotation else {
        return Mat4::IDENTITY;
    };
    let Some(axis) = rotation.axis else {
        return Mat4::IDENTITY;
    };
    let angle = rotation.angle.to_radians();
    let rotate = match axis {
        Axis::X => Mat4::from_rotation_x(angle),
        Axis::Y => Mat4::from_rotation_y(angle),
        Axis::Z => Mat4::from_rotation_z(angle),
    };
    let pivot = rotation.origin + MOVE_AMOUNT;
    Mat4::from_translation(pivot) * rotate * Mat4::from_translation(-pivot)
}

fn quad_normal(corners: &[Vec3; 4]) -> Vec3 {
    (corners[1] - corners[0])
        .cross(corners[3] - corners[0])
        .normalize_or_zero()
}

#[cfg(test)]
#[path = "../../tests/unit/geom/mesh.rs"]
mod tests;
