//! Scene description: the fixed light rig and camera placement every
//! thumbnail render uses.

use glam::{Mat4, Vec3};

use crate::geom::mesh::FaceQuad;

/// Directional light. `direction` is the travel direction of the light, not
/// the vector toward it.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: [u8; 3],
}

/// The three-light rig, tuned for the inward face normals the mesh builder
/// produces.
pub const LIGHT_RIG: [DirectionalLight; 3] = [
    DirectionalLight {
        direction: Vec3::new(0.0, 10.0, 0.0),
        color: [0x80, 0x80, 0x80],
    },
    DirectionalLight {
        direction: Vec3::new(-1.0, 3.0, 8.0),
        color: [0xFF, 0xFF, 0xFF],
    },
    DirectionalLight {
        direction: Vec3::new(0.0, -1.0, 10.0),
        color: [0x60, 0x60, 0x60],
    },
];

/// Camera placement shared by both projections.
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 10.0);
pub const CAMERA_LOOK: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Vertical field of view of the perspective camera, degrees.
const PERSPECTIVE_FOV_DEGREES: f32 = 16.5;

/// View width of the orthographic camera, scene units.
const ORTHOGRAPHIC_VIEW_WIDTH: f32 = 16.5;

const NEAR_PLANE: f32 = 0.125;
const FAR_PLANE: f32 = 100.0;

/// Projection choice for the offscreen camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Everything the rasterizer needs for one image.
#[derive(Debug, Clone)]
pub struct Scene {
    pub quads: Vec<FaceQuad>,
    pub camera: CameraMode,
    pub background: [u8; 4],
}

impl Scene {
    pub fn new(quads: Vec<FaceQuad>, camera: CameraMode, background: [u8; 4]) -> Self {
        Scene {
            quads,
            camera,
            background,
        }
    }
}

/// View-projection matrix for the requested output size. Clip-space depth
/// lands in `0..1` with the near plane at zero.
pub fn view_projection(camera: CameraMode, width: u32, height: u32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    let view = Mat4::look_to_rh(CAMERA_POSITION, CAMERA_LOOK, Vec3::Y);
    let projection = match camera {
        CameraMode::Perspective => Mat4::perspective_rh(
            PERSPECTIVE_FOV_DEGREES.to_radians(),
            aspect,
            NEAR_PLANE,
            FAR_PLANE,
        ),
        CameraMode::Orthographic => {
            let half_w = ORTHOGRAPHIC_VIEW_WIDTH / 2.0;
            let half_h = half_w / aspect;
            Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, NEAR_PLANE, FAR_PLANE)
        }
    };
    projection * view
}

/// Flat Lambert factor of the whole rig for one face normal: per channel,
/// `sum(max(0, N . -normalize(direction)) * color)` clamped to 1.
pub fn shade_for_normal(normal: Vec3) -> [f32; 3] {
    let mut shade = [0.0f32; 3];
    for light in LIGHT_RIG {
        let lambert = normal.dot(-light.direction.normalize()).max(0.0);
        if lambert == 0.0 {
            continue;
        }
        for (slot, channel) in shade.iter_mut().zip(light.color) {
            *slot += lambert * f32::from(channel) / 255.0;
        }
    }
    shade.map(|s| s.min(1.0))
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
