//! Deterministic CPU rasterizer.
//!
//! Depth-buffered triangle fill over the scene's quad list: each quad splits
//! into two triangles, fragments sample the face's color raster with
//! perspective-correct nearest-neighbor lookup, the mask raster alpha-tests
//! them, and survivors blend onto the background in submission order.

use glam::{Mat4, Vec2};

use crate::assets::raster::Raster;
use crate::compositor::over_straight;
use crate::geom::mesh::FaceQuad;
use crate::render::scene::{Scene, shade_for_normal, view_projection};

/// Projected vertex with the attributes the fill loop interpolates.
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    pos: Vec2,
    /// Clip-space depth after the perspective divide, `0..1` inside the
    /// frustum, smaller is closer.
    depth: f32,
    /// Texture coordinate divided by clip w.
    uv_over_w: Vec2,
    inv_w: f32,
}

/// Render the scene into a straight-RGBA raster of the given size. Pixels no
/// quad covers keep the background color.
pub fn render_scene(scene: &Scene, width: u32, height: u32) -> Raster {
    let mut color = Raster::filled(width, height, scene.background);
    if color.is_empty() {
        return color;
    }
    let mut depth = vec![f32::INFINITY; (width as usize) * (height as usize)];
    let vp = view_projection(scene.camera, width, height);
    for quad in &scene.quads {
        draw_quad(quad, vp, &mut color, &mut depth);
    }
    color
}

fn draw_quad(quad: &FaceQuad, vp: Mat4, color: &mut Raster, depth: &mut [f32]) {
    let Some(v) = project_quad(quad, vp, color.width(), color.height()) else {
        return;
    };
    let shade = shade_for_normal(quad.normal);
    fill_triangle([v[0], v[1], v[2]], quad, shade, color, depth);
    fill_triangle([v[0], v[2], v[3]], quad, shade, color, depth);
}

/// Project all four corners to screen space. `None` when any corner sits on
/// or behind the camera plane, which drops the quad; the fixed camera keeps
/// real scenes clear of that case.
fn project_quad(quad: &FaceQuad, vp: Mat4, width: u32, height: u32) -> Option<[ScreenVertex; 4]> {
    let mut out = [ScreenVertex {
        pos: Vec2::ZERO,
        depth: 0.0,
        uv_over_w: Vec2::ZERO,
        inv_w: 0.0,
    }; 4];
    for (slot, (&corner, &uv)) in out.iter_mut().zip(quad.corners.iter().zip(&quad.uvs)) {
        let clip = vp * corner.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        *slot = ScreenVertex {
            // Screen y grows downward.
            pos: Vec2::new(
                (ndc.x + 1.0) * 0.5 * width as f32,
                (1.0 - ndc.y) * 0.5 * height as f32,
            ),
            depth: ndc.z,
            uv_over_w: uv / clip.w,
            inv_w: 1.0 / clip.w,
        };
    }
    Some(out)
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn fill_triangle(
    v: [ScreenVertex; 3],
    quad: &FaceQuad,
    shade: [f32; 3],
    color: &mut Raster,
    depth: &mut [f32],
) {
    let area = edge(v[0].pos, v[1].pos, v[2].pos);
    if area == 0.0 {
        return;
    }

    let width = color.width();
    let height = color.height();
    let min_xf = v.iter().map(|s| s.pos.x).fold(f32::INFINITY, f32::min).floor();
    let max_xf = v
        .iter()
        .map(|s| s.pos.x)
        .fold(f32::NEG_INFINITY, f32::max)
        .ceil();
    let min_yf = v.iter().map(|s| s.pos.y).fold(f32::INFINITY, f32::min).floor();
    let max_yf = v
        .iter()
        .map(|s| s.pos.y)
        .fold(f32::NEG_INFINITY, f32::max)
        .ceil();
    if max_xf < 0.0 || max_yf < 0.0 || min_xf >= width as f32 || min_yf >= height as f32 {
        return;
    }
    let min_x = min_xf.max(0.0) as u32;
    let max_x = max_xf.min((width - 1) as f32) as u32;
    let min_y = min_yf.max(0.0) as u32;
    let max_y = max_yf.min((height - 1) as f32) as u32;

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
            let w0 = edge(v[1].pos, v[2].pos, p);
            let w1 = edge(v[2].pos, v[0].pos, p);
            let w2 = edge(v[0].pos, v[1].pos, p);
            // Both windings count as inside; quads are double-sided.
            let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
            if !inside {
                continue;
            }
            let (b0, b1, b2) = (w0 / area, w1 / area, w2 / area);

            let z = b0 * v[0].depth + b1 * v[1].depth + b2 * v[2].depth;
            if !(0.0..=1.0).contains(&z) {
                continue;
            }
            let idx = (py as usize) * (width as usize) + px as usize;
            if z >= depth[idx] {
                continue;
            }

            let inv_w = b0 * v[0].inv_w + b1 * v[1].inv_w + b2 * v[2].inv_w;
            if inv_w <= 0.0 {
                continue;
            }
            let uv = (b0 * v[0].uv_over_w + b1 * v[1].uv_over_w + b2 * v[2].uv_over_w) / inv_w;
            let Some(texel) = sample(quad, uv) else {
                continue;
            };

            let dst = color.pixel(px, py);
            color.put_pixel(px, py, over_straight(dst, shaded(texel, shade)));
            depth[idx] = z;
        }
    }
}

/// Nearest-neighbor texel lookup, clamped to the raster edge. `None` when the
/// mask discards the fragment.
fn sample(quad: &FaceQuad, uv: Vec2) -> Option<[u8; 4]> {
    let material = &quad.material;
    let (w, h) = (material.color.width(), material.color.height());
    if w == 0 || h == 0 {
        return None;
    }
    let tx = (uv.x * w as f32).floor().clamp(0.0, (w - 1) as f32) as u32;
    let ty = (uv.y * h as f32).floor().clamp(0.0, (h - 1) as f32) as u32;
    if material.mask.pixel(tx, ty)[0] == 0 {
        return None;
    }
    Some(material.color.pixel(tx, ty))
}

fn shaded(texel: [u8; 4], shade: [f32; 3]) -> [u8; 4] {
    let mut out = texel;
    for (channel, factor) in out.iter_mut().zip(shade) {
        *channel = (f32::from(*channel) * factor).round().min(255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/rasterizer.rs"]
mod tests;
