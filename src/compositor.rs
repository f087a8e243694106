//! Pixel-level compositing over straight (non-premultiplied) RGBA8 buffers.
//!
//! Layer stacking uses an alpha *test*, not alpha blending: a source pixel
//! either fully replaces the destination or leaves it alone. Blending proper
//! happens only once, when the rasterizer writes shaded fragments over the
//! background.

use crate::assets::raster::Raster;

pub type Rgba8 = [u8; 4];

/// Alpha-tested overlay of a single pixel: a transparent source pixel leaves
/// the destination untouched, any other source pixel replaces it outright,
/// alpha included.
pub fn overlay_pixel(dst: Rgba8, src: Rgba8) -> Rgba8 {
    if src[3] == 0 { dst } else { src }
}

/// Draw `source` over `dest` with its top-left corner at `origin`.
///
/// Source pixels falling outside `dest` are dropped.
pub fn overlay(dest: &mut Raster, source: &Raster, origin: (u32, u32)) {
    for sy in 0..source.height() {
        for sx in 0..source.width() {
            let src = source.pixel(sx, sy);
            if src[3] == 0 {
                continue;
            }
            dest.put_pixel(origin.0 + sx, origin.1 + sy, src);
        }
    }
}

/// Multiply the color channels of one pixel by a tint, leaving alpha as is.
///
/// `channel' = tint * channel / 255`, truncated.
pub fn tint_pixel(px: Rgba8, tint: Rgba8) -> Rgba8 {
    let mut out = px;
    for i in 0..3 {
        out[i] = ((u32::from(tint[i]) * u32::from(px[i])) / 255) as u8;
    }
    out
}

/// Tint every pixel of `image` in place.
pub fn tint_in_place(image: &mut Raster, tint: Rgba8) {
    for px in image.data_mut().chunks_exact_mut(4) {
        let out = tint_pixel([px[0], px[1], px[2], px[3]], tint);
        px.copy_from_slice(&out);
    }
}

/// Alpha-test map for `image`: same size, `R = G = B = source alpha`, fully
/// opaque. The rasterizer discards fragments whose mask red channel is zero.
pub fn derive_mask(image: &Raster) -> Raster {
    let mut mask = Raster::new(image.width(), image.height());
    let src = image.data();
    let dst = mask.data_mut();
    for (m, p) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let alpha = p[3];
        m.copy_from_slice(&[alpha, alpha, alpha, 255]);
    }
    mask
}

/// Straight-alpha source-over blend, used when writing shaded fragments onto
/// the (possibly transparent) background.
pub fn over_straight(dst: Rgba8, src: Rgba8) -> Rgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let sa = u32::from(src[3]);
    let da = u32::from(dst[3]);
    // Result alpha scaled by 255 so the channel weights stay integral.
    let ra = sa * 255 + da * (255 - sa);
    if ra == 0 {
        return [0; 4];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * (255 - sa);
        out[i] = ((num + ra / 2) / ra) as u8;
    }
    out[3] = ((ra + 127) / 255) as u8;
    out
}
