use std::path::Path;

use anyhow::Context;

use crate::foundation::error::BlockRenderResult;

/// Straight (non-premultiplied) RGBA8 pixel buffer, row-major, tightly packed.
///
/// All transform methods return a fresh buffer; the source is never mutated.
/// Out-of-bounds access degrades to transparent reads and dropped writes so
/// malformed UV rects cannot panic the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Fully transparent raster of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Raster of the given size with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap an existing RGBA8 buffer. `None` when the length does not match.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Decode encoded image bytes (PNG and friends) into straight RGBA8.
    pub fn decode(bytes: &[u8]) -> BlockRenderResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            data: rgba.into_raw(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable RGBA8 bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel at `(x, y)`; transparent black outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Write a pixel; silently dropped outside the buffer.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Copy of the sub-rectangle clamped to the buffer bounds.
    pub fn cropped(&self, x: u32, y: u32, w: u32, h: u32) -> Self {
        let x = x.min(self.width);
        let y = y.min(self.height);
        let w = w.min(self.width - x);
        let h = h.min(self.height - y);
        let mut out = Self::new(w, h);
        for oy in 0..h {
            for ox in 0..w {
                out.put_pixel(ox, oy, self.pixel(x + ox, y + oy));
            }
        }
        out
    }

    /// Horizontal mirror (columns reversed).
    pub fn mirrored_x(&self) -> Self {
        let mut out = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.put_pixel(x, y, self.pixel(self.width - 1 - x, y));
            }
        }
        out
    }

    /// Vertical mirror (rows reversed).
    pub fn mirrored_y(&self) -> Self {
        let mut out = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.put_pixel(x, y, self.pixel(x, self.height - 1 - y));
            }
        }
        out
    }

    /// Rotate 90 degrees clockwise.
    pub fn rotated_cw(&self) -> Self {
        let mut out = Self::new(self.height, self.width);
        for y in 0..out.height {
            for x in 0..out.width {
                out.put_pixel(x, y, self.pixel(y, self.height - 1 - x));
            }
        }
        out
    }

    /// Rotate 180 degrees.
    pub fn rotated_half(&self) -> Self {
        let mut out = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.put_pixel(x, y, self.pixel(self.width - 1 - x, self.height - 1 - y));
            }
        }
        out
    }

    /// Rotate 90 degrees counterclockwise.
    pub fn rotated_ccw(&self) -> Self {
        let mut out = Self::new(self.height, self.width);
        for y in 0..out.height {
            for x in 0..out.width {
                out.put_pixel(x, y, self.pixel(self.width - 1 - y, x));
            }
        }
        out
    }

    /// Nearest-neighbor integer upscale. Factor 0 or 1 returns a plain copy.
    pub fn upscaled(&self, factor: u32) -> Self {
        if factor <= 1 {
            return self.clone();
        }
        let mut out = Self::new(self.width * factor, self.height * factor);
        for y in 0..out.height {
            for x in 0..out.width {
                out.put_pixel(x, y, self.pixel(x / factor, y / factor));
            }
        }
        out
    }

    /// Encode as PNG at `path`, creating parent directories as needed.
    pub fn write_png(&self, path: &Path) -> BlockRenderResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
