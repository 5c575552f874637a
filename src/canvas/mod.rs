//! Pixel surface the cursor draws on.
//!
//! [`Canvas`] keeps an RGBA8 buffer the size of the window. Every drawing
//! operation returns the [`DirtyRegion`] it touched so the UI only has to
//! upload that part of the texture.

pub mod background;

pub use background::generate_background;

use tracing::{debug, warn};

use crate::controller::sample::Vector2;

pub type Rgba = [u8; 4];

/// Rectangle of pixels changed by a drawing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyRegion {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl DirtyRegion {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Opaque black canvas
    pub fn new(width: usize, height: usize) -> Self {
        let mut pixels = vec![0; width * height * 4];
        for pixel in pixels.chunks_exact_mut(4) {
            pixel[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn get_bounds(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(rgba)
    }

    pub fn full_region(&self) -> DirtyRegion {
        DirtyRegion {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    /// Copies `background` over the canvas, ignoring its alpha.
    pub fn fill(&mut self, background: &[u8]) -> DirtyRegion {
        self.check_len(background);
        for (dst, src) in self
            .pixels
            .chunks_exact_mut(4)
            .zip(background.chunks_exact(4))
        {
            dst[..3].copy_from_slice(&src[..3]);
            dst[3] = 255;
        }
        self.full_region()
    }

    /// Composites `background` over the canvas using its own alpha channel.
    pub fn blend(&mut self, background: &[u8]) -> DirtyRegion {
        self.check_len(background);
        for (dst, src) in self
            .pixels
            .chunks_exact_mut(4)
            .zip(background.chunks_exact(4))
        {
            blend_pixel(dst, [src[0], src[1], src[2], src[3]]);
        }
        self.full_region()
    }

    /// Draws a line of `width` pixels from `from` to `to`.
    ///
    /// The returned region is the segment's bounding box grown by `width`
    /// on every side and clipped to the canvas.
    pub fn draw_line_segment(
        &mut self,
        from: Vector2,
        to: Vector2,
        colour: Rgba,
        width: u32,
    ) -> DirtyRegion {
        let width = width.max(1);
        let span_x = to.x - from.x;
        let span_y = to.y - from.y;
        let steps = span_x.abs().max(span_y.abs()).ceil().max(1.0) as usize;

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            self.stamp(from.x + span_x * t, from.y + span_y * t, colour, width);
        }

        let pad = width as f32;
        let region = self.clip(
            from.x.min(to.x) - pad,
            from.y.min(to.y) - pad,
            from.x.max(to.x) + pad,
            from.y.max(to.y) + pad,
        );
        debug!("Line {} -> {} dirtied {:?}", from, to, region);
        region
    }

    /// Pixel bytes of `region`, row by row
    pub fn region_pixels(&self, region: DirtyRegion) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(region.width * region.height * 4);
        for row in region.y..region.y + region.height {
            let start = (row * self.width + region.x) * 4;
            bytes.extend_from_slice(&self.pixels[start..start + region.width * 4]);
        }
        bytes
    }

    // Square brush centred on (cx, cy)
    fn stamp(&mut self, cx: f32, cy: f32, colour: Rgba, width: u32) {
        let half = width as f32 / 2.0;
        let left = (cx - half).round() as i64;
        let top = (cy - half).round() as i64;
        for y in top..top + i64::from(width) {
            for x in left..left + i64::from(width) {
                if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                    continue;
                }
                let offset = (y as usize * self.width + x as usize) * 4;
                blend_pixel(&mut self.pixels[offset..offset + 4], colour);
            }
        }
    }

    fn clip(&self, left: f32, top: f32, right: f32, bottom: f32) -> DirtyRegion {
        let x0 = left.floor().max(0.0) as usize;
        let y0 = top.floor().max(0.0) as usize;
        let x1 = (right.ceil().max(0.0) as usize).min(self.width);
        let y1 = (bottom.ceil().max(0.0) as usize).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return DirtyRegion::default();
        }
        DirtyRegion {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    fn check_len(&self, background: &[u8]) {
        if background.len() != self.pixels.len() {
            warn!(
                "Background has {} bytes, canvas has {}; copying the overlap",
                background.len(),
                self.pixels.len()
            );
        }
    }
}

// Source-over onto an opaque destination
fn blend_pixel(dst: &mut [u8], src: Rgba) {
    let alpha = u16::from(src[3]);
    if alpha == 255 {
        dst[..3].copy_from_slice(&src[..3]);
    } else {
        for channel in 0..3 {
            let mixed =
                (u16::from(src[channel]) * alpha + u16::from(dst[channel]) * (255 - alpha) + 127) / 255;
            dst[channel] = mixed as u8;
        }
    }
    dst[3] = 255;
}
