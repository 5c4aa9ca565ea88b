use crate::coords::{rgb888_to_rgb565, Extent};

/// RGB888 software framebuffer, one `0xRRGGBB` word per pixel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Canvas {
    pub fn new(extent: Extent, clear: u32) -> Self {
        Self {
            width: extent.width,
            height: extent.height,
            pixels: vec![clear & 0xFF_FFFF; extent.area()],
        }
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color & 0xFF_FFFF);
    }

    /// Reallocates for a new extent; previous contents are lost.
    pub fn resize(&mut self, extent: Extent, clear: u32) {
        *self = Self::new(extent, clear);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn to_rgb565(&self) -> Vec<u16> {
        self.pixels.iter().map(|&p| rgb888_to_rgb565(p)).collect()
    }

    /// Source-over blend of `rgb` (0..1 channels) at `alpha`.
    pub fn blend(&mut self, x: u32, y: u32, rgb: [f32; 3], alpha: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) as usize;
        let dst = self.pixels[idx];
        let a = alpha.clamp(0.0, 1.0);

        let channel = |shift: u32, src: f32| {
            let d = ((dst >> shift) & 0xFF) as f32 / 255.0;
            let v = src.clamp(0.0, 1.0) * a + d * (1.0 - a);
            ((v * 255.0).round() as u32) << shift
        };
        self.pixels[idx] = channel(16, rgb[0]) | channel(8, rgb[1]) | channel(0, rgb[2]);
    }
}
