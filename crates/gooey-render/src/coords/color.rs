/// Normalized RGB triple decoded from a packed `0xRRGGBB` color.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Decodes a packed 24-bit color. Bits above 24 are ignored.
#[inline]
pub fn hex_to_rgb(hex: u32) -> Rgb {
    Rgb {
        r: ((hex >> 16) & 0xFF) as f32 / 255.0,
        g: ((hex >> 8) & 0xFF) as f32 / 255.0,
        b: (hex & 0xFF) as f32 / 255.0,
    }
}

/// Re-packs a normalized color, clamping each channel to `[0, 1]`.
#[inline]
pub fn rgb_to_hex(rgb: Rgb) -> u32 {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (q(rgb.r) << 16) | (q(rgb.g) << 8) | q(rgb.b)
}

/// Packs a 24-bit color into the 16-bit 5-6-5 layout used by small TFT panels.
#[inline]
pub fn rgb888_to_rgb565(hex: u32) -> u16 {
    let r = ((hex >> 16) & 0xFF) as u16;
    let g = ((hex >> 8) & 0xFF) as u16;
    let b = (hex & 0xFF) as u16;
    ((r & 0xF8) << 8) | ((g & 0xFC) << 3) | (b >> 3)
}
