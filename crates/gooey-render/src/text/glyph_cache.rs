use std::path::{Path, PathBuf};

use crate::error::FontError;

/// Pixel height glyphs are rasterized at. Other sizes scale cached metrics.
pub const DEFAULT_BAKE_PX: f32 = 28.0;

/// Number of cached code points (ASCII).
pub const GLYPH_COUNT: usize = 128;

/// Line advance as a multiple of the requested font size.
pub const LINE_SPACING: f32 = 1.2;

const ATLAS_WIDTH: u32 = 512;

/// Largest atlas side. Matches the 2D texture limit of `wgpu::Limits::default()`.
pub const MAX_ATLAS_DIM: u32 = 8192;
const GLYPH_PADDING: u32 = 1;

const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/roboto/unhinted/RobotoTTF/Roboto-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Where the glyph cache gets its TrueType data from.
#[derive(Debug, Clone)]
pub enum FontSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
    /// First readable font from a list of common system locations.
    System,
}

impl Default for FontSource {
    fn default() -> Self {
        Self::System
    }
}

/// Cached metrics and atlas placement of one code point at the bake size.
///
/// `bearing_y` is the distance from the baseline up to the bitmap's top row.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Glyph {
    pub width: u32,
    pub height: u32,
    pub bearing_x: f32,
    pub bearing_y: f32,
    pub advance: f32,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Single-channel coverage atlas holding every cached glyph bitmap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphAtlas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl GlyphAtlas {
    /// Coverage at a texel, `0` outside the atlas.
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Fails when either side is above `max_dim`.
    pub fn ensure_fits(&self, max_dim: u32) -> Result<(), FontError> {
        if self.width > max_dim || self.height > max_dim {
            return Err(FontError::AtlasTooLarge {
                width: self.width,
                height: self.height,
                max: max_dim,
            });
        }
        Ok(())
    }
}

/// One glyph quad in pixel space (top-left origin), ready to be mapped to clip space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphQuad {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Glyph Cache: ASCII glyphs baked once at a fixed pixel size.
///
/// Metrics lookups are pure; nothing here touches the GPU. Backends upload
/// [`atlas`](Self::atlas) once after construction.
#[derive(Debug, Clone)]
pub struct GlyphCache {
    bake_px: f32,
    glyphs: Vec<Option<Glyph>>,
    atlas: GlyphAtlas,
}

impl GlyphCache {
    /// Loads a font from any [`FontSource`].
    pub fn load(source: &FontSource, bake_px: f32) -> Result<Self, FontError> {
        match source {
            FontSource::Bytes(bytes) => Self::load_font(bytes, bake_px),
            FontSource::Path(path) => Self::load_font_file(path, bake_px),
            FontSource::System => {
                let bytes = system_font_bytes().ok_or(FontError::NoSystemFont)?;
                Self::load_font(&bytes, bake_px)
            }
        }
    }

    pub fn load_font_file<P: AsRef<Path>>(path: P, bake_px: f32) -> Result<Self, FontError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_font(&bytes, bake_px)
    }

    /// Rasterizes code points 0–127 at `bake_px`.
    ///
    /// Code points the font cannot map are left empty and skipped when
    /// measuring or emitting quads; a missing glyph never fails the load.
    pub fn load_font(bytes: &[u8], bake_px: f32) -> Result<Self, FontError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(FontError::Parse)?;

        let mut bitmaps: Vec<Option<(Glyph, Vec<u8>)>> = Vec::with_capacity(GLYPH_COUNT);
        let mut missing = 0usize;

        for code in 0..GLYPH_COUNT as u8 {
            let ch = char::from(code);
            let index = font.lookup_glyph_index(ch);
            if index == 0 {
                missing += 1;
                bitmaps.push(None);
                continue;
            }

            let (m, bitmap) = font.rasterize_indexed(index, bake_px);
            let glyph = Glyph {
                width: m.width as u32,
                height: m.height as u32,
                bearing_x: m.xmin as f32,
                bearing_y: (m.ymin + m.height as i32) as f32,
                advance: m.advance_width,
                ..Glyph::default()
            };
            bitmaps.push(Some((glyph, bitmap)));
        }

        if missing > 0 {
            log::debug!("GlyphCache: {missing} of {GLYPH_COUNT} ASCII code points have no glyph");
        }

        let (glyphs, atlas) = pack_atlas(bitmaps, MAX_ATLAS_DIM)?;
        log::info!(
            "GlyphCache: baked {} glyphs at {bake_px}px into a {}x{} atlas",
            glyphs.iter().flatten().count(),
            atlas.width,
            atlas.height
        );

        Ok(Self { bake_px, glyphs, atlas })
    }

    /// Builds a cache from an explicit glyph table and an empty atlas.
    #[cfg(test)]
    pub(crate) fn from_table(bake_px: f32, table: &[(char, Glyph)]) -> Self {
        let mut glyphs = vec![None; GLYPH_COUNT];
        for &(ch, g) in table {
            glyphs[ch as usize] = Some(g);
        }
        Self {
            bake_px,
            glyphs,
            atlas: GlyphAtlas { width: 1, height: 1, pixels: vec![0] },
        }
    }

    #[inline]
    pub fn bake_px(&self) -> f32 {
        self.bake_px
    }

    /// Metric scale for text requested at `font_size`.
    #[inline]
    pub fn scale(&self, font_size: f32) -> f32 {
        font_size / self.bake_px
    }

    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(ch as usize)?.as_ref()
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Width of the widest line, summing scaled advances.
    pub fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        let scale = self.scale(font_size);
        text.split('\n')
            .map(|line| {
                line.chars()
                    .filter_map(|c| self.glyph(c))
                    .map(|g| g.advance * scale)
                    .sum::<f32>()
            })
            .fold(0.0, f32::max)
    }

    /// Tallest scaled glyph bitmap, plus one line advance per extra line.
    pub fn measure_height(&self, text: &str, font_size: f32) -> f32 {
        let scale = self.scale(font_size);
        let tallest = text
            .chars()
            .filter_map(|c| self.glyph(c))
            .map(|g| g.height as f32 * scale)
            .fold(0.0, f32::max);
        let extra_lines = text.matches('\n').count() as f32;
        tallest + extra_lines * font_size * LINE_SPACING
    }

    /// Lays `text` out from pen position `(x, baseline)` and returns one quad
    /// per visible glyph.
    ///
    /// Unknown characters are skipped without advancing; blank glyphs such as
    /// space advance the pen but produce no quad.
    pub fn emit_glyph_quads(&self, text: &str, x: f32, baseline: f32, font_size: f32) -> Vec<GlyphQuad> {
        let scale = self.scale(font_size);
        let mut quads = Vec::with_capacity(text.len());
        let mut pen_x = x;
        let mut pen_y = baseline;

        for ch in text.chars() {
            if ch == '\n' {
                pen_x = x;
                pen_y += font_size * LINE_SPACING;
                continue;
            }
            let Some(g) = self.glyph(ch) else { continue };

            if g.width > 0 && g.height > 0 {
                let x0 = pen_x + g.bearing_x * scale;
                let y0 = pen_y - g.bearing_y * scale;
                quads.push(GlyphQuad {
                    x0,
                    y0,
                    x1: x0 + g.width as f32 * scale,
                    y1: y0 + g.height as f32 * scale,
                    uv_min: g.uv_min,
                    uv_max: g.uv_max,
                });
            }
            pen_x += g.advance * scale;
        }

        quads
    }
}

// ── atlas packing ─────────────────────────────────────────────────────────

/// Shelf-packs glyph bitmaps and fills in UVs.
///
/// The atlas is at least [`ATLAS_WIDTH`] wide and widened to the next power
/// of two that holds the widest glyph. Fails when a side would exceed `max_dim`.
fn pack_atlas(
    bitmaps: Vec<Option<(Glyph, Vec<u8>)>>,
    max_dim: u32,
) -> Result<(Vec<Option<Glyph>>, GlyphAtlas), FontError> {
    let widest = bitmaps.iter().flatten().map(|(g, _)| g.width).max().unwrap_or(0);
    let width = (widest + 2 * GLYPH_PADDING).next_power_of_two().max(ATLAS_WIDTH);

    let mut placements = Vec::with_capacity(bitmaps.len());
    let (mut cx, mut cy, mut row_h) = (GLYPH_PADDING, GLYPH_PADDING, 0u32);

    for entry in &bitmaps {
        let Some((g, _)) = entry else {
            placements.push((0, 0));
            continue;
        };
        if cx + g.width + GLYPH_PADDING > width {
            cy += row_h + GLYPH_PADDING;
            cx = GLYPH_PADDING;
            row_h = 0;
        }
        placements.push((cx, cy));
        cx += g.width + GLYPH_PADDING;
        row_h = row_h.max(g.height);
    }

    let height = (cy + row_h + GLYPH_PADDING).next_power_of_two();
    GlyphAtlas { width, height, pixels: Vec::new() }.ensure_fits(max_dim)?;

    let mut pixels = vec![0u8; width as usize * height as usize];
    let (aw, ah) = (width as f32, height as f32);

    let glyphs = bitmaps
        .into_iter()
        .zip(placements)
        .map(|(entry, (gx, gy))| {
            let (mut g, bitmap) = entry?;
            for row in 0..g.height {
                let src = (row * g.width) as usize;
                let dst = ((gy + row) * width + gx) as usize;
                pixels[dst..dst + g.width as usize]
                    .copy_from_slice(&bitmap[src..src + g.width as usize]);
            }
            g.uv_min = [gx as f32 / aw, gy as f32 / ah];
            g.uv_max = [(gx + g.width) as f32 / aw, (gy + g.height) as f32 / ah];
            Some(g)
        })
        .collect();

    Ok((glyphs, GlyphAtlas { width, height, pixels }))
}

fn system_font_bytes() -> Option<Vec<u8>> {
    SYSTEM_FONT_PATHS.iter().find_map(|p| std::fs::read(p).ok())
}
