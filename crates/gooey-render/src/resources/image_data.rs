use std::path::Path;

use crate::error::ImageError;

/// SVG rasterization density.
pub const SVG_DPI: f32 = 96.0;

/// Decoded image ready for GPU upload: straight-alpha RGBA8, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Loads an image file. `.svg` files go through the vector rasterizer,
    /// everything else through the raster decoders.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

        let img = if is_svg { Self::from_svg(&bytes)? } else { Self::from_bytes(&bytes)? };
        log::debug!("loaded image {}x{} from {}", img.width, img.height, path.display());
        Ok(img)
    }

    /// Decodes in-memory image bytes, sniffing SVG markup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        if looks_like_svg(bytes) {
            return Self::from_svg(bytes);
        }

        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::Empty);
        }

        Ok(Self { width, height, pixels: rgba.into_raw() })
    }

    /// Rasterizes SVG markup at its intrinsic size (96 DPI).
    pub fn from_svg(bytes: &[u8]) -> Result<Self, ImageError> {
        use resvg::{tiny_skia, usvg};

        let options = usvg::Options { dpi: SVG_DPI, ..usvg::Options::default() };
        let tree = usvg::Tree::from_data(bytes, &options).map_err(|e| ImageError::Svg(e.to_string()))?;

        let size = tree.size().to_int_size();
        let mut pixmap =
            tiny_skia::Pixmap::new(size.width(), size.height()).ok_or(ImageError::Empty)?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha; uploads expect straight alpha.
        let pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        Ok(Self { width: size.width(), height: size.height(), pixels })
    }

    /// Uniformly colored image.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba.repeat(width as usize * height as usize);
        Self { width, height, pixels }
    }

    /// Returns the RGBA value at `(x, y)`; `None` outside the image.
    /// Fails when either side is above `max_dim`, the device's 2D texture limit.
    pub fn ensure_fits(&self, max_dim: u32) -> Result<(), ImageError> {
        if self.width > max_dim || self.height > max_dim {
            return Err(ImageError::TooLarge {
                width: self.width,
                height: self.height,
                max: max_dim,
            });
        }
        Ok(())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = self.pixels.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    #[inline]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let Ok(text) = std::str::from_utf8(head) else { return false };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}
