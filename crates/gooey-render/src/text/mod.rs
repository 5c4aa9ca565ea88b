//! Glyph Cache.

mod glyph_cache;

pub use glyph_cache::{
    FontSource, Glyph, GlyphAtlas, GlyphCache, GlyphQuad, DEFAULT_BAKE_PX, GLYPH_COUNT,
    LINE_SPACING, MAX_ATLAS_DIM,
};
