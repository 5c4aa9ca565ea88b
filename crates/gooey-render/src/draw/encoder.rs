use crate::batch::{Binding, ShapeParams, VertexBatch};
use crate::coords::{hex_to_rgb, Extent, Rgb};
use crate::resources::TextureId;
use crate::text::GlyphCache;

use super::geometry::{arc_fan, arc_quad, glyph_vertices, line_quad, quad};

/// Stroke width of `draw_line`, in pixels.
pub const LINE_WIDTH: f32 = 1.0;

/// Draw-Command Encoder bound to one window's batch and current extent.
///
/// Every primitive appends exactly one [`DrawCommand`](crate::batch::DrawCommand)
/// and returns its index; nothing here blocks or talks to a GPU. A zero-sized
/// extent (minimized window) turns every call into a no-op returning `None`.
pub struct Encoder<'a> {
    batch: &'a mut VertexBatch,
    extent: Extent,
}

impl<'a> Encoder<'a> {
    pub fn new(batch: &'a mut VertexBatch, extent: Extent) -> Self {
        Self { batch, extent }
    }

    fn usable(&self, op: &str) -> bool {
        if !self.extent.is_valid() {
            log::debug!("{op}: skipped on zero-sized extent {:?}", self.extent);
            return false;
        }
        true
    }

    pub fn fill_rectangle(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: u32,
        rounded: bool,
        corner_radius: f32,
    ) -> Option<usize> {
        if !self.usable("fill_rectangle") {
            return None;
        }
        let verts = quad(self.extent, x, y, w, h, hex_to_rgb(color).to_array());
        let params = ShapeParams::filled_rect(w, h, rounded, corner_radius);
        self.batch.push(&verts, params, Binding::Solid)
    }

    /// Outlined rectangle. Geometry covers the full bounds; the border is cut
    /// out in the fragment stage.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rectangle(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: u32,
        thickness: f32,
        rounded: bool,
        corner_radius: f32,
    ) -> Option<usize> {
        if !self.usable("draw_rectangle") {
            return None;
        }
        let verts = quad(self.extent, x, y, w, h, hex_to_rgb(color).to_array());
        let params = ShapeParams::hollow_rect(w, h, thickness, rounded, corner_radius);
        self.batch.push(&verts, params, Binding::Solid)
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: u32) -> Option<usize> {
        if !self.usable("draw_line") {
            return None;
        }
        let verts = line_quad(self.extent, (x1, y1), (x2, y2), LINE_WIDTH, hex_to_rgb(color).to_array());
        let params = ShapeParams::line(x2 - x1, y2 - y1, LINE_WIDTH);
        self.batch.push(&verts, params, Binding::Solid)
    }

    /// Filled arc sector over `[angle_start, angle_end)` degrees, centered at `(xc, yc)`.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_arc(
        &mut self,
        xc: f32,
        yc: f32,
        w: f32,
        h: f32,
        angle_start: f32,
        angle_end: f32,
        color: u32,
    ) -> Option<usize> {
        if !self.usable("fill_arc") {
            return None;
        }
        let verts = arc_quad(self.extent, xc, yc, w, h, hex_to_rgb(color).to_array());
        let params = ShapeParams::arc(w, h, angle_start, angle_end);
        self.batch.push(&verts, params, Binding::Solid)
    }

    /// Filled arc built on the CPU as a triangle fan of `segments` slices.
    ///
    /// Used by the immediate paths; the command is a plain filled shape, so
    /// the fragment stage never runs the angle test on it.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_arc_fan(
        &mut self,
        xc: f32,
        yc: f32,
        w: f32,
        h: f32,
        angle_start: f32,
        angle_end: f32,
        color: u32,
        segments: u32,
    ) -> Option<usize> {
        if !self.usable("fill_arc_fan") {
            return None;
        }
        let verts = arc_fan(
            self.extent,
            (xc, yc),
            (w, h),
            (angle_start, angle_end),
            segments,
            hex_to_rgb(color).to_array(),
        );
        let params = ShapeParams::filled_rect(w, h, false, 0.0);
        self.batch.push(&verts, params, Binding::Solid)
    }

    /// Textured quad. The caller has already checked that `texture` is live.
    pub fn draw_image(&mut self, texture: TextureId, x: f32, y: f32, w: f32, h: f32) -> Option<usize> {
        if !self.usable("draw_image") {
            return None;
        }
        let verts = quad(self.extent, x, y, w, h, Rgb::white().to_array());
        self.batch.push(&verts, ShapeParams::textured(w, h), Binding::Texture(texture))
    }

    /// One command covering every visible glyph of `text`, pen starting at
    /// `(x, baseline)`.
    ///
    /// Returns `None` when nothing is visible (empty or all-blank text).
    pub fn draw_text(
        &mut self,
        glyphs: &GlyphCache,
        text: &str,
        x: f32,
        baseline: f32,
        color: u32,
        font_size: f32,
    ) -> Option<usize> {
        if !self.usable("draw_text") {
            return None;
        }
        let quads = glyphs.emit_glyph_quads(text, x, baseline, font_size);
        if quads.is_empty() {
            return None;
        }
        let verts = glyph_vertices(self.extent, &quads, hex_to_rgb(color).to_array());
        let w = glyphs.measure_width(text, font_size);
        let h = glyphs.measure_height(text, font_size);
        self.batch.push(&verts, ShapeParams::textured(w, h), Binding::GlyphAtlas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ShapeType;
    use crate::text::Glyph;

    fn positions(batch: &VertexBatch, cmd: usize) -> Vec<(f32, f32)> {
        let c = batch.commands()[cmd];
        batch.vertices()[c.vertex_range().start as usize..c.vertex_range().end as usize]
            .iter()
            .map(|v| (v.pos[0], v.pos[1]))
            .collect()
    }

    // ── rectangles ────────────────────────────────────────────────────────

    #[test]
    fn fill_rectangle_top_left_quarter() {
        let mut batch = VertexBatch::new();
        let mut enc = Encoder::new(&mut batch, Extent::new(200, 200));
        let idx = enc.fill_rectangle(0.0, 0.0, 100.0, 100.0, 0xFF0000, false, 0.0);
        assert_eq!(idx, Some(0));

        assert_eq!(
            positions(&batch, 0),
            vec![(-1.0, -1.0), (0.0, -1.0), (-1.0, 0.0), (0.0, -1.0), (0.0, 0.0), (-1.0, 0.0)]
        );

        let cmd = batch.commands()[0];
        assert!(!cmd.params.uses_texture());
        assert!(!cmd.params.hollow());
        assert!(!cmd.params.rounded());
        assert_eq!(cmd.params.shape(), Some(ShapeType::Rect));
        assert_eq!(cmd.binding, Binding::Solid);
        assert!(batch.vertices().iter().all(|v| v.color == [1.0, 0.0, 0.0]));
    }

    #[test]
    fn hollow_rectangle_shares_filled_geometry() {
        let mut filled = VertexBatch::new();
        let mut hollow = VertexBatch::new();
        let e = Extent::new(320, 240);
        Encoder::new(&mut filled, e).fill_rectangle(10.0, 20.0, 50.0, 30.0, 0x00FF00, true, 6.0);
        Encoder::new(&mut hollow, e).draw_rectangle(10.0, 20.0, 50.0, 30.0, 0x00FF00, 2.0, true, 6.0);

        assert_eq!(filled.vertices(), hollow.vertices());
        let p = hollow.commands()[0].params;
        assert!(p.hollow() && p.rounded());
        assert_eq!((p.border_width, p.radius), (2.0, 6.0));
    }

    // ── other primitives ──────────────────────────────────────────────────

    #[test]
    fn every_primitive_appends_one_six_vertex_command() {
        let mut batch = VertexBatch::new();
        let mut enc = Encoder::new(&mut batch, Extent::new(100, 100));
        enc.fill_rectangle(0.0, 0.0, 1.0, 1.0, 0, false, 0.0);
        enc.draw_rectangle(0.0, 0.0, 1.0, 1.0, 0, 1.0, false, 0.0);
        enc.draw_line(0.0, 0.0, 10.0, 10.0, 0);
        enc.fill_arc(50.0, 50.0, 20.0, 20.0, 0.0, 180.0, 0);
        enc.draw_image(TextureId::default(), 0.0, 0.0, 4.0, 4.0);

        assert_eq!(batch.command_count(), 5);
        assert!(batch.commands().iter().all(|c| c.vertex_count == 6));
        assert_eq!(batch.vertex_count(), 30);
    }

    #[test]
    fn line_and_arc_parameters() {
        let mut batch = VertexBatch::new();
        let mut enc = Encoder::new(&mut batch, Extent::new(100, 100));
        enc.draw_line(10.0, 10.0, 40.0, 50.0, 0xFFFFFF);
        enc.fill_arc(50.0, 50.0, 30.0, 20.0, 45.0, 270.0, 0x0000FF);

        let line = batch.commands()[0].params;
        assert_eq!(line.shape(), Some(ShapeType::Line));
        assert_eq!(line.border_width, LINE_WIDTH);
        assert_eq!(line.size, [30.0, 40.0]);

        let arc = batch.commands()[1].params;
        assert_eq!(arc.shape(), Some(ShapeType::Arc));
        assert_eq!(arc.radius, 10.0);
        assert_eq!(arc.arc_angles, [45.0, 270.0]);
    }

    #[test]
    fn arc_fan_is_one_plain_command() {
        let mut batch = VertexBatch::new();
        let mut enc = Encoder::new(&mut batch, Extent::new(100, 100));
        let idx = enc.fill_arc_fan(50.0, 50.0, 40.0, 40.0, 0.0, 90.0, 0x00FF00, 36);
        assert_eq!(idx, Some(0));

        let cmd = batch.commands()[0];
        assert_eq!(cmd.vertex_count, 36 * 3);
        assert_eq!(cmd.params.shape(), Some(ShapeType::Rect));
        assert!(!cmd.params.hollow() && !cmd.params.rounded());
        // Fan center sits on the arc center: clip (0, 0) for a 100x100 window.
        assert_eq!(batch.vertices()[0].pos, [0.0, 0.0]);
    }

    #[test]
    fn image_binds_its_texture() {
        let mut batch = VertexBatch::new();
        let tex = TextureId::default();
        Encoder::new(&mut batch, Extent::new(64, 64)).draw_image(tex, 8.0, 8.0, 4.0, 4.0);
        let cmd = batch.commands()[0];
        assert!(cmd.params.uses_texture());
        assert_eq!(cmd.binding, Binding::Texture(tex));
        assert_eq!(batch.vertices()[0].tex_coord, [0.0, 0.0]);
        assert_eq!(batch.vertices()[4].tex_coord, [1.0, 1.0]);
    }

    #[test]
    fn zero_extent_is_a_no_op() {
        let mut batch = VertexBatch::new();
        batch.reset();
        let mut enc = Encoder::new(&mut batch, Extent::new(0, 10));
        assert_eq!(enc.fill_rectangle(0.0, 0.0, 1.0, 1.0, 0, false, 0.0), None);
        assert!(batch.is_empty());
    }

    // ── text ──────────────────────────────────────────────────────────────

    #[test]
    fn text_is_one_command_over_all_glyphs() {
        let g = Glyph {
            width: 10,
            height: 10,
            bearing_x: 0.0,
            bearing_y: 10.0,
            advance: 12.0,
            uv_min: [0.0, 0.0],
            uv_max: [0.5, 0.5],
        };
        let blank = Glyph { width: 0, height: 0, advance: 6.0, ..g };
        let cache = GlyphCache::from_table(28.0, &[('a', g), ('b', g), (' ', blank)]);

        let mut batch = VertexBatch::new();
        let mut enc = Encoder::new(&mut batch, Extent::new(100, 100));
        assert_eq!(enc.draw_text(&cache, "a b", 0.0, 20.0, 0xFFFFFF, 28.0), Some(0));
        assert_eq!(enc.draw_text(&cache, "   ", 0.0, 20.0, 0xFFFFFF, 28.0), None);

        let cmd = batch.commands()[0];
        assert_eq!(batch.command_count(), 1);
        assert_eq!(cmd.vertex_count, 12);
        assert_eq!(cmd.binding, Binding::GlyphAtlas);
        assert!(cmd.params.uses_texture());
        assert_eq!(batch.vertices()[4].tex_coord, [0.5, 0.5]);
    }
}
