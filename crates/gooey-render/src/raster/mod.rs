//! CPU rasterizer.
//!
//! Replays recorded draw commands with the same coverage rules as the shape
//! shader. Drives the embedded-panel backend and lets the frame engine be
//! checked pixel by pixel without a GPU.

mod canvas;
pub mod shade;
mod triangle;

pub use canvas::Canvas;
pub use triangle::{draw_command, Texels};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{Binding, ShapeParams, VertexBatch};
    use crate::coords::Extent;
    use crate::draw::{geometry, Encoder};
    use crate::resources::{ImageData, TextureId};

    fn replay(batch: &VertexBatch, canvas: &mut Canvas, image: Option<&ImageData>) {
        for cmd in batch.commands() {
            let texels = match (cmd.binding, image) {
                (Binding::Texture(_), Some(img)) => Texels::Image(img),
                _ => Texels::None,
            };
            draw_command(canvas, batch.vertices(), cmd, texels);
        }
    }

    fn count(canvas: &Canvas, color: u32) -> usize {
        canvas.pixels().iter().filter(|&&p| p == color).count()
    }

    // ── rectangles ────────────────────────────────────────────────────────

    #[test]
    fn filled_rect_covers_exact_pixels() {
        let e = Extent::new(20, 20);
        let mut batch = VertexBatch::new();
        Encoder::new(&mut batch, e).fill_rectangle(2.0, 3.0, 5.0, 4.0, 0xFF0000, false, 0.0);

        let mut canvas = Canvas::new(e, 0);
        replay(&batch, &mut canvas, None);

        assert_eq!(count(&canvas, 0xFF0000), 20);
        assert_eq!(canvas.pixel(2, 3), Some(0xFF0000));
        assert_eq!(canvas.pixel(6, 6), Some(0xFF0000));
        assert_eq!(canvas.pixel(7, 6), Some(0));
        assert_eq!(canvas.pixel(6, 7), Some(0));
    }

    #[test]
    fn later_commands_paint_over_earlier_ones() {
        let e = Extent::new(40, 40);
        let mut batch = VertexBatch::new();
        let mut enc = Encoder::new(&mut batch, e);
        enc.fill_rectangle(0.0, 0.0, 30.0, 30.0, 0xFF0000, false, 0.0);
        enc.fill_rectangle(10.0, 10.0, 30.0, 30.0, 0x0000FF, false, 0.0);

        let mut canvas = Canvas::new(e, 0);
        replay(&batch, &mut canvas, None);

        assert_eq!(canvas.pixel(5, 5), Some(0xFF0000));
        assert_eq!(canvas.pixel(20, 20), Some(0x0000FF));
        assert_eq!(canvas.pixel(35, 35), Some(0x0000FF));
    }

    #[test]
    fn hollow_rect_leaves_interior() {
        let e = Extent::new(20, 20);
        let mut batch = VertexBatch::new();
        Encoder::new(&mut batch, e).draw_rectangle(0.0, 0.0, 10.0, 10.0, 0xFFFFFF, 2.0, false, 0.0);

        let mut canvas = Canvas::new(e, 0);
        replay(&batch, &mut canvas, None);

        assert_eq!(canvas.pixel(0, 0), Some(0xFFFFFF));
        assert_eq!(canvas.pixel(1, 5), Some(0xFFFFFF));
        assert_eq!(canvas.pixel(5, 5), Some(0));
        assert_eq!(count(&canvas, 0xFFFFFF), 100 - 36);
    }

    // ── images ────────────────────────────────────────────────────────────

    #[test]
    fn image_is_sampled_top_left_first() {
        let e = Extent::new(8, 8);
        let mut img = ImageData::solid(2, 2, [0, 255, 0, 255]);
        img.pixels[0..4].copy_from_slice(&[255, 0, 0, 255]);

        let mut batch = VertexBatch::new();
        Encoder::new(&mut batch, e).draw_image(TextureId::default(), 0.0, 0.0, 4.0, 4.0);

        let mut canvas = Canvas::new(e, 0);
        replay(&batch, &mut canvas, Some(&img));

        assert_eq!(canvas.pixel(0, 0), Some(0xFF0000));
        assert_eq!(canvas.pixel(3, 3), Some(0x00FF00));
        assert_eq!(canvas.pixel(4, 4), Some(0));
    }

    // ── arcs ──────────────────────────────────────────────────────────────

    /// Distance from `p` to the ray leaving `c` at `deg`.
    fn ray_distance(c: (f32, f32), deg: f32, p: (f32, f32)) -> f32 {
        let (s, co) = deg.to_radians().sin_cos();
        let (dx, dy) = (p.0 - c.0, p.1 - c.1);
        let along = dx * co + dy * s;
        if along < 0.0 {
            (dx * dx + dy * dy).sqrt()
        } else {
            (dx * s - dy * co).abs()
        }
    }

    #[test]
    fn fan_and_quad_arcs_agree_within_a_pixel() {
        let e = Extent::new(120, 120);
        let (xc, yc, w, h) = (60.0, 60.0, 90.0, 90.0);
        let r = 45.0;

        for (a1, a2) in [(0.0, 360.0), (30.0, 200.0), (270.0, 45.0)] {
            let mut quad_batch = VertexBatch::new();
            Encoder::new(&mut quad_batch, e).fill_arc(xc, yc, w, h, a1, a2, 0xFFFFFF);
            let mut quad_canvas = Canvas::new(e, 0);
            replay(&quad_batch, &mut quad_canvas, None);

            let mut fan_batch = VertexBatch::new();
            let fan = geometry::arc_fan(e, (xc, yc), (w, h), (a1, a2), geometry::PANEL_ARC_SEGMENTS, [1.0; 3]);
            fan_batch.push(&fan, ShapeParams::filled_rect(w, h, false, 0.0), Binding::Solid);
            let mut fan_canvas = Canvas::new(e, 0);
            replay(&fan_batch, &mut fan_canvas, None);

            assert!(count(&quad_canvas, 0xFFFFFF) > 0);
            for y in 0..e.height {
                for x in 0..e.width {
                    if quad_canvas.pixel(x, y) == fan_canvas.pixel(x, y) {
                        continue;
                    }
                    let p = (x as f32 + 0.5, y as f32 + 0.5);
                    let dist = ((p.0 - xc).powi(2) + (p.1 - yc).powi(2)).sqrt();
                    let near_edge = (dist - r).abs() <= 1.0
                        || ray_distance((xc, yc), a1, p) <= 1.0
                        || ray_distance((xc, yc), a2, p) <= 1.0;
                    assert!(near_edge, "arc {a1}..{a2}: mismatch at ({x}, {y})");
                }
            }
        }
    }
}
