//! Vertex geometry for the draw primitives, in batch clip space.

use crate::batch::Vertex;
use crate::coords::{to_clip, Extent};
use crate::text::GlyphQuad;

/// Texture coordinates for the six corners emitted by [`quad`]:
/// top-left, top-right, bottom-left, top-right, bottom-right, bottom-left.
pub const QUAD_UV: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
];

/// Segments used when an arc is triangulated on the CPU.
pub const GL_ARC_SEGMENTS: u32 = 80;
pub const PANEL_ARC_SEGMENTS: u32 = 36;

/// Two triangles covering `[x, x+w] × [y, y+h]` (pixels).
pub fn quad(extent: Extent, x: f32, y: f32, w: f32, h: f32, color: [f32; 3]) -> [Vertex; 6] {
    let corners = [
        (x, y),
        (x + w, y),
        (x, y + h),
        (x + w, y),
        (x + w, y + h),
        (x, y + h),
    ];
    std::array::from_fn(|i| Vertex::new(to_clip(extent, corners[i].0, corners[i].1), color, QUAD_UV[i]))
}

/// Quad of `width` pixels straddling the segment `(x1,y1)–(x2,y2)`.
///
/// A zero-length segment becomes a `width`-sized square so a single point
/// still shows up.
pub fn line_quad(
    extent: Extent,
    (x1, y1): (f32, f32),
    (x2, y2): (f32, f32),
    width: f32,
    color: [f32; 3],
) -> [Vertex; 6] {
    let (dx, dy) = (x2 - x1, y2 - y1);
    let len = (dx * dx + dy * dy).sqrt();
    let half = width * 0.5;

    let (nx, ny, ex, ey) = if len > f32::EPSILON {
        (-dy / len * half, dx / len * half, 0.0, 0.0)
    } else {
        (0.0, half, half, 0.0)
    };

    let a = (x1 - ex + nx, y1 - ey + ny);
    let b = (x2 + ex + nx, y2 + ey + ny);
    let c = (x1 - ex - nx, y1 - ey - ny);
    let d = (x2 + ex - nx, y2 + ey - ny);
    let corners = [a, b, c, b, d, c];

    std::array::from_fn(|i| Vertex::new(to_clip(extent, corners[i].0, corners[i].1), color, QUAD_UV[i]))
}

/// Bounding quad of an arc's ellipse centered at `(xc, yc)`.
pub fn arc_quad(extent: Extent, xc: f32, yc: f32, w: f32, h: f32, color: [f32; 3]) -> [Vertex; 6] {
    quad(extent, xc - w * 0.5, yc - h * 0.5, w, h, color)
}

/// Triangle list fanning out from `(xc, yc)` over `[angle_start, angle_end]`
/// (degrees, `x = xc + r·cos a`, `y = yc + r·sin a`, `r = min(w,h)/2`).
pub fn arc_fan(
    extent: Extent,
    (xc, yc): (f32, f32),
    (w, h): (f32, f32),
    (angle_start, angle_end): (f32, f32),
    segments: u32,
    color: [f32; 3],
) -> Vec<Vertex> {
    let segments = segments.max(1);
    let r = w.min(h) * 0.5;
    let a0 = angle_start.to_radians();
    let sweep = (angle_end - angle_start).to_radians();

    let ring = |i: u32| {
        let a = a0 + sweep * i as f32 / segments as f32;
        to_clip(extent, xc + r * a.cos(), yc + r * a.sin())
    };
    let center = to_clip(extent, xc, yc);

    let mut out = Vec::with_capacity(segments as usize * 3);
    for i in 0..segments {
        out.push(Vertex::new(center, color, [0.5, 0.5]));
        out.push(Vertex::new(ring(i), color, [0.0, 0.0]));
        out.push(Vertex::new(ring(i + 1), color, [1.0, 1.0]));
    }
    out
}

/// Textured quads for laid-out glyphs; texture coordinates index the glyph atlas.
pub fn glyph_vertices(extent: Extent, quads: &[GlyphQuad], color: [f32; 3]) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(quads.len() * 6);
    for q in quads {
        let (u0, v0, u1, v1) = (q.uv_min[0], q.uv_min[1], q.uv_max[0], q.uv_max[1]);
        let corners = [
            (q.x0, q.y0, u0, v0),
            (q.x1, q.y0, u1, v0),
            (q.x0, q.y1, u0, v1),
            (q.x1, q.y0, u1, v0),
            (q.x1, q.y1, u1, v1),
            (q.x0, q.y1, u0, v1),
        ];
        out.extend(
            corners
                .iter()
                .map(|&(x, y, u, v)| Vertex::new(to_clip(extent, x, y), color, [u, v])),
        );
    }
    out
}
