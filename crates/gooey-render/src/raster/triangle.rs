use crate::batch::{DrawCommand, ShapeParams, Vertex};
use crate::coords::from_clip;
use crate::resources::ImageData;
use crate::text::GlyphAtlas;

use super::canvas::Canvas;
use super::shade;

/// What a command samples, if anything.
#[derive(Debug, Copy, Clone)]
pub enum Texels<'a> {
    None,
    Image(&'a ImageData),
    /// Single-channel coverage; the vertex color is used at that alpha.
    Coverage(&'a GlyphAtlas),
}

/// Rasterizes one recorded command onto `canvas`.
///
/// Vertices are read in triangle-list order from `vertices[cmd.vertex_range()]`;
/// a range outside `vertices` is logged and skipped.
pub fn draw_command(canvas: &mut Canvas, vertices: &[Vertex], cmd: &DrawCommand, texels: Texels<'_>) {
    let range = cmd.vertex_range();
    let Some(slice) = vertices.get(range.start as usize..range.end as usize) else {
        log::warn!("raster: command range {range:?} outside {} vertices", vertices.len());
        return;
    };
    for tri in slice.chunks_exact(3) {
        fill_triangle(canvas, [&tri[0], &tri[1], &tri[2]], &cmd.params, texels);
    }
}

fn edge(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

/// Pixels exactly on a shared edge belong to one of the two triangles only.
fn owns(w: f32, a: (f32, f32), b: (f32, f32)) -> bool {
    if w != 0.0 {
        return w > 0.0;
    }
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    dy < 0.0 || (dy == 0.0 && dx > 0.0)
}

fn fill_triangle(canvas: &mut Canvas, tri: [&Vertex; 3], params: &ShapeParams, texels: Texels<'_>) {
    let extent = canvas.extent();
    let mut v = tri;
    let mut p = v.map(|vert| from_clip(extent, vert.pos));

    let mut area = edge(p[0], p[1], p[2]);
    if area.abs() <= f32::EPSILON {
        return;
    }
    if area < 0.0 {
        v.swap(1, 2);
        p.swap(1, 2);
        area = -area;
    }

    let min_x = p.iter().map(|q| q.0).fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
    let min_y = p.iter().map(|q| q.1).fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
    let max_x = (p.iter().map(|q| q.0).fold(f32::NEG_INFINITY, f32::max).ceil().max(0.0) as u32)
        .min(extent.width);
    let max_y = (p.iter().map(|q| q.1).fold(f32::NEG_INFINITY, f32::max).ceil().max(0.0) as u32)
        .min(extent.height);

    for y in min_y..max_y {
        for x in min_x..max_x {
            let c = (x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(p[1], p[2], c);
            let w1 = edge(p[2], p[0], c);
            let w2 = edge(p[0], p[1], c);
            if !(owns(w0, p[1], p[2]) && owns(w1, p[2], p[0]) && owns(w2, p[0], p[1])) {
                continue;
            }

            let (l0, l1, l2) = (w0 / area, w1 / area, w2 / area);
            let uv = [
                l0 * v[0].tex_coord[0] + l1 * v[1].tex_coord[0] + l2 * v[2].tex_coord[0],
                l0 * v[0].tex_coord[1] + l1 * v[1].tex_coord[1] + l2 * v[2].tex_coord[1],
            ];
            let local = [uv[0] * params.size[0], uv[1] * params.size[1]];
            if !shade::covers(params, local) {
                continue;
            }

            let color = [
                l0 * v[0].color[0] + l1 * v[1].color[0] + l2 * v[2].color[0],
                l0 * v[0].color[1] + l1 * v[1].color[1] + l2 * v[2].color[1],
                l0 * v[0].color[2] + l1 * v[1].color[2] + l2 * v[2].color[2],
            ];
            let (rgb, alpha) = shade_texel(color, uv, params, texels);
            if alpha > 0.0 {
                canvas.blend(x, y, rgb, alpha);
            }
        }
    }
}

fn shade_texel(color: [f32; 3], uv: [f32; 2], params: &ShapeParams, texels: Texels<'_>) -> ([f32; 3], f32) {
    match texels {
        Texels::Image(img) if params.uses_texture() => {
            let (x, y) = nearest(uv, img.width, img.height);
            let [r, g, b, a] = img.pixel(x, y).unwrap_or([0, 0, 0, 0]);
            let t = |c: u8| c as f32 / 255.0;
            ([t(r) * color[0], t(g) * color[1], t(b) * color[2]], t(a))
        }
        Texels::Coverage(atlas) => {
            let (x, y) = nearest(uv, atlas.width, atlas.height);
            (color, atlas.coverage(x, y) as f32 / 255.0)
        }
        _ => (color, 1.0),
    }
}

fn nearest(uv: [f32; 2], width: u32, height: u32) -> (u32, u32) {
    let x = (uv[0] * width as f32).floor().clamp(0.0, width.saturating_sub(1) as f32);
    let y = (uv[1] * height as f32).floor().clamp(0.0, height.saturating_sub(1) as f32);
    (x as u32, y as u32)
}
