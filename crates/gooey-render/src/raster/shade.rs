//! Per-fragment coverage rules shared by the GPU shader and the CPU rasterizer.
//!
//! `local` is a fragment position in pixels relative to the top-left corner of
//! the shape's quad, i.e. interpolated texture coordinate times `params.size`.

use crate::batch::{ShapeParams, ShapeType};

pub fn covers(params: &ShapeParams, local: [f32; 2]) -> bool {
    match params.shape() {
        Some(ShapeType::Arc) => arc_covers(params, local),
        Some(ShapeType::Line) => true,
        Some(ShapeType::Rect) | None => rect_covers(params, local),
    }
}

fn rect_covers(params: &ShapeParams, local: [f32; 2]) -> bool {
    if !params.rounded() && !params.hollow() {
        return true;
    }
    let d = rect_distance(params, local);
    if d > 0.0 {
        return false;
    }
    !params.hollow() || d > -params.border_width
}

/// Signed distance to the (optionally rounded) rectangle outline; negative inside.
pub fn rect_distance(params: &ShapeParams, local: [f32; 2]) -> f32 {
    let half = [params.size[0] * 0.5, params.size[1] * 0.5];
    let r = if params.rounded() {
        params.radius.clamp(0.0, half[0].min(half[1]))
    } else {
        0.0
    };
    let qx = (local[0] - half[0]).abs() - (half[0] - r);
    let qy = (local[1] - half[1]).abs() - (half[1] - r);
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    outside + qx.max(qy).min(0.0) - r
}

fn arc_covers(params: &ShapeParams, local: [f32; 2]) -> bool {
    let dx = local[0] - params.size[0] * 0.5;
    let dy = local[1] - params.size[1] * 0.5;
    if (dx * dx + dy * dy).sqrt() > params.radius {
        return false;
    }
    angle_in_sweep(dy.atan2(dx).to_degrees(), params.arc_angles[0], params.arc_angles[1])
}

/// Whether `angle` (degrees) falls in the half-open sweep `[start, end)`.
///
/// A negative sweep covers the same sector walked the other way; a sweep of
/// 360° or more is a full circle.
pub fn angle_in_sweep(angle: f32, start: f32, end: f32) -> bool {
    let (mut start, mut sweep) = (start, end - start);
    if sweep < 0.0 {
        start = end;
        sweep = -sweep;
    }
    if sweep >= 360.0 {
        return true;
    }
    (angle - start).rem_euclid(360.0) < sweep
}
