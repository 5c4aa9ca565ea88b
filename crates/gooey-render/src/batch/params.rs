use bytemuck::{Pod, Zeroable};

/// Shape selector read by the fragment stage.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShapeType {
    Rect = 0,
    Line = 1,
    Arc = 2,
}

impl ShapeType {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Rect),
            1 => Some(Self::Line),
            2 => Some(Self::Arc),
            _ => None,
        }
    }
}

/// Per-draw parameter block.
///
/// The layout matches the `ShapeParams` uniform struct in `shape.wgsl` and
/// `text.wgsl` (48 bytes, 16-byte multiple). Booleans are stored as `u32`
/// because WGSL uniforms cannot hold `bool`.
///
/// `size` is the shape's bounding size in pixels. `arc_angles` holds the
/// start/end angle in degrees for [`ShapeType::Arc`] and is zero otherwise.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ShapeParams {
    pub use_texture: u32,
    pub is_rounded: u32,
    pub is_hollow: u32,
    pub shape_type: u32,
    pub radius: f32,
    pub border_width: f32,
    pub size: [f32; 2],
    pub arc_angles: [f32; 2],
    pub _pad: [f32; 2],
}

impl ShapeParams {
    pub fn filled_rect(width: f32, height: f32, rounded: bool, corner_radius: f32) -> Self {
        Self {
            is_rounded: rounded as u32,
            radius: if rounded { corner_radius } else { 0.0 },
            size: [width, height],
            ..Self::default()
        }
    }

    /// Hollow rectangle: the quad still covers the full bounds, the fragment
    /// stage keeps only pixels within `thickness` of the edge.
    pub fn hollow_rect(
        width: f32,
        height: f32,
        thickness: f32,
        rounded: bool,
        corner_radius: f32,
    ) -> Self {
        Self {
            is_hollow: 1,
            border_width: thickness,
            ..Self::filled_rect(width, height, rounded, corner_radius)
        }
    }

    pub fn line(dx: f32, dy: f32, width: f32) -> Self {
        Self {
            shape_type: ShapeType::Line as u32,
            border_width: width,
            size: [dx.abs(), dy.abs()],
            ..Self::default()
        }
    }

    pub fn arc(width: f32, height: f32, angle_start: f32, angle_end: f32) -> Self {
        Self {
            shape_type: ShapeType::Arc as u32,
            radius: width.min(height) * 0.5,
            size: [width, height],
            arc_angles: [angle_start, angle_end],
            ..Self::default()
        }
    }

    pub fn textured(width: f32, height: f32) -> Self {
        Self {
            use_texture: 1,
            size: [width, height],
            ..Self::default()
        }
    }

    #[inline]
    pub fn uses_texture(&self) -> bool {
        self.use_texture != 0
    }

    #[inline]
    pub fn rounded(&self) -> bool {
        self.is_rounded != 0
    }

    #[inline]
    pub fn hollow(&self) -> bool {
        self.is_hollow != 0
    }

    #[inline]
    pub fn shape(&self) -> Option<ShapeType> {
        ShapeType::from_raw(self.shape_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_is_48_bytes() {
        assert_eq!(std::mem::size_of::<ShapeParams>(), 48);
        assert_eq!(std::mem::size_of::<ShapeParams>() % 16, 0);
    }

    #[test]
    fn hollow_keeps_full_bounds() {
        let p = ShapeParams::hollow_rect(40.0, 20.0, 2.0, true, 4.0);
        assert!(p.hollow());
        assert!(p.rounded());
        assert_eq!(p.size, [40.0, 20.0]);
        assert_eq!(p.border_width, 2.0);
        assert_eq!(p.shape(), Some(ShapeType::Rect));
    }

    #[test]
    fn square_corners_drop_radius() {
        let p = ShapeParams::filled_rect(10.0, 10.0, false, 8.0);
        assert_eq!(p.radius, 0.0);
    }

    #[test]
    fn arc_radius_is_half_the_short_side() {
        let p = ShapeParams::arc(60.0, 40.0, 0.0, 90.0);
        assert_eq!(p.radius, 20.0);
        assert_eq!(p.arc_angles, [0.0, 90.0]);
    }
}
