//! Pixel ↔ normalized-device-coordinate mapping.

use super::Extent;

/// Maps a pixel position (top-left origin, +Y down) to NDC (center origin, +Y up).
///
/// `ndc_x = 2·x/width − 1`, `ndc_y = 1 − 2·y/height`.
///
/// The extent must be non-zero; callers guard against minimized windows.
#[inline]
pub fn to_ndc(extent: Extent, x: f32, y: f32) -> (f32, f32) {
    debug_assert!(extent.is_valid(), "to_ndc on zero-sized extent");
    let w = extent.width as f32;
    let h = extent.height as f32;
    (2.0 * x / w - 1.0, 1.0 - 2.0 * y / h)
}

/// Maps a pixel size to an NDC size. Always non-negative for non-negative input.
#[inline]
pub fn to_ndc_extent(extent: Extent, w: f32, h: f32) -> (f32, f32) {
    debug_assert!(extent.is_valid(), "to_ndc_extent on zero-sized extent");
    (2.0 * w / extent.width as f32, 2.0 * h / extent.height as f32)
}

/// Inverse of [`to_ndc`].
#[inline]
pub fn from_ndc(extent: Extent, ndc_x: f32, ndc_y: f32) -> (f32, f32) {
    let w = extent.width as f32;
    let h = extent.height as f32;
    ((ndc_x + 1.0) * w * 0.5, (1.0 - ndc_y) * h * 0.5)
}

/// Maps a pixel position into the Y-down clip convention stored in vertex batches.
///
/// This is [`to_ndc`] with the Y axis mirrored: the top edge of the window is
/// `-1`, the bottom edge `+1`. The shape vertex shader flips it back.
#[inline]
pub fn to_clip(extent: Extent, x: f32, y: f32) -> [f32; 2] {
    let (nx, ny) = to_ndc(extent, x, y);
    [nx, -ny]
}

/// Inverse of [`to_clip`].
#[inline]
pub fn from_clip(extent: Extent, clip: [f32; 2]) -> (f32, f32) {
    from_ndc(extent, clip[0], -clip[1])
}
