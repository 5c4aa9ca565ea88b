/// Window size in physical pixels.
///
/// Every NDC conversion is relative to one of these; it is read from the
/// window at call time so resizes take effect on the next draw.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-area extent cannot be mapped to NDC (minimized windows report this).
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Extent {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}
