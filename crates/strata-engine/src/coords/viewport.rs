/// Viewport size in logical pixels.
///
/// Every layer surface, the overlay and the hit-test scratch surface share one viewport.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Pixel dimensions, rounded up. Invalid viewports map to `(0, 0)`.
    #[inline]
    pub fn pixel_size(self) -> (usize, usize) {
        if !self.is_valid() {
            return (0, 0);
        }
        (self.width.ceil() as usize, self.height.ceil() as usize)
    }
}
