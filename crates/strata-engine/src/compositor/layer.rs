use crate::scene::ZLevel;
use crate::surface::Surface;

/// One drawing surface holding every record of a single z-level.
#[derive(Debug)]
pub struct Layer<S> {
    z: ZLevel,
    surface: S,
    redraws: u64,
}

impl<S: Surface> Layer<S> {
    pub(crate) fn new(z: ZLevel, surface: S) -> Self {
        Self { z, surface, redraws: 0 }
    }

    #[inline]
    pub fn z(&self) -> ZLevel {
        self.z
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Number of times this layer was cleared and repainted.
    #[inline]
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub(crate) fn begin_redraw(&mut self) -> &mut S {
        self.redraws += 1;
        self.surface.clear();
        &mut self.surface
    }
}
