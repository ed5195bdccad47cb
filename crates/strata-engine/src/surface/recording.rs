use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::coords::{Matrix, Rect, Vec2, Viewport};
use crate::paint::{Color, Paint};
use crate::style::{Brush, FontSpec};

use super::path::{Path, arc_points};
use super::{DrawError, PathSink, Surface, SurfaceFactory, SurfaceRole};

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.6;

/// One recorded drawing operation. Geometry is in surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    SetTransform(Matrix),
    Fill { bounds: Rect, paint: Paint, opacity: f32 },
    Stroke { bounds: Rect, paint: Paint, width: f32 },
    Text { text: String, origin: Vec2 },
    Image { key: String, dest: Rect },
}

/// Image keys the host is still loading, shared by a factory and every
/// surface it creates.
#[derive(Debug, Clone, Default)]
pub struct PendingImages(Rc<RefCell<HashSet<String>>>);

impl PendingImages {
    pub fn mark_pending(&self, key: &str) {
        self.0.borrow_mut().insert(key.to_string());
    }

    /// Returns `true` if `key` was pending.
    pub fn mark_ready(&self, key: &str) -> bool {
        self.0.borrow_mut().remove(key)
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.0.borrow().contains(key)
    }
}

/// Coverage raster used for pixel readback. One RGBA8 value per pixel.
#[derive(Debug, Clone)]
struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl Raster {
    fn new(viewport: Viewport) -> Self {
        let (width, height) = viewport.pixel_size();
        Self { width, height, pixels: vec![[0; 4]; width * height] }
    }

    fn clear(&mut self) {
        self.pixels.fill([0; 4]);
    }

    fn get(&self, p: Vec2) -> Option<[u8; 4]> {
        if p.x < 0.0 || p.y < 0.0 {
            return Some([0; 4]);
        }
        let (i, j) = (p.x.floor() as usize, p.y.floor() as usize);
        if i >= self.width || j >= self.height {
            return Some([0; 4]);
        }
        Some(self.pixels[j * self.width + i])
    }

    /// Writes `rgba` into every pixel whose center is inside `bounds` and passes `inside`.
    fn cover(&mut self, bounds: Rect, rgba: [u8; 4], inside: impl Fn(Vec2) -> bool) {
        if rgba[3] == 0 || self.width == 0 || !bounds.is_finite() {
            return;
        }
        let b = bounds.normalized();
        let x0 = b.origin.x.floor().max(0.0) as usize;
        let y0 = b.origin.y.floor().max(0.0) as usize;
        let x1 = (b.max().x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (b.max().y.ceil().max(0.0) as usize).min(self.height);
        for j in y0..y1 {
            for i in x0..x1 {
                if inside(Vec2::new(i as f32 + 0.5, j as f32 + 0.5)) {
                    self.pixels[j * self.width + i] = rgba;
                }
            }
        }
    }
}

/// Headless [`Surface`] that records every operation.
///
/// Path geometry is transformed into surface coordinates as it arrives, so
/// [`is_point_in_path`](Surface::is_point_in_path) works like a canvas. When
/// created with readback enabled, fills and strokes are also rasterized into a
/// coarse coverage buffer that backs [`read_pixel`](Surface::read_pixel).
#[derive(Debug)]
pub struct RecordingSurface {
    role: SurfaceRole,
    viewport: Viewport,
    ops: Vec<DrawOp>,
    clears: usize,

    transform: Matrix,
    brush: Brush,
    stack: Vec<(Matrix, Brush)>,

    path: Path,
    has_current: bool,

    raster: Option<Raster>,
    pending: PendingImages,
}

impl RecordingSurface {
    pub fn new(role: SurfaceRole, viewport: Viewport) -> Self {
        Self {
            role,
            viewport,
            ops: Vec::new(),
            clears: 0,
            transform: Matrix::identity(),
            brush: Brush::default(),
            stack: Vec::new(),
            path: Path::new(),
            has_current: false,
            raster: None,
            pending: PendingImages::default(),
        }
    }

    pub fn with_readback(mut self, enabled: bool) -> Self {
        self.raster = enabled.then(|| Raster::new(self.viewport));
        self
    }

    pub fn with_pending_images(mut self, pending: PendingImages) -> Self {
        self.pending = pending;
        self
    }

    #[inline]
    pub fn role(&self) -> SurfaceRole {
        self.role
    }

    /// Operations recorded since the last clear.
    #[inline]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of times the surface has been cleared (including resizes).
    #[inline]
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn fill_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Fill { .. })).count()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn device(&self, p: Vec2) -> Vec2 {
        self.transform.apply(p)
    }

    fn rgba(paint: &Paint, opacity: f32) -> [u8; 4] {
        paint.representative_color().with_opacity(opacity).to_rgba8()
    }
}

impl PathSink for RecordingSurface {
    fn move_to(&mut self, p: Vec2) {
        self.path.move_to(self.device(p));
        self.has_current = true;
    }

    fn line_to(&mut self, p: Vec2) {
        if !self.has_current {
            return self.move_to(p);
        }
        self.path.line_to(self.device(p));
    }

    fn quad_to(&mut self, ctrl: Vec2, p: Vec2) {
        if !self.has_current {
            self.move_to(ctrl);
        }
        self.path.quad_to(self.device(ctrl), self.device(p));
    }

    fn bezier_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) {
        if !self.has_current {
            self.move_to(c1);
        }
        self.path.bezier_to(self.device(c1), self.device(c2), self.device(p));
    }

    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, anticlockwise: bool) {
        // Flattened before transforming: arcs are not closed under affine maps.
        let mut pts = arc_points(center, radius, start, end, anticlockwise).into_iter();
        if let Some(first) = pts.next() {
            if self.has_current {
                self.path.line_to(self.device(first));
            } else {
                self.move_to(first);
            }
        }
        for p in pts {
            self.path.line_to(self.device(p));
        }
    }

    fn close(&mut self) {
        self.path.close();
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
        self.transform = Matrix::identity();
        self.brush = Brush::default();
        self.stack.clear();
        self.path.clear();
        self.has_current = false;
        if let Some(raster) = &mut self.raster {
            raster.clear();
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.raster.is_some() {
            self.raster = Some(Raster::new(viewport));
        }
        self.clear();
    }

    fn save(&mut self) {
        self.stack.push((self.transform, self.brush.clone()));
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        if let Some((transform, brush)) = self.stack.pop() {
            self.transform = transform;
            self.brush = brush;
        }
        self.ops.push(DrawOp::Restore);
    }

    fn set_transform(&mut self, m: Matrix) {
        self.transform = m;
        self.ops.push(DrawOp::SetTransform(m));
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.has_current = false;
    }

    fn set_brush(&mut self, brush: &Brush) {
        self.brush = brush.clone();
    }

    fn fill(&mut self) {
        let bounds = self.path.bounds();
        let paint = self.brush.fill.clone();
        let opacity = self.brush.opacity;
        if let Some(raster) = &mut self.raster {
            let path = &self.path;
            raster.cover(bounds, Self::rgba(&paint, opacity), |p| path.contains(p));
        }
        self.ops.push(DrawOp::Fill { bounds, paint, opacity });
    }

    fn stroke(&mut self) {
        let width = self.brush.stroke.width * self.transform.max_scale();
        let half = width * 0.5;
        let bounds = self.path.bounds().expand(half);
        let paint = self.brush.stroke.paint.clone();
        if let Some(raster) = &mut self.raster {
            let path = &self.path;
            let rgba = Self::rgba(&paint, self.brush.opacity);
            raster.cover(bounds, rgba, |p| path.stroke_contains(p, half));
        }
        self.ops.push(DrawOp::Stroke { bounds, paint, width });
    }

    fn is_point_in_path(&self, p: Vec2) -> Option<bool> {
        Some(self.path.contains(p))
    }

    fn fill_text(&mut self, text: &str, origin: Vec2, font: &FontSpec, _color: Color) {
        let origin = self.device(origin);
        if let Some(raster) = &mut self.raster {
            let advance = text.chars().count() as f32 * font.size * GLYPH_ADVANCE;
            let size = Vec2::new(advance, font.size);
            raster.cover(Rect::from_origin_size(origin, size), [0, 0, 0, 255], |_| true);
        }
        self.ops.push(DrawOp::Text { text: text.to_string(), origin });
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * font.size * GLYPH_ADVANCE, font.size)
    }

    fn draw_image(&mut self, key: &str, dest: Rect) -> Result<(), DrawError> {
        if self.pending.is_pending(key) {
            return Err(DrawError::NotReady { resource: key.to_string() });
        }
        let corners = [
            dest.min(),
            Vec2::new(dest.max().x, dest.min().y),
            dest.max(),
            Vec2::new(dest.min().x, dest.max().y),
        ];
        let device = Rect::from_points(corners.map(|c| self.device(c)));
        if let (Some(raster), Some(inv)) = (&mut self.raster, self.transform.invert()) {
            raster.cover(device, [128, 128, 128, 255], |p| dest.contains_inclusive(inv.apply(p)));
        }
        self.ops.push(DrawOp::Image { key: key.to_string(), dest: device });
        Ok(())
    }

    fn read_pixel(&self, p: Vec2) -> Option<[u8; 4]> {
        self.raster.as_ref()?.get(p)
    }

    fn as_path_sink(&mut self) -> &mut dyn PathSink {
        self
    }
}

/// Factory for [`RecordingSurface`]s sharing one viewport and pending-image set.
#[derive(Debug, Clone)]
pub struct RecordingFactory {
    viewport: Viewport,
    readback: bool,
    pending: PendingImages,
    created: usize,
}

impl RecordingFactory {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            readback: false,
            pending: PendingImages::default(),
            created: 0,
        }
    }

    /// Enables pixel readback on the scratch surface, turning on the
    /// pixel-readback hit-test tier.
    pub fn with_readback(mut self, enabled: bool) -> Self {
        self.readback = enabled;
        self
    }

    /// Host-side resize. Takes effect on the next compositor resize.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn pending_images(&self) -> PendingImages {
        self.pending.clone()
    }

    /// Number of surfaces created so far.
    pub fn created(&self) -> usize {
        self.created
    }
}

impl SurfaceFactory for RecordingFactory {
    type Surface = RecordingSurface;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn create(&mut self, role: SurfaceRole) -> RecordingSurface {
        self.created += 1;
        log::trace!("recording surface created: {role:?}");
        RecordingSurface::new(role, self.viewport)
            .with_readback(self.readback && role == SurfaceRole::Scratch)
            .with_pending_images(self.pending.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(readback: bool) -> RecordingSurface {
        RecordingSurface::new(SurfaceRole::Scratch, Viewport::new(40.0, 40.0))
            .with_readback(readback)
    }

    // ── path state ────────────────────────────────────────────────────────

    #[test]
    fn path_is_stored_in_surface_coordinates() {
        let mut s = surface(false);
        s.set_transform(Matrix::translation(10.0, 10.0));
        s.begin_path();
        s.rect(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(s.is_point_in_path(Vec2::new(12.0, 12.0)), Some(true));
        assert_eq!(s.is_point_in_path(Vec2::new(2.0, 2.0)), Some(false));
    }

    #[test]
    fn restore_pops_transform() {
        let mut s = surface(false);
        s.save();
        s.set_transform(Matrix::translation(5.0, 0.0));
        s.restore();
        s.begin_path();
        s.move_to(Vec2::zero());
        s.line_to(Vec2::new(1.0, 0.0));
        s.line_to(Vec2::new(1.0, 1.0));
        s.close();
        assert_eq!(s.is_point_in_path(Vec2::new(0.8, 0.3)), Some(true));
    }

    #[test]
    fn clear_resets_ops_and_counts() {
        let mut s = surface(false);
        s.begin_path();
        s.rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        s.fill();
        assert_eq!(s.fill_count(), 1);
        s.clear();
        assert!(s.ops().is_empty());
        assert_eq!(s.clear_count(), 1);
    }

    // ── readback ──────────────────────────────────────────────────────────

    #[test]
    fn readback_reflects_fill() {
        let mut s = surface(true);
        s.set_brush(&Brush { fill: Paint::Solid(Color::white()), ..Brush::default() });
        s.begin_path();
        s.arc(Vec2::new(20.0, 20.0), 5.0, 0.0, std::f32::consts::TAU, false);
        s.fill();
        assert_eq!(s.read_pixel(Vec2::new(20.0, 20.0)).map(|p| p[3]), Some(255));
        assert_eq!(s.read_pixel(Vec2::new(2.0, 2.0)).map(|p| p[3]), Some(0));
    }

    #[test]
    fn no_readback_without_raster() {
        assert!(surface(false).read_pixel(Vec2::zero()).is_none());
    }

    // ── images ────────────────────────────────────────────────────────────

    #[test]
    fn pending_image_is_not_ready() {
        let mut factory = RecordingFactory::new(Viewport::new(10.0, 10.0));
        let mut s = factory.create(SurfaceRole::Overlay);
        factory.pending_images().mark_pending("logo");
        assert!(matches!(
            s.draw_image("logo", Rect::new(0.0, 0.0, 4.0, 4.0)),
            Err(DrawError::NotReady { .. })
        ));
        assert!(factory.pending_images().mark_ready("logo"));
        assert!(s.draw_image("logo", Rect::new(0.0, 0.0, 4.0, 4.0)).is_ok());
    }
}
