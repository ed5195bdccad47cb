//! Pure-geometry path shim.
//!
//! [`Path`] records path commands exactly as a shape plugin emits them and can
//! answer the questions the engine needs without a real rasterizer: flattened
//! outlines, bounds, fill containment (nonzero winding) and stroke proximity.

use std::f32::consts::TAU;

use crate::coords::{Rect, Vec2};

use super::PathSink;

/// Arc segments per full turn when flattening.
const ARC_SEGMENTS_PER_TURN: f32 = 64.0;

/// Maximum segments emitted for one Bézier curve.
const MAX_CURVE_SEGMENTS: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathCmd {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo(Vec2, Vec2),
    CubicTo(Vec2, Vec2, Vec2),
    /// Canvas-style arc; angles in radians, clockwise on screen.
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        anticlockwise: bool,
    },
    Close,
}

/// One flattened subpath.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    cmds: Vec<PathCmd>,
}

impl Path {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    #[inline]
    pub fn commands(&self) -> &[PathCmd] {
        &self.cmds
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    /// Converts every curve into line segments no further than roughly
    /// `tolerance` logical pixels from the true outline.
    pub fn flatten(&self, tolerance: f32) -> Vec<Polyline> {
        let tolerance = tolerance.max(0.01);
        let mut out: Vec<Polyline> = Vec::new();
        let mut current = Polyline::default();
        let mut start = Vec2::zero();

        let flush = |current: &mut Polyline, out: &mut Vec<Polyline>| {
            if current.points.len() > 1 {
                out.push(std::mem::take(current));
            } else {
                current.points.clear();
                current.closed = false;
            }
        };

        for cmd in &self.cmds {
            match *cmd {
                PathCmd::MoveTo(p) => {
                    flush(&mut current, &mut out);
                    current.points.push(p);
                    start = p;
                }
                PathCmd::LineTo(p) => {
                    if current.points.is_empty() {
                        current.points.push(start);
                    }
                    current.points.push(p);
                }
                PathCmd::QuadTo(c, p) => {
                    let from = current.points.last().copied().unwrap_or(start);
                    if current.points.is_empty() {
                        current.points.push(from);
                    }
                    let n = curve_segments(from.distance(c) + c.distance(p), tolerance);
                    for i in 1..=n {
                        let t = i as f32 / n as f32;
                        let mt = 1.0 - t;
                        current.points.push(from * (mt * mt) + c * (2.0 * mt * t) + p * (t * t));
                    }
                }
                PathCmd::CubicTo(c1, c2, p) => {
                    let from = current.points.last().copied().unwrap_or(start);
                    if current.points.is_empty() {
                        current.points.push(from);
                    }
                    let hull = from.distance(c1) + c1.distance(c2) + c2.distance(p);
                    let n = curve_segments(hull, tolerance);
                    for i in 1..=n {
                        let t = i as f32 / n as f32;
                        let mt = 1.0 - t;
                        current.points.push(
                            from * (mt * mt * mt)
                                + c1 * (3.0 * mt * mt * t)
                                + c2 * (3.0 * mt * t * t)
                                + p * (t * t * t),
                        );
                    }
                }
                PathCmd::Arc { center, radius, start: a0, end: a1, anticlockwise } => {
                    let pts = arc_points(center, radius, a0, a1, anticlockwise);
                    if current.points.is_empty() {
                        if let Some(first) = pts.first() {
                            start = *first;
                        }
                    }
                    current.points.extend(pts);
                }
                PathCmd::Close => {
                    current.closed = true;
                    let first = current.points.first().copied();
                    flush(&mut current, &mut out);
                    if let Some(first) = first {
                        start = first;
                    }
                }
            }
        }
        flush(&mut current, &mut out);
        out
    }

    /// Bounds of the flattened outline.
    pub fn bounds(&self) -> Rect {
        Rect::from_points(
            self.flatten(0.25)
                .into_iter()
                .flat_map(|poly| poly.points.into_iter()),
        )
    }

    /// Fill containment with the nonzero winding rule. Open subpaths are
    /// implicitly closed, as a fill would.
    pub fn contains(&self, p: Vec2) -> bool {
        let mut winding = 0i32;
        for poly in self.flatten(0.25) {
            winding += winding_number(&poly.points, p);
        }
        winding != 0
    }

    /// True when `p` lies within `half_width` of any flattened segment.
    pub fn stroke_contains(&self, p: Vec2, half_width: f32) -> bool {
        self.flatten(0.25).iter().any(|poly| {
            let closing = poly
                .closed
                .then(|| (poly.points.last().copied(), poly.points.first().copied()));
            poly.points
                .windows(2)
                .map(|w| (w[0], w[1]))
                .chain(closing.and_then(|(a, b)| Some((a?, b?))))
                .any(|(a, b)| p.distance_to_segment(a, b) <= half_width)
        })
    }
}

impl PathSink for Path {
    fn move_to(&mut self, p: Vec2) {
        self.cmds.push(PathCmd::MoveTo(p));
    }

    fn line_to(&mut self, p: Vec2) {
        self.cmds.push(PathCmd::LineTo(p));
    }

    fn quad_to(&mut self, ctrl: Vec2, p: Vec2) {
        self.cmds.push(PathCmd::QuadTo(ctrl, p));
    }

    fn bezier_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) {
        self.cmds.push(PathCmd::CubicTo(c1, c2, p));
    }

    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, anticlockwise: bool) {
        self.cmds.push(PathCmd::Arc { center, radius, start, end, anticlockwise });
    }

    fn close(&mut self) {
        self.cmds.push(PathCmd::Close);
    }
}

/// Signed sweep of a canvas arc, following the canvas rules for full turns.
pub fn arc_sweep(start: f32, end: f32, anticlockwise: bool) -> f32 {
    if !anticlockwise {
        let d = end - start;
        if d >= TAU { TAU } else { d.rem_euclid(TAU) }
    } else {
        let d = start - end;
        if d >= TAU { -TAU } else { -d.rem_euclid(TAU) }
    }
}

/// Points along a canvas arc, first point included.
pub fn arc_points(
    center: Vec2,
    radius: f32,
    start: f32,
    end: f32,
    anticlockwise: bool,
) -> Vec<Vec2> {
    let radius = radius.max(0.0);
    let sweep = arc_sweep(start, end, anticlockwise);
    let n = ((sweep.abs() / TAU) * ARC_SEGMENTS_PER_TURN).ceil().max(1.0) as usize;
    (0..=n)
        .map(|i| {
            let a = start + sweep * (i as f32 / n as f32);
            center + Vec2::new(a.cos(), a.sin()) * radius
        })
        .collect()
}

/// Normalizes an angle in degrees into [0, 360).
#[inline]
pub fn normalize_degrees(deg: f32) -> f32 {
    deg.rem_euclid(360.0)
}

fn curve_segments(hull_len: f32, tolerance: f32) -> usize {
    ((hull_len / tolerance).sqrt().ceil() as usize).clamp(1, MAX_CURVE_SEGMENTS)
}

fn winding_number(points: &[Vec2], p: Vec2) -> i32 {
    if points.len() < 3 {
        return 0;
    }
    let mut winding = 0;
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let side = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
        if a.y <= p.y {
            if b.y > p.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}
