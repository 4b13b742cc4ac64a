//! Axis-aligned rectangles and swept segment intersection
//!
//! A moving ball is reduced to the segment its center sweeps during one tick.
//! Each block contributes the two edges that face the direction of travel,
//! pushed outward by a small padding so grazing paths still register.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Below this, a segment-vs-line denominator is treated as parallel
const PARALLEL_EPSILON: f32 = 1e-9;

/// Axis-aligned rectangle, `pos` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Same rectangle moved by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            pos: self.pos + delta,
            size: self.size,
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }
}

/// Which pair of faces a collision happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitAxis {
    /// Top or bottom face: the vertical direction component flips
    Vertical = 0,
    /// Left or right face: the horizontal direction component flips
    Horizontal = 1,
}

impl HitAxis {
    /// Reflect `dir` off a face of this axis
    #[inline]
    pub fn reflect(self, dir: Vec2) -> Vec2 {
        match self {
            HitAxis::Vertical => Vec2::new(dir.x, -dir.y),
            HitAxis::Horizontal => Vec2::new(-dir.x, dir.y),
        }
    }
}

/// Implicit line `a*x + b*y + c = 0`
#[derive(Debug, Clone, Copy)]
struct Line {
    a: f32,
    b: f32,
    c: f32,
}

impl Line {
    #[inline]
    fn eval(&self, p: Vec2) -> f32 {
        self.a * p.x + self.b * p.y + self.c
    }
}

/// Directed line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    fn line(&self) -> Line {
        let d = self.delta();
        let a = -d.y;
        let b = d.x;
        Line {
            a,
            b,
            c: -(a * self.start.x + b * self.start.y),
        }
    }

    /// Point at fraction `u` along the segment
    #[inline]
    pub fn point_at(&self, u: f32) -> Vec2 {
        self.start + self.delta() * u
    }
}

/// Intersect `path` with `edge`, returning the fraction along `path`.
///
/// Only strict interior crossings count: each segment's endpoints must lie on
/// opposite sides of the other's line. Touching, collinear, parallel and
/// zero-length inputs all report `None`.
pub fn segment_intersection(path: &Segment, edge: &Segment) -> Option<f32> {
    let path_line = path.line();
    let edge_line = edge.line();

    let path_start = edge_line.eval(path.start);
    let path_end = edge_line.eval(path.end);
    let edge_start = path_line.eval(edge.start);
    let edge_end = path_line.eval(edge.end);

    if path_start * path_end >= 0.0 || edge_start * edge_end >= 0.0 {
        return None;
    }

    let denom = path_start - path_end;
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let u = path_start / denom;
    u.is_finite().then_some(u)
}

/// The two padded edges of `rect` a ball heading along `dir` can strike.
///
/// The vertical test uses the bottom face when moving up and the top face
/// otherwise; the horizontal test uses the right face when moving left and
/// the left face otherwise.
pub fn facing_edges(rect: &Rect, dir: Vec2, padding: f32) -> [(HitAxis, Segment); 2] {
    let left = rect.left() - padding;
    let right = rect.right() + padding;
    let top = rect.top() - padding;
    let bottom = rect.bottom() + padding;

    let face_y = if dir.y < 0.0 { bottom } else { top };
    let face_x = if dir.x < 0.0 { right } else { left };

    [
        (
            HitAxis::Vertical,
            Segment::new(Vec2::new(left, face_y), Vec2::new(right, face_y)),
        ),
        (
            HitAxis::Horizontal,
            Segment::new(Vec2::new(face_x, top), Vec2::new(face_x, bottom)),
        ),
    ]
}

/// Earliest crossing of `path` into `rect`'s facing edges as `(axis, u)`.
///
/// On equal fractions the vertical face wins.
pub fn swept_rect_hit(path: &Segment, rect: &Rect, padding: f32) -> Option<(HitAxis, f32)> {
    let mut best: Option<(HitAxis, f32)> = None;
    for (axis, edge) in facing_edges(rect, path.delta(), padding) {
        if let Some(u) = segment_intersection(path, &edge) {
            if best.is_none_or(|(_, best_u)| u < best_u) {
                best = Some((axis, u));
            }
        }
    }
    best
}
