//! Geometry primitives shared across the recognition pipeline.
//!
//! Every detected ink region carries both an axis-aligned bounding [`Rect`]
//! and a minimum enclosing [`Circle`]; the pipeline's spatial heuristics mix
//! the two freely (rect edges for horizontal-run tests, circle centers for
//! above/below and nearest-line decisions), so both are computed up front
//! and kept together in a [`BoundingShape`].

// Pixel coordinates fit comfortably in i32/f32 for scanned page sizes.
#![allow(clippy::cast_precision_loss)]

use serde::{Deserialize, Serialize};

/// A 2D point in image pixel coordinates.
pub type Point = (f32, f32);

/// Axis-aligned bounding rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    #[must_use = "returns a new Rect instance"]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// X coordinate of the right edge.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Y coordinate of the bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Whether the horizontal row `y` passes through this rectangle.
    ///
    /// Used for baseline/textline "touch" tests throughout segmentation,
    /// text removal and grouping.
    #[inline]
    #[must_use]
    pub const fn straddles_row(&self, y: i32) -> bool {
        self.y <= y && y <= self.y + self.h
    }

    /// Whether the x coordinate falls within this rectangle's horizontal span.
    #[inline]
    #[must_use]
    pub fn spans_x(&self, x: f32) -> bool {
        self.x as f32 <= x && x <= self.right() as f32
    }

    /// Length of the horizontal intersection with `other`; negative when the
    /// spans are disjoint.
    #[inline]
    #[must_use]
    pub fn horizontal_intersection(&self, other: &Self) -> i32 {
        self.right().min(other.right()) - self.x.max(other.x)
    }

    /// Width/height aspect ratio.
    #[inline]
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.h == 0 {
            0.0
        } else {
            self.w as f32 / self.h as f32
        }
    }
}

/// Minimum enclosing circle of an ink region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

impl Circle {
    #[inline]
    #[must_use = "returns a new Circle instance"]
    pub const fn new(x: f32, y: f32, r: f32) -> Self {
        Self { x, y, r }
    }

    #[inline]
    fn contains(&self, p: Point) -> bool {
        let dx = p.0 - self.x;
        let dy = p.1 - self.y;
        // Small slack absorbs floating point error in the circumcircle math.
        dx.mul_add(dx, dy * dy) <= self.r.mul_add(self.r, 1e-4)
    }
}

/// Bounding rectangle plus minimum enclosing circle of one ink region.
///
/// Immutable once computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingShape {
    pub rect: Rect,
    pub circle: Circle,
}

impl BoundingShape {
    /// Compute both shapes from a set of contour points.
    ///
    /// Returns `None` for an empty point set.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        #[allow(clippy::cast_possible_truncation)]
        let rect = Rect::new(
            min_x as i32,
            min_y as i32,
            (max_x - min_x) as i32 + 1,
            (max_y - min_y) as i32 + 1,
        );

        Some(Self {
            rect,
            circle: min_enclosing_circle(points),
        })
    }
}

/// Minimum enclosing circle via Welzl's algorithm.
///
/// The recursion processes points in the order given (no shuffling) so that
/// the result is deterministic for a fixed contour; contour tracing always
/// yields points in a stable order.
#[must_use]
pub fn min_enclosing_circle(points: &[Point]) -> Circle {
    let mut boundary: Vec<Point> = Vec::with_capacity(3);
    welzl(points, points.len(), &mut boundary)
}

fn welzl(points: &[Point], n: usize, boundary: &mut Vec<Point>) -> Circle {
    if n == 0 || boundary.len() == 3 {
        return trivial_circle(boundary);
    }

    let p = points[n - 1];
    let circle = welzl(points, n - 1, boundary);

    if circle.contains(p) {
        return circle;
    }

    boundary.push(p);
    let circle = welzl(points, n - 1, boundary);
    boundary.pop();
    circle
}

fn trivial_circle(boundary: &[Point]) -> Circle {
    match boundary {
        [] => Circle::default(),
        [a] => Circle::new(a.0, a.1, 0.0),
        [a, b] => circle_from_two(*a, *b),
        [a, b, c] => circle_from_three(*a, *b, *c),
        _ => unreachable!("Welzl boundary holds at most three points"),
    }
}

fn circle_from_two(a: Point, b: Point) -> Circle {
    let cx = (a.0 + b.0) / 2.0;
    let cy = (a.1 + b.1) / 2.0;
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    Circle::new(cx, cy, dx.hypot(dy) / 2.0)
}

fn circle_from_three(a: Point, b: Point, c: Point) -> Circle {
    let ax = b.0 - a.0;
    let ay = b.1 - a.1;
    let bx = c.0 - a.0;
    let by = c.1 - a.1;

    let d = 2.0 * ax.mul_add(by, -(ay * bx));
    if d.abs() < f32::EPSILON {
        // Collinear: fall back to the widest pair.
        let ab = circle_from_two(a, b);
        let ac = circle_from_two(a, c);
        let bc = circle_from_two(b, c);
        let mut best = ab;
        if ac.r > best.r {
            best = ac;
        }
        if bc.r > best.r {
            best = bc;
        }
        return best;
    }

    let a_sq = ax.mul_add(ax, ay * ay);
    let b_sq = bx.mul_add(bx, by * by);
    let ux = by.mul_add(a_sq, -(ay * b_sq)) / d;
    let uy = ax.mul_add(b_sq, -(bx * a_sq)) / d;

    Circle::new(a.0 + ux, a.1 + uy, ux.hypot(uy))
}
