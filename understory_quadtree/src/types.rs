// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Support types for convex-region queries: oriented half-planes.

use kurbo::{Point, Rect, Vec2};

/// An oriented half-plane: the set of points `p` with `normal · p + offset ≥ 0`.
///
/// A convex region (for example a camera frustum projected onto the quadtree
/// plane) is described as the intersection of the positive half-spaces of a
/// plane set. See [`QuadTree::get_within_frustum`](crate::QuadTree::get_within_frustum).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HalfPlane {
    /// Normal pointing toward the inside of the region.
    pub normal: Vec2,
    /// Signed offset from the origin along the normal.
    pub offset: f64,
}

impl HalfPlane {
    /// Construct a half-plane from its inward normal and offset.
    pub const fn new(normal: Vec2, offset: f64) -> Self {
        Self { normal, offset }
    }

    /// The half-plane whose boundary passes through `point` with inward
    /// normal `normal`.
    pub fn through(point: Point, normal: Vec2) -> Self {
        Self {
            normal,
            offset: -(normal.x * point.x + normal.y * point.y),
        }
    }

    /// Signed distance-like value for `p`; non-negative means inside.
    ///
    /// The value is a true distance only when `normal` is unit length.
    #[inline]
    pub fn signed_distance(&self, p: Point) -> f64 {
        self.normal.x * p.x + self.normal.y * p.y + self.offset
    }

    /// Whether `p` lies in the closed positive half-space.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.signed_distance(p) >= 0.0
    }
}

/// True if `rect` lies entirely on the negative side of some plane in the
/// set. Conservative: a rectangle near a corner of the intersection region
/// can pass every per-plane test while the region misses it.
pub(crate) fn rect_outside_planes(rect: &Rect, planes: &[HalfPlane]) -> bool {
    planes.iter().any(|plane| {
        let corners = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x0, rect.y1),
            Point::new(rect.x1, rect.y1),
        ];
        corners.iter().all(|c| plane.signed_distance(*c) < 0.0)
    })
}
