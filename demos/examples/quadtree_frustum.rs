// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frustum culling over a quadtree.
//!
//! Describe a camera wedge as inward-facing half-planes and collect the
//! entries that might be visible, a building block for render culling.
//!
//! Run:
//! - `cargo run -p understory_quadtree_demos --example quadtree_frustum`

use kurbo::{Point, Rect, Vec2};
use understory_quadtree::{HalfPlane, QuadTree};

fn main() {
    env_logger::init();

    let mut tree = QuadTree::new(100.0, Point::ZERO, 2.0, 1.25);

    // A ring of props around the origin.
    let count = 12;
    for i in 0..count {
        let angle = core::f64::consts::TAU * i as f64 / count as f64;
        let center = Point::new(30.0 * angle.cos(), 30.0 * angle.sin());
        tree.add(i, Rect::from_center_size(center, (4.0, 4.0)));
    }

    // A wedge looking along +x: everything right of the origin, between the
    // two diagonals.
    let frustum = [
        HalfPlane::new(Vec2::new(1.0, 0.0), 0.0),
        HalfPlane::through(Point::ZERO, Vec2::new(1.0, 1.0)),
        HalfPlane::through(Point::ZERO, Vec2::new(1.0, -1.0)),
    ];

    let mut visible = Vec::new();
    tree.get_within_frustum(&frustum, &mut visible);
    visible.sort_unstable();
    println!("visible in the +x wedge: {visible:?}");

    // Rotate the wedge to look along -y and compare.
    let frustum_down = [
        HalfPlane::new(Vec2::new(0.0, -1.0), 0.0),
        HalfPlane::through(Point::ZERO, Vec2::new(1.0, -1.0)),
        HalfPlane::through(Point::ZERO, Vec2::new(-1.0, -1.0)),
    ];
    let mut below = Vec::new();
    tree.get_within_frustum(&frustum_down, &mut below);
    below.sort_unstable();
    println!("visible looking down:    {below:?}");
}
