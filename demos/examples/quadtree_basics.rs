// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree basics.
//!
//! Build a small world, run overlap queries, remove an entry.
//!
//! Run:
//! - `cargo run -p understory_quadtree_demos --example quadtree_basics`

use kurbo::{Point, Rect};
use understory_quadtree::QuadTree;

fn main() {
    env_logger::init();

    // A 10×10 world around the origin; nodes no smaller than 1, looseness 1.25.
    let mut tree = QuadTree::new(10.0, Point::ZERO, 1.0, 1.25);

    tree.add("player", Rect::from_center_size(Point::new(1.0, 1.0), (1.0, 1.0)));
    tree.add("crate", Rect::from_center_size(Point::new(-2.0, 3.0), (1.0, 1.0)));
    tree.add("door", Rect::from_center_size(Point::new(4.0, -4.0), (1.0, 2.0)));

    println!("tree: {tree:?}");

    // Overlap probe around the player.
    let probe = Rect::from_center_size(Point::new(1.0, 1.0), (2.0, 2.0));
    println!("anything near the player? {}", tree.is_colliding(probe));

    let mut hits = Vec::new();
    tree.get_colliding(Rect::new(-4.0, 0.0, 2.0, 4.0), &mut hits);
    println!("upper-left region holds: {hits:?}");

    // Removal by payload; the rect-taking form descends instead of scanning.
    let removed = tree.remove_at("door", Rect::from_center_size(Point::new(4.0, -4.0), (1.0, 2.0)));
    println!("removed the door: {removed}, {} entries left", tree.count());
}
