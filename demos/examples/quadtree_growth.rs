// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World growth and contraction.
//!
//! Insert entries far outside the initial world, watch the root double
//! toward them, then remove them and watch the root collapse back.
//!
//! Run:
//! - `cargo run -p understory_quadtree_demos --example quadtree_growth`

use kurbo::{Point, Rect};
use understory_quadtree::QuadTree;

fn print_structure<P: Copy + PartialEq + std::fmt::Debug>(tree: &QuadTree<P>) {
    let mut lines = Vec::new();
    tree.visit_nodes(&mut |rect, entries| {
        lines.push(format!(
            "  node {:>7.1}×{:<7.1} at ({:>6.1}, {:>6.1}) holding {entries}",
            rect.width(),
            rect.height(),
            rect.center().x,
            rect.center().y,
        ));
    });
    println!("{} nodes:", lines.len());
    for line in lines {
        println!("{line}");
    }
}

fn main() {
    env_logger::init();

    let mut tree = QuadTree::new(10.0, Point::ZERO, 1.0, 1.25);
    tree.add(0_u32, Rect::from_center_size(Point::new(1.0, 1.0), (1.0, 1.0)));
    println!("initial world: {:?}", tree.max_rect());

    // Each of these misses the current world and forces doublings.
    for (i, d) in (1u32..).zip([40.0, 90.0, 200.0]) {
        tree.add(i, Rect::from_center_size(Point::new(d, d), (2.0, 2.0)));
        println!("after add at ({d}, {d}): world {:?}", tree.max_rect());
    }
    print_structure(&tree);

    // Removing the far entries lets the root shrink toward the remaining
    // content, one step per removal, never below the initial size.
    for i in (1..=3u32).rev() {
        tree.remove(i);
        println!("after removal {i}: world {:?}", tree.max_rect());
    }
    print_structure(&tree);
}
