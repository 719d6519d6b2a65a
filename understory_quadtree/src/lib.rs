// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadtree --heading-base-level=0

//! Understory Quadtree: a dynamic, loose quadtree for 2D AABBs with payloads.
//!
//! Understory Quadtree is a reusable building block for broad-phase collision
//! checks, visibility sets, and picking in editors, canvases, and game worlds.
//!
//! - Associate opaque payloads with axis-aligned rectangles.
//! - Query by rectangle overlap or by containment in a convex region
//!   described as a set of half-planes (frustum culling).
//! - The tree reshapes itself as contents change: it grows outward when an
//!   insertion misses the current world, splits crowded nodes, merges sparse
//!   ones, and collapses the root back down when content localises into one
//!   quadrant.
//!
//! It is Kurbo-native ([`kurbo::Rect`] / [`kurbo::Point`]) and does not
//! prescribe what a payload is; anything `Copy + PartialEq + Debug` works,
//! typically a small id into caller-owned storage.
//!
//! ## Looseness
//!
//! Every node's rectangle is scaled by a *looseness* factor in `[1.0, 2.0]`.
//! At `1.0` children tile their parent exactly; larger values make siblings
//! overlap, which lets rectangles sink deeper before they straddle a
//! boundary and have to be held high in the tree. `1.25` is a reasonable
//! default. Entries are stored in the deepest node whose loose rectangle
//! fully contains them.
//!
//! ## Growing and shrinking
//!
//! The world is elastic. Inserting outside the current extent doubles the
//! root toward the new entry until it fits; removing entries lets the root
//! collapse onto a single occupied quadrant, never below the size it was
//! built with. Neither operation moves entries between nodes wholesale: the
//! old root simply becomes one child of the new, or one child becomes the
//! new root.
//!
//! ## API overview
//!
//! - [`QuadTree`]: the tree. [`QuadTree::add`], [`QuadTree::remove`] /
//!   [`QuadTree::remove_at`], [`QuadTree::is_colliding`],
//!   [`QuadTree::get_colliding`], [`QuadTree::get_within_frustum`],
//!   [`QuadTree::count`], [`QuadTree::max_rect`].
//! - [`HalfPlane`]: one inward-facing half-space of a convex query region.
//! - [`QuadTree::visit_nodes`]: node-by-node traversal for debug drawing and
//!   structural introspection.
//!
//! Removal identifies entries by payload equality. Payloads need not be
//! unique, but removal assumes at most one occurrence and takes the first
//! match it encounters, in unspecified traversal order.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_quadtree::QuadTree;
//!
//! // A 10×10 world around the origin; nodes no smaller than 1, looseness 1.25.
//! let mut tree = QuadTree::new(10.0, Point::ZERO, 1.0, 1.25);
//!
//! tree.add("a", Rect::from_center_size(Point::new(1.0, 1.0), (1.0, 1.0)));
//! tree.add("b", Rect::from_center_size(Point::new(-3.0, 2.0), (1.0, 1.0)));
//!
//! assert!(tree.is_colliding(Rect::from_center_size(Point::new(1.0, 1.0), (0.5, 0.5))));
//!
//! let mut hits = Vec::new();
//! tree.get_colliding(Rect::new(0.0, 0.0, 2.0, 2.0), &mut hits);
//! assert_eq!(hits, ["a"]);
//!
//! // Inserting far outside the world grows it.
//! tree.add("far", Rect::from_center_size(Point::new(200.0, 0.0), (1.0, 1.0)));
//! assert!(tree.max_rect().contains(Point::new(200.0, 0.0)));
//!
//! assert!(tree.remove("far"));
//! assert_eq!(tree.count(), 2);
//! ```
//!
//! ## Frustum queries
//!
//! ```rust
//! use kurbo::{Point, Rect, Vec2};
//! use understory_quadtree::{HalfPlane, QuadTree};
//!
//! let mut tree = QuadTree::new(10.0, Point::ZERO, 1.0, 1.25);
//! tree.add(1_u32, Rect::from_center_size(Point::new(3.0, 3.0), (1.0, 1.0)));
//! tree.add(2_u32, Rect::from_center_size(Point::new(-3.0, -3.0), (1.0, 1.0)));
//!
//! // Everything right of x = 0.
//! let planes = [HalfPlane::new(Vec2::new(1.0, 0.0), 0.0)];
//! let mut visible = Vec::new();
//! tree.get_within_frustum(&planes, &mut visible);
//! assert_eq!(visible, [1]);
//! ```
//!
//! ## Diagnostics
//!
//! Misuse that the tree can recover from (a minimum node size larger than
//! the world, an insertion that cannot be reached by growing) is reported
//! through the [`log`] facade rather than panicking; install any logger to
//! see it.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod node;
mod tree;
mod types;

pub use tree::QuadTree;
pub use types::HalfPlane;
