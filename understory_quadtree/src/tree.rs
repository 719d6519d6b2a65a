// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public quadtree facade: construction, world growth and contraction,
//! entry counting, query delegation.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

use kurbo::{Point, Rect, Vec2};

use crate::node::{Node, quadrant_signs};
use crate::types::HalfPlane;

/// Maximum consecutive world doublings per [`QuadTree::add`] before the
/// insertion is abandoned. Unreachable for finite rectangles; hitting it
/// means NaN or absurd input.
const GROW_ATTEMPT_LIMIT: usize = 20;

/// A dynamic, loose quadtree over 2D rectangles with opaque payloads.
///
/// Rectangles live in the deepest node whose loose rectangle fully contains
/// them. The tree grows outward when an insertion misses the current world,
/// splits nodes that become crowded, merges nodes that become sparse, and
/// collapses the root onto a quadrant when its content localises there.
///
/// Payloads are opaque; equality (`PartialEq`) decides which entry a removal
/// targets. Queries report payloads in unspecified order.
pub struct QuadTree<P: Copy + PartialEq + Debug> {
    root: Node<P>,
    /// The root never shrinks below this side length.
    initial_size: f64,
    min_size: f64,
    looseness: f64,
    count: usize,
}

impl<P: Copy + PartialEq + Debug> Debug for QuadTree<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("count", &self.count)
            .field("nodes", &self.node_count())
            .field("world", &self.max_rect())
            .finish_non_exhaustive()
    }
}

impl<P: Copy + PartialEq + Debug> QuadTree<P> {
    /// Create a tree whose world initially spans `initial_world_size` around
    /// `initial_world_centre`.
    ///
    /// `looseness` is clamped to `[1.0, 2.0]`; `1.0` gives disjoint children,
    /// larger values make siblings overlap. `min_node_size` bounds how small
    /// nodes may get (and with it the tree depth); it is clamped to
    /// `initial_world_size` with a warning if it exceeds it.
    pub fn new(
        initial_world_size: f64,
        initial_world_centre: Point,
        min_node_size: f64,
        looseness: f64,
    ) -> Self {
        let mut min_size = min_node_size;
        if min_size > initial_world_size {
            log::warn!(
                "minimum node size {min_size} exceeds the initial world size \
                 {initial_world_size}; clamping"
            );
            min_size = initial_world_size;
        }
        let looseness = looseness.clamp(1.0, 2.0);
        Self {
            root: Node::new(initial_world_size, min_size, looseness, initial_world_centre),
            initial_size: initial_world_size,
            min_size,
            looseness,
            count: 0,
        }
    }

    /// Insert `payload` occupying `rect`, doubling the world toward the
    /// rectangle as often as needed.
    ///
    /// If the rectangle still does not fit after 20 doublings, the insertion
    /// is abandoned with a diagnostic and the count is left unchanged.
    pub fn add(&mut self, payload: P, rect: Rect) {
        let mut grow_attempts = 0;
        while !self.root.add(payload, rect) {
            self.grow(rect.center() - self.root.center());
            grow_attempts += 1;
            if grow_attempts >= GROW_ATTEMPT_LIMIT {
                log::error!(
                    "abandoning add of {payload:?} after {GROW_ATTEMPT_LIMIT} grow attempts; \
                     {rect:?} is unreachable"
                );
                return;
            }
        }
        self.count += 1;
    }

    /// Remove the first entry whose payload equals `payload`, scanning the
    /// whole tree. Returns whether a removal occurred.
    ///
    /// Prefer [`QuadTree::remove_at`] when the entry's rectangle is known.
    pub fn remove(&mut self, payload: P) -> bool {
        let removed = self.root.remove(payload);
        if removed {
            self.count -= 1;
            self.shrink();
        }
        removed
    }

    /// Remove by payload equality, descending by containment of `rect`.
    /// O(log n) on average against the rect-less form's full scan.
    pub fn remove_at(&mut self, payload: P, rect: Rect) -> bool {
        let removed = self.root.remove_at(payload, rect);
        if removed {
            self.count -= 1;
            self.shrink();
        }
        removed
    }

    /// Whether any stored rectangle overlaps `rect`. Returns on the first
    /// hit.
    pub fn is_colliding(&self, rect: Rect) -> bool {
        self.root.is_colliding(rect)
    }

    /// Append every payload whose rectangle overlaps `rect`. Output order is
    /// unspecified.
    pub fn get_colliding(&self, rect: Rect, out: &mut Vec<P>) {
        self.root.get_colliding(rect, out);
    }

    /// Append every payload whose rectangle is not fully outside the plane
    /// set.
    ///
    /// Planes point inward: the region is the intersection of their positive
    /// half-spaces. The test is conservative (see
    /// [`HalfPlane`](crate::HalfPlane)).
    pub fn get_within_frustum(&self, planes: &[HalfPlane], out: &mut Vec<P>) {
        self.root.get_within_frustum(planes, out);
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The root's loose rectangle: the current world extent.
    pub fn max_rect(&self) -> Rect {
        self.root.rect()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Walk every node depth-first, reporting its loose rectangle and local
    /// entry count. The hook point for debug drawing and structural audits.
    pub fn visit_nodes(&self, f: &mut dyn FnMut(Rect, usize)) {
        self.root.visit(f);
    }

    // --- internals ---

    /// Double the world toward `direction`. A zero component resolves to
    /// `+1` on that axis.
    fn grow(&mut self, direction: Vec2) {
        let half = self.root.base_length() / 2.0;
        let new_length = self.root.base_length() * 2.0;
        let xdir = if direction.x >= 0.0 { 1.0 } else { -1.0 };
        let ydir = if direction.y >= 0.0 { 1.0 } else { -1.0 };
        let new_center = self.root.center() + Vec2::new(xdir * half, ydir * half);

        let old_root = mem::replace(
            &mut self.root,
            Node::new(new_length, self.min_size, self.looseness, new_center),
        );
        // An empty old root is simply dropped; the new root stands alone
        // until something is stored.
        if old_root.has_any_entries() {
            // The old root becomes the quadrant of the new root it sits in;
            // its three siblings start empty, each centred a quarter of the
            // new length out from the new centre.
            let old_length = old_root.base_length();
            let root_quadrant = self.root.best_fit_child(old_root.center());
            let mut slot = Some(old_root);
            let mut children = Vec::with_capacity(4);
            for q in 0..4 {
                if q == root_quadrant
                    && let Some(node) = slot.take()
                {
                    children.push(node);
                } else {
                    children.push(Node::new(
                        old_length,
                        self.min_size,
                        self.looseness,
                        new_center + quadrant_signs(q) * half,
                    ));
                }
            }
            self.root.set_children(children);
        }
    }

    /// One root-shrink attempt, applied after each successful removal.
    fn shrink(&mut self) {
        let placeholder = Node::new(self.initial_size, self.min_size, self.looseness, Point::ZERO);
        let root = mem::replace(&mut self.root, placeholder);
        self.root = root.shrink_if_possible(self.initial_size);
    }
}

#[cfg(test)]
impl<P: Copy + PartialEq + Debug> QuadTree<P> {
    fn root_base_length(&self) -> f64 {
        self.root.base_length()
    }

    /// Assert every structural invariant, including the count.
    fn audit(&self) {
        let seen = self.root.audit_subtree(self.min_size);
        assert_eq!(seen, self.count, "count must match reachable entries");
        assert!(
            self.root.base_length() >= self.initial_size,
            "root shrank below the initial size"
        );
    }
}
