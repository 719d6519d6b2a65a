// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive quadtree node: placement, splitting, merging, shrinking, queries.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::{Point, Rect, Size, Vec2};

use crate::types::{HalfPlane, rect_outside_planes};

/// Entries a leaf tolerates before it splits.
///
/// Leaves whose children would fall below the minimum node size are exempt
/// and may hold arbitrarily many entries.
pub(crate) const CAPACITY: usize = 8;

/// A payload paired with the rectangle it occupies.
#[derive(Clone, Debug)]
pub(crate) struct Entry<P> {
    pub(crate) payload: P,
    pub(crate) rect: Rect,
}

/// X/Y direction signs for a quadrant index.
///
/// 0 top-left, 1 top-right, 2 bottom-left, 3 bottom-right ("top" is +y).
/// The same numbering is used everywhere: splitting, growing, shrinking,
/// and best-fit descent.
#[inline]
pub(crate) fn quadrant_signs(quadrant: usize) -> Vec2 {
    let x = if quadrant % 2 == 0 { -1.0 } else { 1.0 };
    let y = if quadrant < 2 { 1.0 } else { -1.0 };
    Vec2::new(x, y)
}

/// A single subtree of the quadtree.
///
/// A node stores the entries that fit in its loose rectangle but in none of
/// its children's, and owns either no children or exactly four, in fixed
/// quadrant order.
pub(crate) struct Node<P> {
    /// Side length at looseness 1. Children halve it.
    base_length: f64,
    /// Actual side length of `rect`: `looseness * base_length`.
    adj_length: f64,
    min_size: f64,
    looseness: f64,
    center: Point,
    /// The loose bound. Everything stored in this subtree fits inside it.
    rect: Rect,
    /// Loose rectangles of the four potential children, precomputed so the
    /// hot paths never rebuild them.
    child_rects: [Rect; 4],
    entries: Vec<Entry<P>>,
    children: Option<Box<[Node<P>; 4]>>,
}

impl<P: Copy + PartialEq + Debug> Node<P> {
    pub(crate) fn new(base_length: f64, min_size: f64, looseness: f64, center: Point) -> Self {
        let mut node = Self {
            base_length: 0.0,
            adj_length: 0.0,
            min_size,
            looseness,
            center,
            rect: Rect::ZERO,
            child_rects: [Rect::ZERO; 4],
            entries: Vec::new(),
            children: None,
        };
        node.set_values(base_length, min_size, looseness, center);
        node
    }

    /// Reset geometry and recompute the derived fields (`adj_length`,
    /// `rect`, `child_rects`). Also used when the root shrinks onto one of
    /// its quadrants in place.
    fn set_values(&mut self, base_length: f64, min_size: f64, looseness: f64, center: Point) {
        self.base_length = base_length;
        self.min_size = min_size;
        self.looseness = looseness;
        self.center = center;
        self.adj_length = looseness * base_length;
        self.rect = Rect::from_center_size(center, Size::new(self.adj_length, self.adj_length));
        let quarter = base_length / 4.0;
        let child_side = looseness * (base_length / 2.0);
        for q in 0..4 {
            self.child_rects[q] = Rect::from_center_size(
                center + quadrant_signs(q) * quarter,
                Size::new(child_side, child_side),
            );
        }
    }

    pub(crate) fn base_length(&self) -> f64 {
        self.base_length
    }

    pub(crate) fn center(&self) -> Point {
        self.center
    }

    /// The loose rectangle bounding everything stored in this subtree.
    pub(crate) fn rect(&self) -> Rect {
        self.rect
    }

    /// Attempt to place an entry in this subtree. Returns `false` iff the
    /// rectangle does not fit entirely inside this node's loose rectangle.
    pub(crate) fn add(&mut self, payload: P, rect: Rect) -> bool {
        if !self.rect.contains_rect(rect) {
            return false;
        }
        self.sub_add(Entry { payload, rect });
        true
    }

    /// Place an entry known to fit here: descend into the best-fit child
    /// while the child's loose rectangle fully contains it, splitting
    /// crowded leaves along the way.
    fn sub_add(&mut self, entry: Entry<P>) {
        if self.children.is_none() {
            if self.entries.len() < CAPACITY || self.base_length / 2.0 < self.min_size {
                self.entries.push(entry);
                return;
            }
            self.split();
            // Re-home entries that now fit entirely inside a child. Anything
            // straddling a quadrant boundary stays here.
            let mut i = self.entries.len();
            while i > 0 {
                i -= 1;
                let best = self.best_fit_child(self.entries[i].rect.center());
                if self.child_rects[best].contains_rect(self.entries[i].rect)
                    && let Some(children) = self.children.as_mut()
                {
                    let moved = self.entries.swap_remove(i);
                    children[best].sub_add(moved);
                }
            }
        }
        let best = self.best_fit_child(entry.rect.center());
        if self.child_rects[best].contains_rect(entry.rect)
            && let Some(children) = self.children.as_mut()
        {
            children[best].sub_add(entry);
        } else {
            self.entries.push(entry);
        }
    }

    /// Create four empty children a quarter offset away, each with half the
    /// base length.
    fn split(&mut self) {
        let quarter = self.base_length / 4.0;
        let half = self.base_length / 2.0;
        let (min_size, looseness, center) = (self.min_size, self.looseness, self.center);
        let make = |q: usize| {
            Node::new(half, min_size, looseness, center + quadrant_signs(q) * quarter)
        };
        self.children = Some(Box::new([make(0), make(1), make(2), make(3)]));
    }

    /// Install a full set of four children, e.g. when the world grows and
    /// the old root becomes one quadrant of the new root. Anything other
    /// than exactly four children is reported and ignored.
    pub(crate) fn set_children(&mut self, children: Vec<Node<P>>) {
        match <Box<[Node<P>; 4]>>::try_from(children.into_boxed_slice()) {
            Ok(four) => self.children = Some(four),
            Err(other) => {
                log::error!("set_children expects exactly 4 children, got {}", other.len());
            }
        }
    }

    /// Remove the first entry whose payload equals `payload`, searching the
    /// whole subtree. Merges children back into this node when the subtree
    /// has become sparse enough.
    pub(crate) fn remove(&mut self, payload: P) -> bool {
        let mut removed = false;
        if let Some(i) = self.entries.iter().position(|e| e.payload == payload) {
            self.entries.swap_remove(i);
            removed = true;
        }
        if !removed && let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.remove(payload) {
                    removed = true;
                    break;
                }
            }
        }
        if removed && self.children.is_some() && self.should_merge() {
            self.merge();
        }
        removed
    }

    /// Remove by payload equality, descending by containment. Returns
    /// `false` without searching when `rect` does not fit this node.
    pub(crate) fn remove_at(&mut self, payload: P, rect: Rect) -> bool {
        if !self.rect.contains_rect(rect) {
            return false;
        }
        self.sub_remove(payload, rect)
    }

    fn sub_remove(&mut self, payload: P, rect: Rect) -> bool {
        let mut removed = false;
        if let Some(i) = self.entries.iter().position(|e| e.payload == payload) {
            self.entries.swap_remove(i);
            removed = true;
        }
        if !removed && self.children.is_some() {
            // Containment means at most one child can hold the entry.
            let best = self.best_fit_child(rect.center());
            if let Some(children) = self.children.as_mut() {
                removed = children[best].sub_remove(payload, rect);
            }
        }
        if removed && self.children.is_some() && self.should_merge() {
            self.merge();
        }
        removed
    }

    /// A merge is allowed only when this node plus its direct children hold
    /// no more than [`CAPACITY`] entries and no child has children of its
    /// own. A grandchild proves the subtree was too populous to merge when
    /// the grandchild was created.
    fn should_merge(&self) -> bool {
        let mut total = self.entries.len();
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                if child.children.is_some() {
                    return false;
                }
                total += child.entries.len();
            }
        }
        total <= CAPACITY
    }

    /// Pull every direct child's entries up into this node and drop the
    /// children. [`Node::should_merge`] guarantees the children are leaves.
    fn merge(&mut self) {
        if let Some(mut children) = self.children.take() {
            for child in children.iter_mut() {
                debug_assert!(child.children.is_none(), "merge requires leaf children");
                self.entries.append(&mut child.entries);
            }
        }
    }

    pub(crate) fn is_colliding(&self, query: Rect) -> bool {
        if !self.rect.overlaps(query) {
            return false;
        }
        if self.entries.iter().any(|e| e.rect.overlaps(query)) {
            return true;
        }
        if let Some(children) = self.children.as_ref() {
            return children.iter().any(|c| c.is_colliding(query));
        }
        false
    }

    pub(crate) fn get_colliding(&self, query: Rect, out: &mut Vec<P>) {
        if !self.rect.overlaps(query) {
            return;
        }
        for e in &self.entries {
            if e.rect.overlaps(query) {
                out.push(e.payload);
            }
        }
        if let Some(children) = self.children.as_ref() {
            for c in children.iter() {
                c.get_colliding(query, out);
            }
        }
    }

    /// Append every payload whose rectangle is not fully outside the plane
    /// set, pruning subtrees whose loose rectangle already is.
    pub(crate) fn get_within_frustum(&self, planes: &[HalfPlane], out: &mut Vec<P>) {
        if rect_outside_planes(&self.rect, planes) {
            return;
        }
        for e in &self.entries {
            if !rect_outside_planes(&e.rect, planes) {
                out.push(e.payload);
            }
        }
        if let Some(children) = self.children.as_ref() {
            for c in children.iter() {
                c.get_within_frustum(planes, out);
            }
        }
    }

    /// The quadrant whose child would hold `point`. Ties on the centre go
    /// to the lower-numbered quadrant.
    pub(crate) fn best_fit_child(&self, point: Point) -> usize {
        (if point.x <= self.center.x { 0 } else { 1 })
            + (if point.y >= self.center.y { 0 } else { 2 })
    }

    /// Whether this subtree stores anything, here or below.
    pub(crate) fn has_any_entries(&self) -> bool {
        if !self.entries.is_empty() {
            return true;
        }
        if let Some(children) = self.children.as_ref() {
            return children.iter().any(Node::has_any_entries);
        }
        false
    }

    /// Collapse this node onto a single quadrant when everything it holds
    /// is localised there, returning the replacement node (possibly `self`
    /// unchanged). Never shrinks below `min_length`.
    ///
    /// Applied once per removal by the tree; it does not iterate to a fixed
    /// point.
    pub(crate) fn shrink_if_possible(mut self, min_length: f64) -> Node<P> {
        if self.base_length < 2.0 * min_length {
            return self;
        }
        if self.entries.is_empty() && self.children.is_none() {
            return self;
        }

        // Every local entry must agree on one quadrant and fit entirely
        // inside that quadrant's loose rectangle.
        let mut target: Option<usize> = None;
        for i in 0..self.entries.len() {
            let rect = self.entries[i].rect;
            let best = self.best_fit_child(rect.center());
            if matches!(target, Some(q) if q != best)
                || !self.child_rects[best].contains_rect(rect)
            {
                return self;
            }
            target = Some(best);
        }

        // At most one child may hold content, and it must be the same
        // quadrant the local entries picked.
        let mut refuse = false;
        if let Some(children) = self.children.as_ref() {
            let mut occupied: Option<usize> = None;
            for (q, child) in children.iter().enumerate() {
                if !child.has_any_entries() {
                    continue;
                }
                if occupied.is_some() || matches!(target, Some(t) if t != q) {
                    refuse = true;
                    break;
                }
                occupied = Some(q);
            }
            if occupied.is_some() {
                target = occupied;
            }
        }
        if refuse {
            return self;
        }
        let Some(q) = target else {
            // Children exist but the whole subtree is empty.
            return self;
        };

        match self.children.take() {
            None => {
                // Leaf: halve in place, recentring onto the target quadrant.
                let center = self.child_rects[q].center();
                self.set_values(self.base_length / 2.0, self.min_size, self.looseness, center);
                self
            }
            Some(children) => {
                debug_assert!(
                    self.entries.is_empty(),
                    "entries held above children cannot fit a child rect"
                );
                let [c0, c1, c2, c3] = *children;
                match q {
                    0 => c0,
                    1 => c1,
                    2 => c2,
                    _ => c3,
                }
            }
        }
    }

    /// Walk this subtree depth-first, reporting each node's loose rectangle
    /// and local entry count.
    pub(crate) fn visit(&self, f: &mut dyn FnMut(Rect, usize)) {
        f(self.rect, self.entries.len());
        if let Some(children) = self.children.as_ref() {
            for c in children.iter() {
                c.visit(f);
            }
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |cs| cs.iter().map(Node::node_count).sum())
    }
}

#[cfg(test)]
impl<P: Copy + PartialEq + Debug> Node<P> {
    /// Assert the structural invariants of this subtree and return the
    /// number of entries it stores.
    pub(crate) fn audit_subtree(&self, min_size: f64) -> usize {
        let mut seen = 0;
        for e in &self.entries {
            assert!(
                self.rect.contains_rect(e.rect),
                "entry {:?} escapes its node's loose rect",
                e.payload
            );
            if self.children.is_some() {
                for cr in &self.child_rects {
                    assert!(
                        !cr.contains_rect(e.rect),
                        "entry {:?} at a non-leaf fits a child rect",
                        e.payload
                    );
                }
            }
            seen += 1;
        }
        match self.children.as_ref() {
            None => {
                assert!(
                    self.entries.len() <= CAPACITY || self.base_length / 2.0 < min_size,
                    "leaf over capacity without the size-floor exemption"
                );
            }
            Some(children) => {
                for (q, child) in children.iter().enumerate() {
                    assert!(
                        rects_close(child.rect, self.child_rects[q]),
                        "child {q} does not occupy its quadrant"
                    );
                    assert!(
                        (child.base_length - self.base_length / 2.0).abs() < 1e-9,
                        "child base length must halve"
                    );
                    seen += child.audit_subtree(min_size);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
fn rects_close(a: Rect, b: Rect) -> bool {
    let eps = 1e-9 * (1.0 + a.width().abs() + a.x0.abs() + a.y0.abs());
    (a.x0 - b.x0).abs() < eps
        && (a.y0 - b.y0).abs() < eps
        && (a.x1 - b.x1).abs() < eps
        && (a.y1 - b.y1).abs() < eps
}
