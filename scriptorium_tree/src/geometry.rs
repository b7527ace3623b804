// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box arithmetic and the shrink-wrap pass.

use alloc::vec::Vec;
use kurbo::{Point, Rect, Vec2};
use tracing::trace;

use crate::error::{Result, TreeError};
use crate::node::Node;
use crate::store::TreeStore;
use crate::types::NodeId;

/// Translate a box by `delta`, keeping its size.
pub fn offset_bbox(bbox: Rect, delta: Vec2) -> Rect {
    bbox + delta
}

/// The smallest box containing every box in `boxes`.
///
/// Fails with [`TreeError::EmptyBoundingBox`] if `boxes` is empty.
pub fn compute_bounding_box(boxes: impl IntoIterator<Item = Rect>) -> Result<Rect> {
    let mut it = boxes.into_iter();
    let first = it.next().ok_or(TreeError::EmptyBoundingBox)?;
    Ok(it.fold(first, |acc, r| acc.union(r)))
}

/// The parent-relative offset `node` should cache under `parent`.
///
/// Children of the page root (and nodes without a parent) keep their absolute top-left.
pub fn compute_relative_offset(node: &Node, parent: Option<&Node>) -> Point {
    match parent {
        Some(parent) => project_offset(node.bbox, parent),
        None => node.bbox.origin(),
    }
}

/// Returns true if `inner` lies within `outer`, edges included.
pub fn bbox_contains(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

pub(crate) fn project_offset(bbox: Rect, parent: &Node) -> Point {
    if parent.is_root() {
        bbox.origin()
    } else {
        Point::new(bbox.x0 - parent.bbox.x0, bbox.y0 - parent.bbox.y0)
    }
}

impl TreeStore {
    /// The offset a node should cache, recomputed from its box and its parent's.
    pub fn relative_offset_of(&self, id: NodeId) -> Result<Point> {
        let node = self.get(id)?;
        Ok(node
            .parent
            .map_or(Point::ZERO, |p| project_offset(node.bbox, self.node(p))))
    }

    /// Fit the ancestors of `start` tightly around their children.
    ///
    /// Walks upward from the parent of `start`, replacing each ancestor's box with the union of
    /// its children's boxes. The walk stops at the first ancestor whose box is already tight,
    /// or at the topmost ancestor below the page root; the root always keeps the canvas
    /// extent. Offsets of the stopping ancestor's whole subtree are then refreshed.
    pub fn shrink_wrap_ancestors(&mut self, start: NodeId) -> Result<()> {
        match self.get(start)?.parent {
            Some(parent) if parent != self.root() => self.shrink_wrap_from(parent),
            _ => Ok(()),
        }
    }

    /// Grow the box of `id` until it contains all of its children.
    ///
    /// The box only ever grows; childless nodes and the page root are left alone. Offsets of the
    /// subtree are refreshed when the box changes. Returns whether it changed.
    pub fn enclose_children(&mut self, id: NodeId) -> Result<bool> {
        let node = self.get(id)?;
        if node.is_root() {
            return Ok(false);
        }
        let Ok(children) = compute_bounding_box(node.children.iter().map(|&c| self.node(c).bbox))
        else {
            return Ok(false);
        };
        let grown = node.bbox.union(children);
        if grown == node.bbox {
            return Ok(false);
        }
        self.node_mut(id).bbox = grown;
        self.refresh_offsets(id);
        trace!(node = %id, "grew box around children");
        Ok(true)
    }

    /// Shrink-wrap `first` and then its ancestors, as in
    /// [`shrink_wrap_ancestors`](Self::shrink_wrap_ancestors).
    ///
    /// A childless node keeps its box and ends the walk.
    pub(crate) fn shrink_wrap_from(&mut self, first: NodeId) -> Result<()> {
        let root = self.root();
        let mut current = first;
        let stop = loop {
            let node = self.get(current)?;
            let Some(parent) = node.parent else {
                return Ok(());
            };
            let Ok(fitted) = compute_bounding_box(node.children.iter().map(|&c| self.node(c).bbox))
            else {
                trace!(node = %current, "shrink-wrap stopped at a childless node");
                break current;
            };
            if fitted == node.bbox {
                trace!(node = %current, "shrink-wrap stopped at a tight box");
                break current;
            }
            self.node_mut(current).bbox = fitted;
            if parent == root {
                break current;
            }
            current = parent;
        };
        self.refresh_offsets(stop);
        Ok(())
    }

    /// Recompute the cached offsets of `top` and all its descendants.
    pub(crate) fn refresh_offsets(&mut self, top: NodeId) {
        let subtree: Vec<NodeId> = self.walk_subtree([top]).map(Node::id).collect();
        for id in subtree {
            let node = self.node(id);
            let offset = match node.parent {
                Some(parent) => project_offset(node.bbox, self.node(parent)),
                None => Point::ZERO,
            };
            self.node_mut(id).offset = offset;
        }
    }
}
