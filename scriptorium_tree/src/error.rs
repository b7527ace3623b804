// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for tree lookups and edits.

use crate::types::{NodeId, NodeKind};

/// Result type for tree operations.
pub type Result<T, E = TreeError> = core::result::Result<T, E>;

/// Errors returned by [`TreeStore`](crate::TreeStore) lookups and edits.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id is not in the arena.
    ///
    /// Ids come from child lists or earlier return values, so this means the caller's view of
    /// the tree has fallen out of sync with the tree itself.
    #[error("node {0} not found")]
    NotFound(NodeId),
    /// The request is structurally forbidden.
    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] InvalidOperation),
    /// A bounding box was requested for an empty set of boxes.
    #[error("cannot compute the bounding box of zero boxes")]
    EmptyBoundingBox,
}

/// Structurally forbidden edit requests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidOperation {
    /// The page root cannot be deleted.
    #[error("the page root cannot be deleted")]
    DeleteRoot,
    /// The page root cannot be moved.
    #[error("the page root cannot be moved")]
    MoveRoot,
    /// The page root always spans the page canvas.
    #[error("the page root cannot be repositioned or resized")]
    RepositionRoot,
    /// The destination cannot host a node of this kind.
    #[error("a {parent} cannot host a {child}")]
    IncompatibleParent {
        /// Kind of the requested destination.
        parent: NodeKind,
        /// Kind of the node being moved.
        child: NodeKind,
    },
    /// The destination lies inside the moved node's own subtree.
    #[error("a node cannot be moved into its own subtree")]
    CyclicMove,
    /// Only word nodes carry editable text.
    #[error("only words carry editable text")]
    TextOnNonWord,
}

/// First broken invariant reported by [`TreeStore::verify`](crate::TreeStore::verify).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Violation {
    /// A node's parent is missing or does not list it.
    #[error("node {node} is not listed by its parent {parent:?}")]
    ParentMismatch {
        /// The child.
        node: NodeId,
        /// Its recorded parent.
        parent: Option<NodeId>,
    },
    /// A child list names the same node more than once.
    #[error("node {child} appears more than once under {parent}")]
    DuplicateChild {
        /// The parent.
        parent: NodeId,
        /// The repeated child.
        child: NodeId,
    },
    /// A child list names a node that is not in the arena.
    #[error("node {parent} lists missing child {child}")]
    DanglingChild {
        /// The parent.
        parent: NodeId,
        /// The missing child.
        child: NodeId,
    },
    /// A live node cannot be reached from the root.
    #[error("node {0} is not reachable from the root")]
    OrphanedNode(NodeId),
    /// A leaf kind has children, or a parent cannot host one of its children.
    #[error("node {parent} cannot host child {child}")]
    LeafWithChildren {
        /// The parent.
        parent: NodeId,
        /// The offending child.
        child: NodeId,
    },
    /// The cached offset disagrees with the projection from the boxes.
    #[error("node {node} caches offset {cached:?} but its boxes give {expected:?}")]
    OffsetDrift {
        /// The node.
        node: NodeId,
        /// Stored offset.
        cached: kurbo::Point,
        /// Offset recomputed from the boxes.
        expected: kurbo::Point,
    },
    /// A node's box leaks outside its (non-root) parent's box.
    #[error("node {node} is not contained in its parent {parent}")]
    NotContained {
        /// The node.
        node: NodeId,
        /// Its parent.
        parent: NodeId,
    },
}
