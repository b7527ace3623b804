// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural self-check.

use alloc::vec;
use kurbo::Point;

use crate::error::Violation;
use crate::geometry::{bbox_contains, project_offset};
use crate::store::TreeStore;

impl TreeStore {
    /// Check the tree's structural invariants, reporting the first one broken.
    ///
    /// Every child list must name live, distinct nodes that point back at their parent and are
    /// of a kind the parent can host; every live node must be reachable from the root; cached
    /// offsets must match the projection from the boxes. With `check_containment`, every node
    /// must also lie within its parent's box, the page root excepted.
    ///
    /// Containment is opt-in because recognizer output is not guaranteed to nest, and
    /// repositioning a node does not adjust its ancestors until they are shrink-wrapped.
    pub fn verify(&self, check_containment: bool) -> Result<(), Violation> {
        let mut reached = vec![false; self.slot_count()];
        for node in self.walk() {
            reached[node.id().idx()] = true;

            let expected = match node.parent() {
                Some(parent) => {
                    let parent = self.get(parent).map_err(|_| Violation::ParentMismatch {
                        node: node.id(),
                        parent: Some(parent),
                    })?;
                    project_offset(node.bbox(), parent)
                }
                None => Point::ZERO,
            };
            if node.parent_relative_offset() != expected {
                return Err(Violation::OffsetDrift {
                    node: node.id(),
                    cached: node.parent_relative_offset(),
                    expected,
                });
            }

            for (i, &child) in node.children().iter().enumerate() {
                if node.children()[..i].contains(&child) {
                    return Err(Violation::DuplicateChild {
                        parent: node.id(),
                        child,
                    });
                }
                let Ok(child_node) = self.get(child) else {
                    return Err(Violation::DanglingChild {
                        parent: node.id(),
                        child,
                    });
                };
                if child_node.parent() != Some(node.id()) {
                    return Err(Violation::ParentMismatch {
                        node: child,
                        parent: child_node.parent(),
                    });
                }
                if !node.can_host(child_node.kind()) {
                    return Err(Violation::LeafWithChildren {
                        parent: node.id(),
                        child,
                    });
                }
                if check_containment
                    && !node.is_root()
                    && !bbox_contains(node.bbox(), child_node.bbox())
                {
                    return Err(Violation::NotContained {
                        node: child,
                        parent: node.id(),
                    });
                }
            }
        }

        if let Some(orphan) = self
            .live_ids()
            .find(|id| !reached.get(id.idx()).copied().unwrap_or(false))
        {
            return Err(Violation::OrphanedNode(orphan));
        }
        Ok(())
    }
}
