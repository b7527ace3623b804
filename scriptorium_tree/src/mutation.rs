// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural and geometric edits.
//!
//! Every edit either applies completely or returns an error without touching the tree.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Rect, Vec2};
use tracing::debug;

use crate::error::{InvalidOperation, Result};
use crate::geometry::{offset_bbox, project_offset};
use crate::node::{Element, Node};
use crate::policy::EditPolicy;
use crate::store::TreeStore;
use crate::types::{NodeId, NodeKind};

/// Attribute changes accepted by [`TreeStore::modify_node`].
///
/// `None` leaves the attribute untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeChanges {
    /// New tree-view expansion flag.
    pub is_expanded: Option<bool>,
    /// New text; only valid for words.
    pub text: Option<String>,
}

impl NodeChanges {
    /// Change only the expansion flag.
    pub fn expanded(is_expanded: bool) -> Self {
        Self {
            is_expanded: Some(is_expanded),
            ..Self::default()
        }
    }

    /// Change only the text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Returns true if nothing would change.
    pub fn is_empty(&self) -> bool {
        self.is_expanded.is_none() && self.text.is_none()
    }
}

impl TreeStore {
    /// Move a node's top-left to the absolute point `(x, y)`, optionally resizing it.
    ///
    /// The whole subtree is translated by the same delta, so descendants keep their place
    /// relative to the node. A missing `width` or `height` keeps the current one; negative
    /// sizes clamp to zero. Ancestors are not adjusted; follow up with
    /// [`shrink_wrap_ancestors`](Self::shrink_wrap_ancestors) when the edit policy asks for it.
    pub fn reposition_resize(
        &mut self,
        id: NodeId,
        x: f64,
        y: f64,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Result<()> {
        let node = self.get(id)?;
        if node.is_root() {
            return Err(InvalidOperation::RepositionRoot.into());
        }
        let old = node.bbox;
        let delta = Vec2::new(x - old.x0, y - old.y0);
        let width = width.unwrap_or(old.width()).max(0.0);
        let height = height.unwrap_or(old.height()).max(0.0);
        let descendants: Vec<NodeId> = self
            .walk_subtree(node.children.iter().copied())
            .map(Node::id)
            .collect();

        self.node_mut(id).bbox = Rect::new(x, y, x + width, y + height);
        if delta != Vec2::ZERO {
            for descendant in descendants {
                let node = self.node_mut(descendant);
                node.bbox = offset_bbox(node.bbox, delta);
            }
        }
        self.refresh_offsets(id);
        debug!(
            node = %id,
            dx = delta.x,
            dy = delta.y,
            width,
            height,
            "repositioned node"
        );
        Ok(())
    }

    /// Move `id` (with its subtree) under `destination` at `index`.
    ///
    /// `None`, or an index past the end, appends. Boxes keep their absolute position; only the
    /// cached offsets change. The source parent collapses if the move empties it, then the
    /// policy decides whether ancestors are fitted and emptied ancestors pruned.
    ///
    /// Returns the ids removed by pruning.
    pub fn move_node(
        &mut self,
        id: NodeId,
        destination: NodeId,
        index: Option<usize>,
        policy: EditPolicy,
    ) -> Result<Vec<NodeId>> {
        let node = self.get(id)?;
        let Some(source) = node.parent else {
            return Err(InvalidOperation::MoveRoot.into());
        };
        let kind = node.kind();
        let dest = self.get(destination)?;
        if destination == id || self.is_ancestor(id, destination) {
            return Err(InvalidOperation::CyclicMove.into());
        }
        if !dest.can_host(kind) {
            return Err(InvalidOperation::IncompatibleParent {
                parent: dest.kind(),
                child: kind,
            }
            .into());
        }

        if source == destination {
            let siblings = &dest.children;
            let from = siblings.iter().position(|&c| c == id);
            let last = siblings.len() - 1;
            if from == Some(index.map_or(last, |i| i.min(last))) {
                return Ok(Vec::new());
            }
        }

        self.detach(id)?;
        let source_node = self.node_mut(source);
        if source_node.children.is_empty() {
            source_node.expanded = false;
        }
        let dest = self.node(destination);
        let offset = project_offset(self.node(id).bbox, dest);
        let len = dest.children.len();
        let at = index.map_or(len, |i| i.min(len));
        let moved = self.node_mut(id);
        moved.parent = Some(destination);
        moved.offset = offset;
        self.node_mut(destination).children.insert(at, id);

        if policy.auto_resize() {
            self.shrink_wrap_from(destination)?;
        }
        let pruned = self.settle_after_removal(source, policy, Some(destination))?;
        debug_assert_eq!(self.verify(false), Ok(()), "move left the tree malformed");
        debug!(
            node = %id,
            from = %source,
            to = %destination,
            index = at,
            pruned = pruned.len(),
            "moved node"
        );
        Ok(pruned)
    }

    /// Delete `id` and its subtree.
    ///
    /// With [`EditPolicy::AUTO_DELETE_EMPTY`], ancestors left without children are removed too,
    /// cascading up to (never including) the page root. Returns every removed id: the subtree
    /// in pre-order, then pruned ancestors nearest first.
    pub fn delete_node(&mut self, id: NodeId, policy: EditPolicy) -> Result<Vec<NodeId>> {
        if self.get(id)?.is_root() {
            return Err(InvalidOperation::DeleteRoot.into());
        }
        let (parent, _) = self.detach(id)?;
        let mut removed = self.remove_subtree(id);
        let subtree = removed.len();
        removed.extend(self.settle_after_removal(parent, policy, None)?);
        debug_assert_eq!(self.verify(false), Ok(()), "delete left the tree malformed");
        debug!(
            node = %id,
            subtree,
            pruned = removed.len() - subtree,
            "deleted node"
        );
        Ok(removed)
    }

    /// Update non-geometric attributes of a node.
    ///
    /// Setting text on anything but a word fails with [`InvalidOperation::TextOnNonWord`] and
    /// leaves the node unchanged, including its expansion flag.
    pub fn modify_node(&mut self, id: NodeId, changes: NodeChanges) -> Result<()> {
        let node = self.get_mut(id)?;
        if changes.text.is_some() && node.kind() != NodeKind::Word {
            return Err(InvalidOperation::TextOnNonWord.into());
        }
        if let Some(expanded) = changes.is_expanded {
            node.expanded = expanded;
        }
        if let (Some(text), Element::Word(word)) = (changes.text, &mut node.element) {
            word.text = text;
        }
        Ok(())
    }

    /// Apply the policy to `parent` after it lost a child.
    ///
    /// Prunes emptied non-root ancestors, then fits the nearest survivor unless it is `fitted`,
    /// which the caller has already handled. Returns the pruned ids.
    fn settle_after_removal(
        &mut self,
        parent: NodeId,
        policy: EditPolicy,
        fitted: Option<NodeId>,
    ) -> Result<Vec<NodeId>> {
        let mut pruned = Vec::new();
        let mut survivor = parent;
        if policy.auto_delete_empty() {
            while survivor != self.root() && self.get(survivor)?.children.is_empty() {
                let (up, _) = self.detach(survivor)?;
                pruned.extend(self.remove_subtree(survivor));
                survivor = up;
            }
        }
        if policy.auto_resize() && Some(survivor) != fitted {
            self.shrink_wrap_from(survivor)?;
        }
        Ok(pruned)
    }
}
