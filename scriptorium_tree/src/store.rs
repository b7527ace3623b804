// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node arena: construction from recognition results, lookups, and traversal.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Rect;
use tracing::debug;

use crate::error::{Result, TreeError};
use crate::geometry::project_offset;
use crate::node::{BlockData, Element, Node, ParagraphData};
use crate::source::{SourceBlock, SourcePage, SourceRegion};
use crate::types::{NodeId, NodeKind};

/// The arena holding one document's OCR tree.
///
/// Nodes live in slots indexed by [`NodeId`]. Children are stored as ordered id lists, so the
/// structure never holds references between nodes. Removed slots are left empty and never
/// reused, which keeps every id unique for the lifetime of the store.
///
/// All geometry is absolute page space ([`Node::bbox`]); the parent-relative offset of each node
/// is a cached projection kept current by every edit.
///
/// ## Example
///
/// ```rust
/// use kurbo::Rect;
/// use scriptorium_tree::{SourceBlock, SourcePage, SourceRegion, TreeStore};
///
/// let mut page = SourcePage::new(Rect::new(0.0, 0.0, 800.0, 600.0));
/// page.regions.push(SourceRegion::Block(SourceBlock {
///     bbox: Rect::new(40.0, 40.0, 400.0, 120.0),
///     ..SourceBlock::default()
/// }));
///
/// let (root, tree) = TreeStore::build_from_page(&page);
/// assert_eq!(tree.root(), root);
/// assert_eq!(tree.page_bounds(), Rect::new(0.0, 0.0, 800.0, 600.0));
/// assert_eq!(tree.children_of(root).len(), 1);
/// ```
#[derive(Clone, PartialEq)]
pub struct TreeStore {
    /// slots; `None` once removed
    nodes: Vec<Option<Node>>,
    root: NodeId,
    live: usize,
}

impl core::fmt::Debug for TreeStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeStore")
            .field("root", &self.root)
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.live)
            .finish_non_exhaustive()
    }
}

impl TreeStore {
    /// Build a tree from a recognized page.
    ///
    /// Every element gets a fresh id, its bbox from the source geometry, and its
    /// parent-relative offset by projection. Graphics, and blocks whose
    /// [`BlockType`](crate::BlockType) does not host text, get no children even if the source
    /// nested paragraphs under them.
    pub fn build_from_page(page: &SourcePage) -> (NodeId, Self) {
        let mut store = Self {
            nodes: Vec::new(),
            root: NodeId::new(0),
            live: 0,
        };
        let root = store.push(None, page.bbox, Element::Page(page.data.clone()), &page.id);
        store.root = root;
        for region in &page.regions {
            store.push_region(region);
        }
        debug!(
            root = %root,
            nodes = store.live,
            "built tree from page"
        );
        (root, store)
    }

    /// Graft a (region) recognition result under this tree's root.
    ///
    /// The page's top-level regions become new children of the existing root, appended after
    /// the current ones, with fresh ids. The source page's own metadata is ignored. Returns
    /// the ids of the grafted top-level nodes.
    pub fn graft_page(&mut self, page: &SourcePage) -> Vec<NodeId> {
        let grafted: Vec<NodeId> = page
            .regions
            .iter()
            .map(|region| self.push_region(region))
            .collect();
        debug!(
            root = %self.root,
            grafted = grafted.len(),
            nodes = self.live,
            "grafted recognition into tree"
        );
        grafted
    }

    /// The page root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The page canvas extent (the root's bbox).
    pub fn page_bounds(&self) -> Rect {
        self.node(self.root).bbox
    }

    /// Number of live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.live
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// Live ids in allocation order.
    pub(crate) fn live_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().flatten().map(Node::id)
    }

    /// Returns true if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .map(Option::is_some)
            .unwrap_or(false)
    }

    /// Look up a node.
    ///
    /// Fails with [`TreeError::NotFound`] if `id` is not live.
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(Option::as_ref)
            .ok_or(TreeError::NotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .ok_or(TreeError::NotFound(id))
    }

    /// Access a node whose id came from a live link; panics if it is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Mutable access to a node whose id came from a live link; panics if it is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    /// Returns the parent of a node, or `None` for the root or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).ok().and_then(|node| node.parent)
    }

    /// Get the children of a node, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children()).unwrap_or(&[])
    }

    /// Iterate the ancestors of `id`, nearest first, ending with the root.
    ///
    /// The node itself is not included. Yields nothing for the root or stale ids.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            store: self,
            next: self.parent_of(id),
        }
    }

    /// Returns true if `ancestor` is a proper ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Pre-order traversal of `roots` and all their descendants.
    ///
    /// The iterator is lazy, borrows the store, and can be cloned to restart from the same
    /// point. Stale ids among `roots` are skipped.
    pub fn walk_subtree(&self, roots: impl IntoIterator<Item = NodeId>) -> Walk<'_> {
        let mut stack: Vec<NodeId> = roots.into_iter().collect();
        stack.reverse();
        Walk { store: self, stack }
    }

    /// Pre-order traversal of the whole tree, starting at the root.
    pub fn walk(&self) -> Walk<'_> {
        self.walk_subtree([self.root])
    }

    /// The text under a node.
    ///
    /// Words give their own text, lines join their words with spaces, and every larger element
    /// joins its non-empty children with newlines.
    pub fn text_of(&self, id: NodeId) -> Result<String> {
        let node = self.get(id)?;
        let separator = match node.kind() {
            NodeKind::Word => return Ok(node.text().map(String::from).unwrap_or_default()),
            NodeKind::Graphic => return Ok(String::new()),
            NodeKind::Line => " ",
            _ => "\n",
        };
        let mut out = String::new();
        for &child in &node.children {
            let text = self.text_of(child)?;
            if text.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push_str(separator);
            }
            out.push_str(&text);
        }
        Ok(out)
    }

    /// Detach `id` from its parent's child list.
    ///
    /// Returns the former parent and the index the node occupied.
    pub(crate) fn detach(&mut self, id: NodeId) -> Result<(NodeId, usize)> {
        let parent = self.get(id)?.parent.ok_or(TreeError::NotFound(id))?;
        let parent_node = self.get_mut(parent)?;
        let index = parent_node
            .children
            .iter()
            .position(|&c| c == id)
            .ok_or(TreeError::NotFound(id))?;
        parent_node.children.remove(index);
        self.node_mut(id).parent = None;
        Ok((parent, index))
    }

    /// Free `id` and its whole subtree. The node must already be detached.
    ///
    /// Returns the freed ids in pre-order.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        let removed: Vec<NodeId> = self.walk_subtree([id]).map(Node::id).collect();
        for &gone in &removed {
            self.nodes[gone.idx()] = None;
        }
        self.live -= removed.len();
        removed
    }

    fn push_region(&mut self, region: &SourceRegion) -> NodeId {
        let root = Some(self.root);
        match region {
            SourceRegion::Graphic(graphic) => {
                self.push(root, graphic.bbox, Element::Graphic, &graphic.id)
            }
            SourceRegion::Block(block) => self.push_block(block),
        }
    }

    fn push_block(&mut self, block: &SourceBlock) -> NodeId {
        let block_id = self.push(
            Some(self.root),
            block.bbox,
            Element::Block(BlockData {
                block_type: block.block_type,
            }),
            &block.id,
        );
        if !block.block_type.hosts_text() {
            return block_id;
        }
        for paragraph in &block.paragraphs {
            let paragraph_id = self.push(
                Some(block_id),
                paragraph.bbox,
                Element::Paragraph(ParagraphData {
                    direction: paragraph.direction,
                }),
                &paragraph.id,
            );
            for line in &paragraph.lines {
                let line_id = self.push(
                    Some(paragraph_id),
                    line.bbox,
                    Element::Line(line.data.clone()),
                    &line.id,
                );
                for word in &line.words {
                    self.push(
                        Some(line_id),
                        word.bbox,
                        Element::Word(word.data.clone()),
                        &word.id,
                    );
                }
            }
        }
        block_id
    }

    /// Allocate a node, appending it to `parent`'s children.
    fn push(
        &mut self,
        parent: Option<NodeId>,
        bbox: Rect,
        element: Element,
        source_id: &Option<String>,
    ) -> NodeId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(self.nodes.len() as u32);
        let mut node = Node::new(id, bbox, element);
        node.source_id.clone_from(source_id);
        if let Some(parent) = parent {
            node.offset = project_offset(bbox, self.node(parent));
            node.parent = Some(parent);
        }
        self.nodes.push(Some(node));
        if let Some(parent) = parent {
            self.node_mut(parent).children.push(id);
        }
        self.live += 1;
        id
    }
}

/// Pre-order iterator returned by [`TreeStore::walk_subtree`] and [`TreeStore::walk`].
#[derive(Clone, Debug)]
pub struct Walk<'a> {
    store: &'a TreeStore,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.store.nodes.get(id.idx()).and_then(Option::as_ref) else {
                continue;
            };
            // Reversed so children come off the stack in reading order.
            self.stack.extend(node.children.iter().rev().copied());
            return Some(node);
        }
        None
    }
}

/// Upward iterator returned by [`TreeStore::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    store: &'a TreeStore,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.store.parent_of(current);
        Some(current)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::node::WordData;
    use crate::source::{SourceGraphic, SourceLine, SourceParagraph, SourceWord};
    use crate::types::BlockType;
    use alloc::vec;
    use kurbo::Point;

    pub(crate) fn word(text: &str, bbox: Rect) -> SourceWord {
        SourceWord {
            id: None,
            bbox,
            data: WordData {
                text: text.into(),
                ..Default::default()
            },
        }
    }

    pub(crate) fn line(bbox: Rect, words: Vec<SourceWord>) -> SourceLine {
        SourceLine {
            bbox,
            words,
            ..Default::default()
        }
    }

    pub(crate) fn paragraph(bbox: Rect, lines: Vec<SourceLine>) -> SourceParagraph {
        SourceParagraph {
            bbox,
            lines,
            ..Default::default()
        }
    }

    pub(crate) fn text_block(bbox: Rect, paragraphs: Vec<SourceParagraph>) -> SourceRegion {
        SourceRegion::Block(SourceBlock {
            bbox,
            paragraphs,
            ..Default::default()
        })
    }

    /// A page with two text blocks:
    ///
    /// - block A `(100,100,400,200)`: paragraph `(100,100,400,200)` with two lines of two words
    /// - block B `(100,300,400,340)`: one paragraph, one line, one word
    pub(crate) fn sample_page() -> SourcePage {
        let mut page = SourcePage::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
        page.regions = vec![
            text_block(
                Rect::new(100.0, 100.0, 400.0, 200.0),
                vec![paragraph(
                    Rect::new(100.0, 100.0, 400.0, 200.0),
                    vec![
                        line(
                            Rect::new(100.0, 100.0, 400.0, 140.0),
                            vec![
                                word("hello", Rect::new(100.0, 100.0, 200.0, 140.0)),
                                word("world", Rect::new(220.0, 100.0, 400.0, 140.0)),
                            ],
                        ),
                        line(
                            Rect::new(100.0, 160.0, 350.0, 200.0),
                            vec![
                                word("second", Rect::new(100.0, 160.0, 250.0, 200.0)),
                                word("line", Rect::new(260.0, 160.0, 350.0, 200.0)),
                            ],
                        ),
                    ],
                )],
            ),
            text_block(
                Rect::new(100.0, 300.0, 400.0, 340.0),
                vec![paragraph(
                    Rect::new(100.0, 300.0, 400.0, 340.0),
                    vec![line(
                        Rect::new(100.0, 300.0, 400.0, 340.0),
                        vec![word("alone", Rect::new(100.0, 300.0, 400.0, 340.0))],
                    )],
                )],
            ),
        ];
        page
    }

    /// Find the first node of `kind` in pre-order whose text is `text` (words) or any node of
    /// `kind` when `text` is empty.
    pub(crate) fn find(tree: &TreeStore, kind: NodeKind, text: &str) -> NodeId {
        tree.walk()
            .find(|n| n.kind() == kind && (text.is_empty() || n.text() == Some(text)))
            .map(Node::id)
            .expect("node should exist in the sample page")
    }

    #[test]
    fn build_assigns_structure_and_offsets() {
        let (root, tree) = TreeStore::build_from_page(&sample_page());
        assert_eq!(tree.node_count(), 1 + 2 + 2 + 3 + 5, "page, blocks, paragraphs, lines, words");
        assert_eq!(tree.get(root).unwrap().kind(), NodeKind::Page);
        assert_eq!(tree.get(root).unwrap().parent_relative_offset(), Point::ZERO);

        let block = tree.children_of(root)[0];
        // Children of the root are positioned absolutely.
        assert_eq!(
            tree.get(block).unwrap().parent_relative_offset(),
            Point::new(100.0, 100.0)
        );

        let world = find(&tree, NodeKind::Word, "world");
        // Nested nodes are relative to their parent's top-left.
        assert_eq!(
            tree.get(world).unwrap().parent_relative_offset(),
            Point::new(120.0, 0.0)
        );
        let second_line = tree.parent_of(find(&tree, NodeKind::Word, "second")).unwrap();
        assert_eq!(
            tree.get(second_line).unwrap().parent_relative_offset(),
            Point::new(0.0, 60.0)
        );
    }

    #[test]
    fn non_text_regions_get_no_children() {
        let mut page = SourcePage::new(Rect::new(0.0, 0.0, 500.0, 500.0));
        let nested = vec![paragraph(
            Rect::new(10.0, 10.0, 50.0, 50.0),
            vec![line(
                Rect::new(10.0, 10.0, 50.0, 50.0),
                vec![word("lost", Rect::new(10.0, 10.0, 50.0, 50.0))],
            )],
        )];
        page.regions = vec![
            SourceRegion::Block(SourceBlock {
                bbox: Rect::new(10.0, 10.0, 50.0, 50.0),
                block_type: BlockType::HorzLine,
                paragraphs: nested,
                ..Default::default()
            }),
            SourceRegion::Graphic(SourceGraphic {
                id: Some("graphic_1".into()),
                bbox: Rect::new(60.0, 60.0, 90.0, 90.0),
            }),
        ];
        let (root, tree) = TreeStore::build_from_page(&page);
        assert_eq!(tree.node_count(), 3, "rule block and graphic stay leaves");
        let [rule, graphic] = tree.children_of(root) else {
            panic!("expected two top-level regions");
        };
        assert!(tree.children_of(*rule).is_empty());
        assert_eq!(tree.get(*graphic).unwrap().kind(), NodeKind::Graphic);
        assert_eq!(tree.get(*graphic).unwrap().source_id(), Some("graphic_1"));
    }

    #[test]
    fn walk_is_pre_order_and_restartable() {
        let (root, tree) = TreeStore::build_from_page(&sample_page());
        let walk = tree.walk();
        let words: Vec<&str> = walk.clone().filter_map(Node::text).collect();
        assert_eq!(words, ["hello", "world", "second", "line", "alone"]);
        assert_eq!(walk.count(), tree.node_count(), "walk visits every node once");
        assert_eq!(tree.walk().next().map(Node::id), Some(root));

        let second_block = tree.children_of(root)[1];
        let sub: Vec<NodeKind> = tree.walk_subtree([second_block]).map(Node::kind).collect();
        assert_eq!(
            sub,
            [NodeKind::Block, NodeKind::Paragraph, NodeKind::Line, NodeKind::Word]
        );
    }

    #[test]
    fn ancestors_end_at_root() {
        let (root, tree) = TreeStore::build_from_page(&sample_page());
        let hello = find(&tree, NodeKind::Word, "hello");
        let chain: Vec<NodeId> = tree.ancestors(hello).collect();
        assert_eq!(chain.len(), 4, "line, paragraph, block, page");
        assert_eq!(chain.last().copied(), Some(root));
        assert!(tree.is_ancestor(root, hello));
        assert!(!tree.is_ancestor(hello, root));
        assert_eq!(tree.ancestors(root).count(), 0);
    }

    #[test]
    fn text_of_joins_words_and_lines() {
        let (root, tree) = TreeStore::build_from_page(&sample_page());
        let block = tree.children_of(root)[0];
        assert_eq!(tree.text_of(block).unwrap(), "hello world\nsecond line");
        assert_eq!(
            tree.text_of(root).unwrap(),
            "hello world\nsecond line\nalone"
        );
    }

    #[test]
    fn graft_appends_under_existing_root_with_fresh_ids() {
        let (root, mut tree) = TreeStore::build_from_page(&sample_page());
        let before = tree.node_count();
        let max_before = tree.walk().map(|n| n.id()).max().unwrap();

        let mut region = SourcePage::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
        region.regions = vec![text_block(
            Rect::new(500.0, 500.0, 600.0, 540.0),
            vec![paragraph(
                Rect::new(500.0, 500.0, 600.0, 540.0),
                vec![line(
                    Rect::new(500.0, 500.0, 600.0, 540.0),
                    vec![word("new", Rect::new(500.0, 500.0, 600.0, 540.0))],
                )],
            )],
        )];
        let grafted = tree.graft_page(&region);

        assert_eq!(grafted.len(), 1);
        assert_eq!(tree.node_count(), before + 4);
        assert_eq!(tree.children_of(root).last(), grafted.last());
        let block = tree.get(grafted[0]).unwrap();
        assert_eq!(block.parent(), Some(root));
        assert_eq!(block.parent_relative_offset(), Point::new(500.0, 500.0));
        assert!(grafted[0] > max_before, "grafted ids are fresh");
    }

    #[test]
    fn missing_ids_are_not_found() {
        let (_, tree) = TreeStore::build_from_page(&sample_page());
        let bogus = NodeId::new(10_000);
        assert_eq!(tree.get(bogus), Err(TreeError::NotFound(bogus)));
        assert!(!tree.contains(bogus));
        assert!(tree.children_of(bogus).is_empty());
        assert_eq!(tree.parent_of(bogus), None);
    }
}
