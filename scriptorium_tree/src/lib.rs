// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scriptorium Tree: an arena-backed OCR document tree with geometric editing.
//!
//! A recognized page is a strict hierarchy of elements, each carrying an axis-aligned box in
//! absolute page pixel space:
//!
//! - `Page` (the root, spanning the page canvas)
//! - `Block` (a content area classified by [`BlockType`]) or `Graphic` (an image region)
//! - `Paragraph`, `Line`, and finally `Word`, the only kind that carries text
//!
//! [`TreeStore`] holds the nodes in a flat arena addressed by [`NodeId`]. Children are ordered id
//! lists in reading order, so structural edits never juggle references between nodes.
//!
//! ## Geometry
//!
//! Every node stores its absolute [`Node::bbox`] plus a cached
//! [`Node::parent_relative_offset`]: the bbox top-left relative to the parent's top-left, or
//! absolute for children of the page root. Edits keep that cache current.
//!
//! Ancestors can be shrink-wrapped ([`TreeStore::shrink_wrap_ancestors`]) so that each box is
//! exactly the union of its children's boxes. The page root never shrinks.
//!
//! ## Edits
//!
//! - [`TreeStore::reposition_resize`]: move a node to a new top-left, optionally resizing it;
//!   the subtree travels with it.
//! - [`TreeStore::move_node`]: reparent and reorder, keeping absolute boxes.
//! - [`TreeStore::delete_node`]: remove a subtree.
//! - [`TreeStore::modify_node`]: change expansion or word text.
//!
//! Structural edits take an [`EditPolicy`] deciding whether ancestors are shrink-wrapped and
//! whether ancestors left empty are pruned. Rejected edits leave the tree untouched.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::Rect;
//! use scriptorium_tree::{
//!     EditPolicy, NodeKind, SourceBlock, SourceLine, SourcePage, SourceParagraph,
//!     SourceRegion, SourceWord, TreeStore, WordData,
//! };
//!
//! let bbox = Rect::new(100.0, 100.0, 300.0, 150.0);
//! let word = SourceWord {
//!     bbox,
//!     data: WordData { text: "scriptorium".into(), ..Default::default() },
//!     ..Default::default()
//! };
//! let line = SourceLine { bbox, words: vec![word], ..Default::default() };
//! let paragraph = SourceParagraph { bbox, lines: vec![line], ..Default::default() };
//! let mut page = SourcePage::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
//! page.regions.push(SourceRegion::Block(SourceBlock {
//!     bbox,
//!     paragraphs: vec![paragraph],
//!     ..Default::default()
//! }));
//!
//! let (_root, mut tree) = TreeStore::build_from_page(&page);
//! let word = tree
//!     .walk()
//!     .find(|n| n.kind() == NodeKind::Word)
//!     .map(|n| n.id())
//!     .unwrap();
//!
//! tree.reposition_resize(word, 150.0, 120.0, Some(80.0), Some(30.0)).unwrap();
//! tree.shrink_wrap_ancestors(word).unwrap();
//! for ancestor in tree.ancestors(word).take(3) {
//!     assert_eq!(tree.get(ancestor).unwrap().bbox(), Rect::new(150.0, 120.0, 230.0, 150.0));
//! }
//!
//! let removed = tree.delete_node(word, EditPolicy::default()).unwrap();
//! assert_eq!(removed.len(), 4, "the word plus its emptied ancestors");
//! assert_eq!(tree.node_count(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod geometry;
mod mutation;
mod node;
mod policy;
mod source;
mod store;
mod types;
mod verify;

pub use error::{InvalidOperation, Result, TreeError, Violation};
pub use geometry::{bbox_contains, compute_bounding_box, compute_relative_offset, offset_bbox};
pub use mutation::NodeChanges;
pub use node::{BlockData, Element, LineData, Node, PageData, ParagraphData, WordData};
pub use policy::EditPolicy;
pub use source::{
    SourceBlock, SourceGraphic, SourceLine, SourcePage, SourceParagraph, SourceRegion, SourceWord,
};
pub use store::{Ancestors, TreeStore, Walk};
pub use types::{BlockType, Direction, NodeId, NodeKind};
