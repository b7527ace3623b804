// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena nodes and their kind-specific OCR payloads.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect};

use crate::types::{BlockType, Direction, NodeId, NodeKind};

/// Page-level metadata carried by the root node.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageData {
    /// Document title, if the source provided one.
    pub title: String,
    /// One-based page number.
    pub page_number: u32,
    /// Rotation of the page image, in degrees.
    pub rotation: f64,
    /// Scan resolution in DPI.
    pub resolution: Option<f64>,
    /// Reference to the page image, as named by the source.
    pub image: Option<String>,
}

/// Block payload.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockData {
    /// Layout classification.
    pub block_type: BlockType,
}

/// Paragraph payload.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParagraphData {
    /// Writing direction.
    pub direction: Direction,
}

/// Line payload. All metrics are optional because not every recognizer reports them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LineData {
    /// Baseline as `(slope, offset)` relative to the line box's bottom-left.
    pub baseline: Option<(f64, f64)>,
    /// Ascender height.
    pub ascenders: Option<f64>,
    /// Descender depth.
    pub descenders: Option<f64>,
    /// Font size in points.
    pub size: Option<f64>,
}

/// Word payload.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WordData {
    /// Recognized (or user-corrected) text.
    pub text: String,
    /// Recognizer confidence, 0–100.
    pub confidence: Option<f64>,
    /// Language code, e.g. `eng`.
    pub language: String,
    /// Font size in points.
    pub size: Option<f64>,
}

/// Kind-specific payload of a node.
///
/// The variant determines the node's [`NodeKind`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    /// The page root.
    Page(PageData),
    /// A content area.
    Block(BlockData),
    /// An image region.
    Graphic,
    /// A paragraph.
    Paragraph(ParagraphData),
    /// A line.
    Line(LineData),
    /// A word.
    Word(WordData),
}

impl Element {
    /// The kind of node this payload belongs to.
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Page(_) => NodeKind::Page,
            Self::Block(_) => NodeKind::Block,
            Self::Graphic => NodeKind::Graphic,
            Self::Paragraph(_) => NodeKind::Paragraph,
            Self::Line(_) => NodeKind::Line,
            Self::Word(_) => NodeKind::Word,
        }
    }
}

/// One OCR element in a [`TreeStore`](crate::TreeStore).
///
/// Nodes are read through the store; only the store's edit operations can change them.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) bbox: Rect,
    pub(crate) offset: Point,
    pub(crate) expanded: bool,
    pub(crate) source_id: Option<String>,
    pub(crate) element: Element,
}

impl Node {
    pub(crate) fn new(id: NodeId, bbox: Rect, element: Element) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            bbox,
            offset: Point::ZERO,
            expanded: element.kind().expanded_by_default(),
            source_id: None,
            element,
        }
    }

    /// This node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// This node's kind.
    pub fn kind(&self) -> NodeKind {
        self.element.kind()
    }

    /// The kind-specific payload.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Absolute bounding box in page pixel space.
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// Cached position of the bbox top-left relative to the parent.
    ///
    /// Relative to the parent's top-left for nested nodes, absolute for children of the page
    /// root, and the origin for the root itself.
    pub fn parent_relative_offset(&self) -> Point {
        self.offset
    }

    /// The parent, or `None` for the page root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered children (reading order).
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns true for the page root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Tree-view expansion flag.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// The recognizer's own id for this element (for example `word_1_3`), if it had one.
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    /// The text of a word node, `None` for every other kind.
    pub fn text(&self) -> Option<&str> {
        match &self.element {
            Element::Word(word) => Some(&word.text),
            _ => None,
        }
    }

    /// Returns true if this node may receive a child of kind `child`.
    ///
    /// Blocks only host paragraphs when their [`BlockType`] carries text.
    pub fn can_host(&self, child: NodeKind) -> bool {
        match &self.element {
            Element::Block(block) if !block.block_type.hosts_text() => false,
            _ => self.kind().can_host(child),
        }
    }
}
