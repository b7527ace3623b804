// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document tree: node identifiers, kinds, and block classification.

use core::fmt;

/// Identifier for a node in a [`TreeStore`](crate::TreeStore).
///
/// This is a small, copyable handle that stays stable across every edit.
///
/// ## Semantics
///
/// - Ids are handed out in increasing order as nodes are created (by
///   [`TreeStore::build_from_page`](crate::TreeStore::build_from_page) or
///   [`TreeStore::graft_page`](crate::TreeStore::graft_page)).
/// - A removed node's id is never handed out again by the same store, so a stale `NodeId`
///   can never alias a different live node.
///
/// Use [`TreeStore::contains`](crate::TreeStore::contains) to check whether a `NodeId` still
/// refers to a live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// The raw numeric value of this id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of OCR element kinds.
///
/// Ordered from the root down: a page holds blocks and graphics, blocks hold paragraphs,
/// paragraphs hold lines, and lines hold words.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// The page root. Exactly one per tree.
    Page,
    /// A content area, possibly hosting paragraphs (see [`BlockType::hosts_text`]).
    Block,
    /// An image region. Always a leaf.
    Graphic,
    /// A paragraph of lines.
    Paragraph,
    /// A line of words.
    Line,
    /// A recognized word. Always a leaf.
    Word,
}

impl NodeKind {
    /// Returns true for kinds that never have children.
    pub const fn is_leaf(self) -> bool {
        matches!(self, Self::Graphic | Self::Word)
    }

    /// Returns true if a node of this kind may, structurally, host a child of kind `child`.
    ///
    /// For [`NodeKind::Block`] this is only the kind-level rule; whether a specific block can
    /// host paragraphs also depends on its [`BlockType`]. Use
    /// [`Node::can_host`](crate::Node::can_host) for the full check.
    pub const fn can_host(self, child: Self) -> bool {
        matches!(
            (self, child),
            (Self::Page, Self::Block | Self::Graphic)
                | (Self::Block, Self::Paragraph)
                | (Self::Paragraph, Self::Line)
                | (Self::Line, Self::Word)
        )
    }

    /// Whether nodes of this kind start out expanded in a tree view.
    pub const fn expanded_by_default(self) -> bool {
        matches!(self, Self::Page | Self::Block | Self::Paragraph)
    }

    /// A short, human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Block => "block",
            Self::Graphic => "graphic",
            Self::Paragraph => "paragraph",
            Self::Line => "line",
            Self::Word => "word",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Layout classification of a block, as reported by the recognizer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum BlockType {
    /// Text captioning an image.
    CaptionText,
    /// Image flowing with the text.
    FlowingImage,
    /// Ordinary body text.
    #[default]
    FlowingText,
    /// Image used as a heading.
    HeadingImage,
    /// Horizontal rule.
    HorzLine,
    /// Image pulled out of the text flow.
    PulloutImage,
    /// Text pulled out of the flow (sidebars, pull quotes).
    PulloutText,
    /// Vertical rule.
    VertLine,
    /// Vertically set text.
    VerticalText,
}

impl BlockType {
    /// Returns true if blocks of this type may hold paragraphs.
    pub const fn hosts_text(self) -> bool {
        matches!(
            self,
            Self::CaptionText | Self::FlowingText | Self::PulloutText | Self::VerticalText
        )
    }

    /// Returns true for image classifications.
    pub const fn is_image(self) -> bool {
        matches!(
            self,
            Self::FlowingImage | Self::HeadingImage | Self::PulloutImage
        )
    }

    /// Returns true for horizontal or vertical rules.
    pub const fn is_rule(self) -> bool {
        matches!(self, Self::HorzLine | Self::VertLine)
    }
}

/// Writing direction of a paragraph.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosting_rules_follow_the_hierarchy() {
        assert!(NodeKind::Page.can_host(NodeKind::Block));
        assert!(NodeKind::Page.can_host(NodeKind::Graphic));
        assert!(NodeKind::Block.can_host(NodeKind::Paragraph));
        assert!(NodeKind::Paragraph.can_host(NodeKind::Line));
        assert!(NodeKind::Line.can_host(NodeKind::Word));

        assert!(!NodeKind::Page.can_host(NodeKind::Word), "words live in lines");
        assert!(!NodeKind::Line.can_host(NodeKind::Line), "no nesting of equal kinds");
        assert!(!NodeKind::Word.can_host(NodeKind::Word), "words are leaves");
        assert!(!NodeKind::Graphic.can_host(NodeKind::Paragraph), "graphics are leaves");
    }

    #[test]
    fn only_text_blocks_host_paragraphs() {
        let hosting = [
            BlockType::CaptionText,
            BlockType::FlowingText,
            BlockType::PulloutText,
            BlockType::VerticalText,
        ];
        for ty in hosting {
            assert!(ty.hosts_text(), "{ty:?} should host text");
            assert!(!ty.is_image() && !ty.is_rule(), "{ty:?} is a text type");
        }
        for ty in [
            BlockType::FlowingImage,
            BlockType::HeadingImage,
            BlockType::PulloutImage,
            BlockType::HorzLine,
            BlockType::VertLine,
        ] {
            assert!(!ty.hosts_text(), "{ty:?} should not host text");
        }
    }

    #[test]
    fn leaves_and_default_expansion() {
        assert!(NodeKind::Word.is_leaf());
        assert!(NodeKind::Graphic.is_leaf());
        assert!(!NodeKind::Line.is_leaf());
        assert!(NodeKind::Block.expanded_by_default());
        assert!(NodeKind::Paragraph.expanded_by_default());
        assert!(!NodeKind::Line.expanded_by_default());
    }
}
