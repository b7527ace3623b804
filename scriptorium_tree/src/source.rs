// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognizer-neutral page structure consumed by [`TreeStore::build_from_page`].
//!
//! Live recognition results and parsed hOCR files are both converted into a [`SourcePage`]
//! before entering the engine. All boxes are absolute page pixel coordinates.
//!
//! [`TreeStore::build_from_page`]: crate::TreeStore::build_from_page

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Rect;

use crate::node::{LineData, PageData, WordData};
use crate::types::{BlockType, Direction};

/// A recognized page.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SourcePage {
    /// The recognizer's id for the page.
    pub id: Option<String>,
    /// Page extent; the root's bbox. Expected to start at the origin.
    pub bbox: Rect,
    /// Page metadata.
    pub data: PageData,
    /// Top-level regions in reading order.
    pub regions: Vec<SourceRegion>,
}

/// A top-level region of a page.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum SourceRegion {
    /// A content area.
    Block(SourceBlock),
    /// An image region.
    Graphic(SourceGraphic),
}

impl SourceRegion {
    /// The region's bounding box.
    pub fn bbox(&self) -> Rect {
        match self {
            Self::Block(block) => block.bbox,
            Self::Graphic(graphic) => graphic.bbox,
        }
    }
}

/// A content area.
///
/// `paragraphs` are ignored for block types that do not host text.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SourceBlock {
    /// The recognizer's id for the block.
    pub id: Option<String>,
    /// Bounding box.
    pub bbox: Rect,
    /// Layout classification.
    pub block_type: BlockType,
    /// Paragraphs in reading order.
    pub paragraphs: Vec<SourceParagraph>,
}

/// An image region.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SourceGraphic {
    /// The recognizer's id for the graphic.
    pub id: Option<String>,
    /// Bounding box.
    pub bbox: Rect,
}

/// A paragraph.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SourceParagraph {
    /// The recognizer's id for the paragraph.
    pub id: Option<String>,
    /// Bounding box.
    pub bbox: Rect,
    /// Writing direction.
    pub direction: Direction,
    /// Lines in reading order.
    pub lines: Vec<SourceLine>,
}

/// A line.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SourceLine {
    /// The recognizer's id for the line.
    pub id: Option<String>,
    /// Bounding box.
    pub bbox: Rect,
    /// Line metrics.
    pub data: LineData,
    /// Words in reading order.
    pub words: Vec<SourceWord>,
}

/// A word.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SourceWord {
    /// The recognizer's id for the word.
    pub id: Option<String>,
    /// Bounding box.
    pub bbox: Rect,
    /// Text and recognition metadata.
    pub data: WordData,
}

impl SourcePage {
    /// An empty page covering `bbox`.
    pub fn new(bbox: Rect) -> Self {
        Self {
            bbox,
            ..Self::default()
        }
    }
}
