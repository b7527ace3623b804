// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single scanned page and its recognized tree.

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;
use kurbo::Size;
use scriptorium_tree::{NodeId, TreeStore};

/// Largest thumbnail produced by [`PageImage::thumbnail_size`].
pub const THUMBNAIL_MAX: Size = Size::new(120.0, 160.0);

/// Identifier for a document in a [`DocumentCollection`](crate::DocumentCollection).
///
/// Ids are never reused by the collection or editor that handed them out, even across undo.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DocumentId(u32);

impl DocumentId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw numeric value of this id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc{}", self.0)
    }
}

/// The scanned image behind a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageImage {
    /// Where the full-size image can be loaded from.
    pub uri: String,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Where a pre-rendered thumbnail can be loaded from, if one exists.
    pub thumbnail_uri: Option<String>,
}

impl PageImage {
    /// An image of the given pixel size, without a thumbnail.
    pub fn new(uri: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            uri: uri.into(),
            width,
            height,
            thumbnail_uri: None,
        }
    }

    /// The pixel size as a [`Size`].
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// The image scaled to fit [`THUMBNAIL_MAX`], keeping its aspect ratio.
    ///
    /// Small images are scaled up. A degenerate image gives [`Size::ZERO`].
    pub fn thumbnail_size(&self) -> Size {
        let size = self.size();
        if size.width <= 0.0 || size.height <= 0.0 {
            return Size::ZERO;
        }
        let scale = (THUMBNAIL_MAX.width / size.width).min(THUMBNAIL_MAX.height / size.height);
        size * scale
    }
}

/// A page in the collection: a file name, an optional image, and an optional tree.
///
/// A document without a tree has not been recognized or imported yet. The tree sits behind an
/// [`Arc`] so that history snapshots share it until an edit copies it on write.
#[derive(Clone, Debug)]
pub struct Document {
    pub(crate) id: DocumentId,
    pub(crate) filename: String,
    pub(crate) image: Option<PageImage>,
    pub(crate) tree: Option<Arc<TreeStore>>,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        let same_tree = match (&self.tree, &other.tree) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a == b,
            (None, None) => true,
            _ => false,
        };
        same_tree
            && self.id == other.id
            && self.filename == other.filename
            && self.image == other.image
    }
}

impl Document {
    pub(crate) fn new(id: DocumentId, filename: String, image: Option<PageImage>) -> Self {
        Self {
            id,
            filename,
            image,
            tree: None,
        }
    }

    /// This document's id.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// The file name the document was opened from.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The scanned image, if one is attached.
    pub fn image(&self) -> Option<&PageImage> {
        self.image.as_ref()
    }

    /// The recognized tree, if any.
    pub fn tree(&self) -> Option<&TreeStore> {
        self.tree.as_deref()
    }

    /// The tree's root, if there is a tree.
    pub fn root(&self) -> Option<NodeId> {
        self.tree().map(TreeStore::root)
    }

    /// Returns true once the document has been recognized or imported.
    pub fn has_tree(&self) -> bool {
        self.tree.is_some()
    }

    /// Mutable access to the tree, unsharing it from any snapshot first.
    pub(crate) fn tree_mut(&mut self) -> Option<&mut TreeStore> {
        self.tree.as_mut().map(Arc::make_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnails_fit_the_box() {
        let landscape = PageImage::new("scan.png", 2400, 1200);
        assert_eq!(landscape.thumbnail_size(), Size::new(120.0, 60.0));

        let portrait = PageImage::new("scan.png", 1000, 2000);
        assert_eq!(portrait.thumbnail_size(), Size::new(80.0, 160.0));

        // Nearly square portraits are bounded by width, not height.
        let squat = PageImage::new("scan.png", 1500, 1600);
        let thumb = squat.thumbnail_size();
        assert_eq!(thumb.width, 120.0);
        assert!(thumb.height <= 160.0, "height {} overflows", thumb.height);

        assert_eq!(PageImage::new("empty", 0, 10).thumbnail_size(), Size::ZERO);
    }

    #[test]
    fn display_ids() {
        assert_eq!(alloc::format!("{}", DocumentId::new(7)), "doc7");
    }
}
