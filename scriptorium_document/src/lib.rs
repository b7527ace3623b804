// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scriptorium Document: multi-page OCR documents with undoable editing.
//!
//! - [`Document`]: one scanned page, its [`PageImage`], and (once recognized) its
//!   [`TreeStore`](scriptorium_tree::TreeStore).
//! - [`DocumentCollection`]: ordered documents plus the cursor selecting where edits go.
//! - [`Editor`]: owns a [`History`](scriptorium_history::History) of [`EditorState`] snapshots
//!   and routes document, recognition, and node edits through it. Hover and recognition progress
//!   live in a [`Transient`] side channel that undo never touches.
//!
//! Trees are held behind `Arc`, so a snapshot only copies the trees an edit actually changes.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod collection;
mod document;
mod editor;
mod error;

pub use collection::DocumentCollection;
pub use document::{Document, DocumentId, PageImage, THUMBNAIL_MAX};
pub use editor::{Editor, EditorConfig, EditorState, RecognizeUpdate, Transient};
pub use error::{DocumentError, Result};
