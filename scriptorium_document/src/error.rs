// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use scriptorium_tree::TreeError;

use crate::document::DocumentId;

/// Result type for document and editor operations.
pub type Result<T, E = DocumentError> = core::result::Result<T, E>;

/// Errors returned by [`DocumentCollection`](crate::DocumentCollection) and
/// [`Editor`](crate::Editor).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// No document has this id.
    #[error("document {0} not found")]
    NotFound(DocumentId),
    /// The collection is empty, so there is nothing to route an edit to.
    #[error("no document is selected")]
    NoCurrentDocument,
    /// The document has not been recognized or imported yet.
    #[error("document {0} has no tree yet")]
    NoTree(DocumentId),
    /// A position in the document list is past its end.
    #[error("index {index} is out of range for {len} documents")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// Number of documents.
        len: usize,
    },
    /// A tree lookup or edit failed.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
