// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ordered document list and its selection cursor.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use scriptorium_tree::{NodeId, SourcePage, TreeStore};
use tracing::debug;

use crate::document::{Document, DocumentId, PageImage};
use crate::error::{DocumentError, Result};

/// Ordered documents plus the cursor selecting the one edits are routed to.
///
/// Whenever the collection is non-empty, exactly one document is current.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentCollection {
    documents: Vec<Document>,
    current: Option<usize>,
    next_id: u32,
}

impl DocumentCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if there are no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in list order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> + '_ {
        self.documents.iter()
    }

    /// Look up a document.
    pub fn get(&self, id: DocumentId) -> Result<&Document> {
        self.documents
            .iter()
            .find(|doc| doc.id == id)
            .ok_or(DocumentError::NotFound(id))
    }

    fn get_mut(&mut self, id: DocumentId) -> Result<&mut Document> {
        self.documents
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or(DocumentError::NotFound(id))
    }

    /// Position of a document in the list.
    pub fn position(&self, id: DocumentId) -> Result<usize> {
        self.documents
            .iter()
            .position(|doc| doc.id == id)
            .ok_or(DocumentError::NotFound(id))
    }

    /// Position of the current document.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The current document.
    pub fn current(&self) -> Option<&Document> {
        self.current.and_then(|index| self.documents.get(index))
    }

    /// Id of the current document.
    pub fn current_id(&self) -> Option<DocumentId> {
        self.current().map(Document::id)
    }

    /// The current document's tree.
    ///
    /// Fails with [`DocumentError::NoCurrentDocument`] on an empty collection and
    /// [`DocumentError::NoTree`] before recognition.
    pub fn current_tree(&self) -> Result<&TreeStore> {
        let doc = self.current().ok_or(DocumentError::NoCurrentDocument)?;
        doc.tree().ok_or(DocumentError::NoTree(doc.id))
    }

    /// Mutable access to the current document's tree, copied on write if a snapshot shares it.
    pub fn current_tree_mut(&mut self) -> Result<&mut TreeStore> {
        let index = self.current.ok_or(DocumentError::NoCurrentDocument)?;
        let doc = &mut self.documents[index];
        let id = doc.id;
        doc.tree_mut().ok_or(DocumentError::NoTree(id))
    }

    /// Append a document without a tree. The selection moves only if the collection was empty.
    pub fn add_document(
        &mut self,
        filename: impl Into<String>,
        image: Option<PageImage>,
    ) -> DocumentId {
        let id = DocumentId::new(self.next_id);
        self.next_id += 1;
        let filename = filename.into();
        debug!(document = %id, filename = %filename, "added document");
        self.documents.push(Document::new(id, filename, image));
        if self.current.is_none() {
            self.current = Some(self.documents.len() - 1);
        }
        id
    }

    /// Append a document, built from `page` if an imported recognition is given, and select it.
    pub fn open_document(
        &mut self,
        filename: impl Into<String>,
        image: Option<PageImage>,
        page: Option<&SourcePage>,
    ) -> DocumentId {
        let id = self.add_document(filename, image);
        let index = self.documents.len() - 1;
        if let Some(page) = page {
            let (_, tree) = TreeStore::build_from_page(page);
            self.documents[index].tree = Some(Arc::new(tree));
        }
        self.current = Some(index);
        id
    }

    /// Attach or replace a document's image.
    pub fn set_image(&mut self, id: DocumentId, image: PageImage) -> Result<()> {
        self.get_mut(id)?.image = Some(image);
        Ok(())
    }

    /// Replace a document's tree with one built from a full-page recognition.
    ///
    /// Returns the new root.
    pub fn replace_tree(&mut self, id: DocumentId, page: &SourcePage) -> Result<NodeId> {
        let doc = self.get_mut(id)?;
        let (root, tree) = TreeStore::build_from_page(page);
        doc.tree = Some(Arc::new(tree));
        debug!(document = %id, "replaced tree");
        Ok(root)
    }

    /// Merge a region recognition into a document.
    ///
    /// The page's top-level regions are grafted under the existing root with fresh ids. Without
    /// an existing tree, one is built from `page`. Returns the ids of the new top-level nodes.
    pub fn merge_recognition_into(
        &mut self,
        id: DocumentId,
        page: &SourcePage,
    ) -> Result<Vec<NodeId>> {
        let doc = self.get_mut(id)?;
        match doc.tree_mut() {
            Some(tree) => Ok(tree.graft_page(page)),
            None => {
                let (root, tree) = TreeStore::build_from_page(page);
                let grafted = tree.children_of(root).to_vec();
                doc.tree = Some(Arc::new(tree));
                Ok(grafted)
            }
        }
    }

    /// Make `id` the current document.
    pub fn select(&mut self, id: DocumentId) -> Result<()> {
        self.current = Some(self.position(id)?);
        Ok(())
    }

    /// Move the document at `from` to position `to`, keeping the same document selected.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.documents.len();
        for index in [from, to] {
            if index >= len {
                return Err(DocumentError::IndexOutOfRange { index, len });
            }
        }
        let selected = self.current_id();
        let doc = self.documents.remove(from);
        self.documents.insert(to, doc);
        self.current = selected.and_then(|id| self.position(id).ok());
        Ok(())
    }

    /// Remove a document, keeping the cursor on a valid document.
    ///
    /// Removing the current document selects the one that took its place, or the new last one.
    pub fn remove_document(&mut self, id: DocumentId) -> Result<Document> {
        let index = self.position(id)?;
        let removed = self.documents.remove(index);
        self.current = match self.current {
            _ if self.documents.is_empty() => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) => Some(current.min(self.documents.len() - 1)),
            None => None,
        };
        debug!(document = %id, "removed document");
        Ok(removed)
    }

    /// Never hand out an id below `next`.
    pub(crate) fn reserve_ids(&mut self, next: u32) {
        self.next_id = self.next_id.max(next);
    }

    pub(crate) fn next_id(&self) -> u32 {
        self.next_id
    }
}
