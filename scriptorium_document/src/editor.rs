// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Undoable editing over a [`DocumentCollection`].

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::convert::Infallible;
use kurbo::Rect;
use scriptorium_history::{Applied, History};
use scriptorium_tree::{EditPolicy, NodeChanges, NodeId, SourcePage, TreeError, TreeStore};
use tracing::{debug, error, warn};

use crate::collection::DocumentCollection;
use crate::document::{DocumentId, PageImage};
use crate::error::{DocumentError, Result};

/// Editor settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EditorConfig {
    /// Number of undo snapshots kept.
    pub history_capacity: usize,
    /// Initial edit policy.
    pub policy: EditPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: scriptorium_history::DEFAULT_CAPACITY,
            policy: EditPolicy::default(),
        }
    }
}

/// Everything undo and redo restore.
///
/// Trees are shared between snapshots until an edit touches them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorState {
    documents: DocumentCollection,
    selected: Option<NodeId>,
    is_drawing: bool,
    draw_rect: Option<Rect>,
    options: EditPolicy,
}

impl EditorState {
    /// The documents.
    pub fn documents(&self) -> &DocumentCollection {
        &self.documents
    }

    /// The selected node in the current document.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Returns true while the user is drawing a recognition region.
    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    /// The region being drawn, in page coordinates.
    pub fn draw_rect(&self) -> Option<Rect> {
        self.draw_rect
    }

    /// The active edit policy.
    pub fn options(&self) -> EditPolicy {
        self.options
    }

    fn forget_selection(&mut self, removed: &[NodeId]) {
        if self.selected.is_some_and(|id| removed.contains(&id)) {
            self.selected = None;
        }
    }
}

/// Progress report from a recognition job.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RecognizeUpdate {
    /// The worker running the job.
    pub worker_id: String,
    /// The job, once the worker has assigned one.
    pub job_id: Option<String>,
    /// Free-form status, e.g. `recognizing text`.
    pub status: String,
    /// Completion between 0 and 1.
    pub progress: f64,
}

/// State that bypasses history: undo and redo never touch it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transient {
    hovered: Option<NodeId>,
    processing: BTreeSet<DocumentId>,
    last_update: Option<RecognizeUpdate>,
}

impl Transient {
    /// The node under the pointer.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Returns true while a recognition job for `id` is running.
    pub fn is_processing(&self, id: DocumentId) -> bool {
        self.processing.contains(&id)
    }

    /// Returns true while any recognition job is running.
    pub fn is_any_processing(&self) -> bool {
        !self.processing.is_empty()
    }

    /// The latest recognition progress report.
    pub fn last_update(&self) -> Option<&RecognizeUpdate> {
        self.last_update.as_ref()
    }
}

/// The editing front end: every user-visible change goes through here and can be undone.
///
/// Node edits are routed to the current document's tree. Rejected edits leave both the state and
/// the history untouched and are logged.
///
/// ```
/// use kurbo::Rect;
/// use scriptorium_document::Editor;
/// use scriptorium_tree::{SourceGraphic, SourcePage, SourceRegion};
///
/// let mut page = SourcePage::new(Rect::new(0.0, 0.0, 600.0, 800.0));
/// page.regions.push(SourceRegion::Graphic(SourceGraphic {
///     id: None,
///     bbox: Rect::new(10.0, 10.0, 110.0, 60.0),
/// }));
///
/// let mut editor = Editor::new();
/// editor.open_document("scan.png", None, Some(&page));
/// let graphic = editor.current_tree().unwrap().walk().nth(1).unwrap().id();
///
/// editor.reposition_resize(graphic, 200.0, 300.0, None, None).unwrap();
/// assert_eq!(
///     editor.current_tree().unwrap().get(graphic).unwrap().bbox(),
///     Rect::new(200.0, 300.0, 300.0, 350.0)
/// );
///
/// assert!(editor.undo());
/// assert_eq!(
///     editor.current_tree().unwrap().get(graphic).unwrap().bbox(),
///     Rect::new(10.0, 10.0, 110.0, 60.0)
/// );
/// ```
#[derive(Debug)]
pub struct Editor {
    history: History<EditorState>,
    transient: Transient,
    /// Lowest document id not yet handed out, kept outside history so undo cannot rewind it.
    next_document: u32,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Create an editor with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create an editor from `config`.
    pub fn with_config(config: EditorConfig) -> Self {
        let state = EditorState {
            options: config.policy,
            ..EditorState::default()
        };
        Self {
            history: History::with_capacity(state, config.history_capacity),
            transient: Transient::default(),
            next_document: 0,
        }
    }

    /// The current snapshot.
    pub fn state(&self) -> &EditorState {
        self.history.current()
    }

    /// The documents in the current snapshot.
    pub fn documents(&self) -> &DocumentCollection {
        &self.state().documents
    }

    /// The current document's tree.
    pub fn current_tree(&self) -> Result<&TreeStore> {
        self.documents().current_tree()
    }

    /// State outside history.
    pub fn transient(&self) -> &Transient {
        &self.transient
    }

    /// The snapshot history.
    pub fn history(&self) -> &History<EditorState> {
        &self.history
    }

    /// Returns true if there is an edit to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there is an undone edit to restore.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restore the previous snapshot. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo().is_some();
        if moved {
            self.transient.hovered = None;
        }
        moved
    }

    /// Restore the next snapshot. Returns false if there was none.
    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo().is_some();
        if moved {
            self.transient.hovered = None;
        }
        moved
    }

    // --- documents ---

    /// Append a document without a tree.
    pub fn add_document(
        &mut self,
        filename: impl Into<String>,
        image: Option<PageImage>,
    ) -> DocumentId {
        let filename = filename.into();
        let floor = self.next_document;
        let id = self.record("add_document", |state| {
            state.documents.reserve_ids(floor);
            state.documents.add_document(filename, image)
        });
        self.next_document = self.documents().next_id();
        id
    }

    /// Append a document, built from an imported recognition if given, and select it.
    pub fn open_document(
        &mut self,
        filename: impl Into<String>,
        image: Option<PageImage>,
        page: Option<&SourcePage>,
    ) -> DocumentId {
        let filename = filename.into();
        let floor = self.next_document;
        let id = self.record("open_document", |state| {
            state.documents.reserve_ids(floor);
            state.selected = None;
            state.documents.open_document(filename, image, page)
        });
        self.next_document = self.documents().next_id();
        id
    }

    /// Attach or replace a document's image.
    pub fn set_document_image(&mut self, id: DocumentId, image: PageImage) -> Result<()> {
        self.edit("set_document_image", |state| {
            state.documents.set_image(id, image)
        })
    }

    /// Make `id` the current document. The node selection is cleared when the document changes.
    pub fn select_document(&mut self, id: DocumentId) -> Result<()> {
        self.edit("select_document", |state| {
            let before = state.documents.current_id();
            state.documents.select(id)?;
            if before != Some(id) {
                state.selected = None;
            }
            Ok(())
        })
    }

    /// Move the document at `from` to position `to`.
    pub fn reorder_documents(&mut self, from: usize, to: usize) -> Result<()> {
        self.edit("reorder_documents", |state| state.documents.reorder(from, to))
    }

    /// Remove a document.
    pub fn remove_document(&mut self, id: DocumentId) -> Result<()> {
        self.edit("remove_document", |state| {
            let before = state.documents.current_id();
            state.documents.remove_document(id)?;
            if state.documents.current_id() != before {
                state.selected = None;
            }
            Ok(())
        })?;
        self.transient.processing.remove(&id);
        Ok(())
    }

    // --- recognition ---

    /// Replace a document's tree with a full-page recognition result.
    ///
    /// Clears the document's processing flag once the tree is in place. Returns the new root.
    pub fn recognize_document(&mut self, id: DocumentId, page: &SourcePage) -> Result<NodeId> {
        let root = self.edit("recognize_document", |state| {
            let root = state.documents.replace_tree(id, page)?;
            if state.documents.current_id() == Some(id) {
                state.selected = None;
            }
            Ok(root)
        })?;
        self.transient.processing.remove(&id);
        Ok(root)
    }

    /// Merge a region recognition result into a document.
    ///
    /// Clears the document's processing flag once the regions are merged. Returns the new
    /// top-level nodes.
    pub fn recognize_region(&mut self, id: DocumentId, page: &SourcePage) -> Result<Vec<NodeId>> {
        let grafted = self.edit("recognize_region", |state| {
            state.documents.merge_recognition_into(id, page)
        })?;
        self.transient.processing.remove(&id);
        Ok(grafted)
    }

    /// Flag a document as having a recognition job in flight.
    pub fn set_processing(&mut self, id: DocumentId, processing: bool) {
        if processing {
            self.transient.processing.insert(id);
        } else {
            self.transient.processing.remove(&id);
        }
        debug!(document = %id, processing, "editor: processing flag");
    }

    /// Store the latest recognition progress report.
    pub fn log_update(&mut self, update: Option<RecognizeUpdate>) {
        self.transient.last_update = update;
    }

    // --- nodes ---

    /// Select a node in the current tree, or clear the selection.
    pub fn select_node(&mut self, id: Option<NodeId>) -> Result<()> {
        self.edit("select_node", |state| {
            if let Some(id) = id {
                state.documents.current_tree()?.get(id)?;
            }
            state.selected = id;
            Ok(())
        })
    }

    /// Set the hovered node.
    pub fn hover_node(&mut self, id: Option<NodeId>) {
        self.transient.hovered = id;
    }

    /// Move and optionally resize a node of the current tree.
    ///
    /// With [`EditPolicy::AUTO_RESIZE`] the node's box is first grown to enclose its children,
    /// then its ancestors are shrink-wrapped.
    pub fn reposition_resize(
        &mut self,
        id: NodeId,
        x: f64,
        y: f64,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Result<()> {
        self.edit("reposition_resize", |state| {
            let policy = state.options;
            let tree = state.documents.current_tree_mut()?;
            tree.reposition_resize(id, x, y, width, height)?;
            if policy.auto_resize() {
                tree.enclose_children(id)?;
                tree.shrink_wrap_ancestors(id)?;
            }
            Ok(())
        })
    }

    /// Reparent a node of the current tree. Returns the ids pruned by the edit policy.
    pub fn move_node(
        &mut self,
        id: NodeId,
        destination: NodeId,
        index: Option<usize>,
    ) -> Result<Vec<NodeId>> {
        self.edit("move_node", |state| {
            let policy = state.options;
            let pruned = state
                .documents
                .current_tree_mut()?
                .move_node(id, destination, index, policy)?;
            state.forget_selection(&pruned);
            Ok(pruned)
        })
    }

    /// Delete a node of the current tree. Returns every removed id.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        self.edit("delete_node", |state| {
            let policy = state.options;
            let removed = state.documents.current_tree_mut()?.delete_node(id, policy)?;
            state.forget_selection(&removed);
            Ok(removed)
        })
    }

    /// Change non-geometric attributes of a node of the current tree.
    pub fn modify_node(&mut self, id: NodeId, changes: NodeChanges) -> Result<()> {
        self.edit("modify_node", |state| {
            state.documents.current_tree_mut()?.modify_node(id, changes)?;
            Ok(())
        })
    }

    // --- canvas and options ---

    /// Enter or leave region-drawing mode.
    pub fn set_drawing(&mut self, is_drawing: bool) {
        self.record("set_drawing", |state| state.is_drawing = is_drawing);
    }

    /// Set or clear the region being drawn.
    pub fn set_draw_rect(&mut self, rect: Option<Rect>) {
        self.record("set_draw_rect", |state| state.draw_rect = rect);
    }

    /// Replace the edit policy.
    pub fn set_options(&mut self, options: EditPolicy) {
        self.record("set_options", |state| state.options = options);
        debug!(?options, "editor: options changed");
    }

    /// Run a fallible edit through history.
    fn edit<R>(
        &mut self,
        action: &'static str,
        edit: impl FnOnce(&mut EditorState) -> Result<R>,
    ) -> Result<R> {
        match self.history.apply(edit) {
            Ok(Applied { output, recorded }) => {
                debug!(action, recorded, "editor: applied");
                Ok(output)
            }
            Err(err) => {
                log_rejection(action, &err);
                Err(err)
            }
        }
    }

    /// Run an infallible edit through history.
    fn record<R>(&mut self, action: &'static str, edit: impl FnOnce(&mut EditorState) -> R) -> R {
        let Ok(Applied { output, recorded }) = self
            .history
            .apply(|state| Ok::<_, Infallible>(edit(state)));
        debug!(action, recorded, "editor: applied");
        output
    }
}

fn log_rejection(action: &'static str, err: &DocumentError) {
    match err {
        DocumentError::Tree(TreeError::NotFound(node)) => {
            error!(action, node = %node, "editor: node is not in the current tree");
        }
        DocumentError::NotFound(document) => {
            error!(action, document = %document, "editor: unknown document");
        }
        _ => warn!(action, error = %err, "editor: rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptorium_tree::{InvalidOperation, SourceGraphic, SourceRegion};

    fn page(graphics: &[Rect]) -> SourcePage {
        let mut page = SourcePage::new(Rect::new(0.0, 0.0, 600.0, 800.0));
        for &bbox in graphics {
            page.regions
                .push(SourceRegion::Graphic(SourceGraphic { id: None, bbox }));
        }
        page
    }

    #[test]
    fn failed_edits_are_not_recorded() {
        let mut editor = Editor::new();
        editor.open_document("a", None, Some(&page(&[Rect::new(0.0, 0.0, 5.0, 5.0)])));
        let len = editor.history().len();
        let root = editor.current_tree().unwrap().root();

        assert_eq!(
            editor.delete_node(root),
            Err(DocumentError::Tree(InvalidOperation::DeleteRoot.into()))
        );
        assert_eq!(editor.history().len(), len);
    }

    #[test]
    fn no_op_edits_are_not_recorded() {
        let mut editor = Editor::new();
        editor.set_drawing(false);
        editor.set_options(EditPolicy::default());
        assert!(!editor.can_undo());
    }

    #[test]
    fn document_ids_survive_undo() {
        let mut editor = Editor::new();
        let a = editor.add_document("a", None);
        assert!(editor.undo());
        assert!(editor.documents().is_empty());
        let b = editor.add_document("b", None);
        assert_ne!(a, b, "an undone document's id is not handed out again");
    }

    #[test]
    fn processing_flags_bypass_history() {
        let mut editor = Editor::new();
        let a = editor.add_document("a", None);
        editor.set_processing(a, true);
        editor.set_drawing(true);
        assert!(editor.transient().is_processing(a));
        editor.undo();
        assert!(editor.transient().is_any_processing(), "undo leaves flags alone");

        editor.recognize_document(a, &page(&[])).unwrap();
        assert!(!editor.transient().is_processing(a));
        editor.undo();
        assert!(
            !editor.transient().is_processing(a),
            "undo never resurrects a processing flag"
        );
    }

    #[test]
    fn failed_recognition_keeps_the_processing_flag() {
        let mut editor = Editor::new();
        let a = editor.add_document("a", None);
        editor.remove_document(a).unwrap();
        let b = editor.add_document("b", None);
        editor.set_processing(a, true);
        editor.set_processing(b, true);

        assert_eq!(
            editor.recognize_document(a, &page(&[])),
            Err(DocumentError::NotFound(a))
        );
        assert_eq!(
            editor.recognize_region(a, &page(&[])).map(|_| ()),
            Err(DocumentError::NotFound(a))
        );
        assert!(editor.transient().is_processing(a), "rejected results leave the job running");

        editor.recognize_region(b, &page(&[])).unwrap();
        assert!(!editor.transient().is_processing(b));
    }

    #[test]
    fn deleting_the_selected_node_clears_selection() {
        let mut editor = Editor::new();
        editor.open_document("a", None, Some(&page(&[Rect::new(1.0, 1.0, 5.0, 5.0)])));
        let graphic = editor.current_tree().unwrap().walk().nth(1).unwrap().id();
        editor.select_node(Some(graphic)).unwrap();
        assert_eq!(editor.state().selected(), Some(graphic));

        editor.delete_node(graphic).unwrap();
        assert_eq!(editor.state().selected(), None);
        editor.undo();
        assert_eq!(editor.state().selected(), Some(graphic));
    }
}
