// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An editing session: open a page, rearrange it, then walk back through history.
//!
//! Run with logging:
//! - `RUST_LOG=debug cargo run -p scriptorium_demos --example edit_session`

use scriptorium_document::{Editor, EditorConfig, PageImage};
use scriptorium_tree::{NodeChanges, NodeId, NodeKind, SourcePage, TreeStore};
use tracing_subscriber::EnvFilter;

const PAGE: &str = include_str!("../data/page.json");
const CONFIG: &str = include_str!("../data/config.json");

fn find(tree: &TreeStore, kind: NodeKind, source_id: &str) -> NodeId {
    tree.walk()
        .find(|n| n.kind() == kind && n.source_id() == Some(source_id))
        .map(|n| n.id())
        .expect("node is in the bundled page")
}

fn summary(editor: &Editor) {
    let tree = editor.current_tree().expect("document has a tree");
    println!(
        "  {} nodes, {} top-level regions, history {}/{}",
        tree.node_count(),
        tree.children_of(tree.root()).len(),
        editor.history().current_index() + 1,
        editor.history().len(),
    );
    println!("  text: {:?}", tree.text_of(tree.root()).expect("root is live"));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let page: SourcePage = serde_json::from_str(PAGE).expect("bundled page is valid JSON");
    let config: EditorConfig =
        serde_json::from_str(CONFIG).expect("bundled config is valid JSON");
    let mut editor = Editor::with_config(config);
    let doc = editor.open_document(
        "letter.png",
        Some(PageImage::new("file:///scans/letter.png", 1240, 1754)),
        Some(&page),
    );
    let image = editor
        .documents()
        .get(doc)
        .expect("just opened")
        .image()
        .expect("image attached");
    println!("opened {doc}, thumbnail {:?}", image.thumbnail_size());
    summary(&editor);

    let tree = editor.current_tree().unwrap();
    let sincerely = find(tree, NodeKind::Word, "word_1_5");
    let first_line = find(tree, NodeKind::Line, "line_1_1");
    let graphic = find(tree, NodeKind::Graphic, "graphic_1_2");

    // The closing block empties out and is pruned with its paragraph and line.
    let pruned = editor.move_node(sincerely, first_line, None).unwrap();
    println!("moved {sincerely}, pruned {pruned:?}");
    summary(&editor);

    editor
        .reposition_resize(graphic, 800.0, 600.0, Some(200.0), None)
        .unwrap();
    println!(
        "graphic now at {:?}",
        editor.current_tree().unwrap().get(graphic).unwrap().bbox()
    );

    editor
        .modify_node(sincerely, NodeChanges::text("Sincerely,"))
        .unwrap();
    summary(&editor);

    // Rejected edits leave history alone.
    let root = editor.current_tree().unwrap().root();
    if let Err(err) = editor.delete_node(root) {
        println!("rejected: {err}");
    }

    while editor.undo() {
        println!("undo");
        if editor.current_tree().is_ok() {
            summary(&editor);
        }
    }
    while editor.redo() {}
    println!("redone");
    summary(&editor);
}
