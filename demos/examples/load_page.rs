// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load a recognized page from JSON and print its tree.
//!
//! Run:
//! - `cargo run -p scriptorium_demos --example load_page`

use scriptorium_tree::{SourcePage, TreeStore};

const PAGE: &str = include_str!("../data/page.json");

fn main() {
    let page: SourcePage = serde_json::from_str(PAGE).expect("bundled page is valid JSON");
    let (root, tree) = TreeStore::build_from_page(&page);

    for node in tree.walk() {
        let depth = tree.ancestors(node.id()).count();
        let b = node.bbox();
        let offset = node.parent_relative_offset();
        print!(
            "{:indent$}{} {} [{} {} {} {}] +({}, {})",
            "",
            node.kind(),
            node.id(),
            b.x0,
            b.y0,
            b.x1,
            b.y1,
            offset.x,
            offset.y,
            indent = depth * 2,
        );
        if let Some(text) = node.text() {
            print!(" {text:?}");
        }
        if let Some(source) = node.source_id() {
            print!(" ({source})");
        }
        println!();
    }

    println!("nodes: {}", tree.node_count());
    println!("well formed: {:?}", tree.verify(true));
    println!("text:\n{}", tree.text_of(root).expect("root is live"));
}
