// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use scriptorium_tree::{
    EditPolicy, NodeId, NodeKind, SourceBlock, SourceLine, SourcePage, SourceParagraph,
    SourceRegion, SourceWord, TreeStore, WordData,
};

/// A page of `blocks` single-paragraph blocks, each with `lines` lines of `words` words.
fn gen_page(blocks: usize, lines: usize, words: usize) -> SourcePage {
    let mut page = SourcePage::new(Rect::new(0.0, 0.0, 2480.0, 3508.0));
    let mut row = 0.0;
    for _ in 0..blocks {
        let mut paragraph = SourceParagraph::default();
        for _ in 0..lines {
            let y = 40.0 + row * 24.0;
            row += 1.0;
            let words: Vec<SourceWord> = (0..words)
                .map(|k| {
                    let x = 40.0 + k as f64 * 70.0;
                    SourceWord {
                        bbox: Rect::new(x, y, x + 60.0, y + 18.0),
                        data: WordData {
                            text: format!("w{k}"),
                            ..WordData::default()
                        },
                        ..SourceWord::default()
                    }
                })
                .collect();
            let bbox = words
                .iter()
                .map(|w| w.bbox)
                .reduce(|a, b| a.union(b))
                .unwrap();
            paragraph.bbox = if paragraph.lines.is_empty() {
                bbox
            } else {
                paragraph.bbox.union(bbox)
            };
            paragraph.lines.push(SourceLine {
                bbox,
                words,
                ..SourceLine::default()
            });
        }
        page.regions.push(SourceRegion::Block(SourceBlock {
            bbox: paragraph.bbox,
            paragraphs: vec![paragraph],
            ..SourceBlock::default()
        }));
    }
    page
}

fn ids_of(tree: &TreeStore, kind: NodeKind) -> Vec<NodeId> {
    tree.walk().filter(|n| n.kind() == kind).map(|n| n.id()).collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &blocks in &[8_usize, 32, 128] {
        let page = gen_page(blocks, 6, 10);
        group.throughput(Throughput::Elements((blocks * 6 * 10) as u64));
        group.bench_function(format!("build_from_page_b{}", blocks), |b| {
            b.iter(|| black_box(TreeStore::build_from_page(&page)));
        });
    }
    group.finish();
}

fn bench_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("edits");
    let (_, tree) = TreeStore::build_from_page(&gen_page(32, 6, 10));
    let words = ids_of(&tree, NodeKind::Word);
    let lines = ids_of(&tree, NodeKind::Line);
    let blocks = ids_of(&tree, NodeKind::Block);

    group.bench_function("reposition_word_and_fit", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                let word = words[words.len() / 2];
                tree.reposition_resize(word, 500.0, 500.0, Some(90.0), None)
                    .unwrap();
                tree.shrink_wrap_ancestors(word).unwrap();
                black_box(tree);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("reposition_block", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                tree.reposition_resize(blocks[0], 100.0, 100.0, None, None)
                    .unwrap();
                black_box(tree);
            },
            BatchSize::SmallInput,
        );
    });

    // Moving every word of the first line out empties it, so the last move also prunes.
    group.bench_function("move_line_contents", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                let moving = tree.children_of(lines[0]).to_vec();
                for word in moving {
                    tree.move_node(word, lines[1], None, EditPolicy::default())
                        .unwrap();
                }
                black_box(tree);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("delete_cascade", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                let removed = tree.delete_node(blocks[blocks.len() - 1], EditPolicy::default());
                black_box(removed.unwrap().len());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let (_, tree) = TreeStore::build_from_page(&gen_page(128, 6, 10));
    c.bench_function("verify_with_containment", |b| {
        b.iter(|| black_box(tree.verify(true)));
    });
}

criterion_group!(benches, bench_build, bench_edits, bench_verify);
criterion_main!(benches);
