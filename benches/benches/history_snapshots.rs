// Copyright 2025 the Scriptorium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use scriptorium_document::Editor;
use scriptorium_history::History;
use scriptorium_tree::{NodeChanges, NodeKind, SourceGraphic, SourcePage, SourceRegion};

/// A page of `count` graphic regions laid out on a grid.
fn gen_page(count: usize) -> SourcePage {
    let mut page = SourcePage::new(Rect::new(0.0, 0.0, 4000.0, 4000.0));
    for i in 0..count {
        let x = (i % 64) as f64 * 60.0;
        let y = (i / 64) as f64 * 60.0;
        page.regions.push(SourceRegion::Graphic(SourceGraphic {
            id: None,
            bbox: Rect::new(x, y, x + 50.0, y + 50.0),
        }));
    }
    page
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");
    group.bench_function("apply_evicting_u64", |b| {
        b.iter_batched(
            || History::new(0_u64),
            |mut history| {
                for _ in 0..200 {
                    history
                        .apply(|n| -> Result<(), ()> {
                            *n += 1;
                            Ok(())
                        })
                        .unwrap();
                }
                black_box(history.len());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_editor(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor");
    for &count in &[64_usize, 1024] {
        let page = gen_page(count);
        let mut editor = Editor::new();
        let active = editor.open_document("bench.png", None, Some(&page));
        editor.open_document("idle.png", None, Some(&page));
        editor.select_document(active).unwrap();
        let graphics: Vec<_> = editor
            .current_tree()
            .unwrap()
            .walk()
            .filter(|n| n.kind() == NodeKind::Graphic)
            .map(|n| n.id())
            .collect();

        // Each edit copies the current tree once; the idle document stays shared.
        group.bench_function(format!("toggle_expanded_n{}", count), |b| {
            let mut toggle = false;
            b.iter(|| {
                toggle = !toggle;
                editor
                    .modify_node(graphics[0], NodeChanges::expanded(toggle))
                    .unwrap();
                black_box(editor.can_undo());
            });
        });

        group.bench_function(format!("reposition_n{}", count), |b| {
            b.iter_batched(
                || {
                    let mut editor = Editor::new();
                    editor.open_document("bench.png", None, Some(&page));
                    editor
                },
                |mut editor| {
                    for (i, &id) in graphics.iter().take(40).enumerate() {
                        editor
                            .reposition_resize(id, i as f64, 3000.0, None, None)
                            .unwrap();
                    }
                    black_box(editor.history().len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_history, bench_editor);
criterion_main!(benches);
