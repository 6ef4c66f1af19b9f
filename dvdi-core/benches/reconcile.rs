//! Benchmarks for materialization and reconciliation
//!
//! Run with: cargo bench -p dvdi-core --bench reconcile

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dvdi_core::dom::{Document, LiveNode};
use dvdi_core::reconcile::{mount, reconcile, render};
use dvdi_core::vdom::{Child, Listener, Namespace, VNode};
use dvdi_core::h;

fn list(rows: usize, generation: usize, on_click: &Listener) -> VNode {
    let items: Vec<VNode> = (0..rows)
        .map(|i| {
            h!("li", { "className" => if (i + generation) % 3 == 0 { "hot" } else { "cold" } },
                h!("span", {}, format!("row {i}")),
                h!("button", { "onClick" => on_click.clone() }, "x")
            )
        })
        .collect();
    h!("ul", { "id" => "rows" }, items)
}

fn mounted(tree: &VNode) -> LiveNode {
    let doc = Document::new();
    let app = doc.create_element(Namespace::Html, "main").unwrap();
    mount(&app, tree).unwrap();
    app
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let on_click = Listener::new(|_| {});

    for rows in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let doc = Document::new();
            b.iter(|| {
                let tree = list(rows, 0, &on_click);
                render(&doc, black_box(&Child::from(tree))).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_unchanged(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_unchanged");
    let on_click = Listener::new(|_| {});

    for rows in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let node = list(rows, 0, &on_click);
            let app = mounted(&node);
            let tree = Child::from(node);
            b.iter(|| reconcile(&app, None, Some(&tree), Some(black_box(&tree)), 0).unwrap());
        });
    }

    group.finish();
}

fn bench_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_toggle");
    let on_click = Listener::new(|_| {});

    for rows in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let mut current = list(rows, 0, &on_click);
            let app = mounted(&current);
            let mut generation = 0;
            b.iter(|| {
                generation += 1;
                let next = list(rows, generation, &on_click);
                reconcile(&app, None, Some(&Child::from(&current)), Some(&Child::from(&next)), 0)
                    .unwrap();
                current = next;
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render, bench_unchanged, bench_toggle);
criterion_main!(benches);
