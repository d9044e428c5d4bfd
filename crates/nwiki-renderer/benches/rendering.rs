//! Benchmarks for wiki markup rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nwiki_renderer::WikiRenderer;

/// Generate wiki markup with the given structure.
fn generate_page(sections: usize, paragraphs_per_section: usize) -> String {
    let mut page = String::with_capacity(sections * paragraphs_per_section * 200);
    page.push_str("= Document Title =\n\n");

    for i in 0..sections {
        page.push_str(&format!("== Section {i} ==\n\n"));
        for j in 0..paragraphs_per_section {
            page.push_str(&format!(
                "Paragraph {j} in section {i} with ''bold'' and '''italic''' text, \
                 a [[Page {i}|link]] and http://example.com/{i}/{j} inline.\n\n"
            ));
        }
        page.push_str("* first item\n* second item\n** nested item\n\n");
    }

    page.push_str("{|\n! Name !! Value\n|-\n| a || 1\n|-\n| b || 2\n|}\n");
    page
}

fn bench_render_simple(c: &mut Criterion) {
    let renderer = WikiRenderer::new();

    c.bench_function("render_simple_page", |b| {
        b.iter(|| renderer.render("= Hello =\n\nSimple ''content''.\n\n"));
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let renderer = WikiRenderer::new();
    let mut group = c.benchmark_group("render_page_size");

    for sections in [1, 10, 50] {
        let page = generate_page(sections, 3);
        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &page, |b, page| {
            b.iter(|| renderer.render(page));
        });
    }

    group.finish();
}

fn bench_render_table_heavy(c: &mut Criterion) {
    let renderer = WikiRenderer::new();
    let mut table = String::from("{|\n! A !! B !! C\n");
    for i in 0..100 {
        table.push_str(&format!("|-\n| {i} || {} || {}\n", i * 2, i * 3));
    }
    table.push_str("|}\n");

    c.bench_function("render_table_100_rows", |b| {
        b.iter(|| renderer.render(&table));
    });
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_render_varying_sizes,
    bench_render_table_heavy
);
criterion_main!(benches);
