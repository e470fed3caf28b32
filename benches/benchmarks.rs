//! Benchmarks for the pagination pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mini_pager::layout::{calculate_page_breaks, measure_blocks, PackingPolicy};
use mini_pager::render::DecorationRenderer;
use mini_pager::{
    BlockMeasurement, Document, EditOp, PageTemplate, Paginator, Rect, TemplateCatalog,
    TypesetSurface,
};

fn letter() -> PageTemplate {
    TemplateCatalog::builtin()
        .get("letter")
        .cloned()
        .unwrap_or_else(|_| PageTemplate::new("letter", "8.5in", "11in", "1in"))
}

fn manuscript(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| match i % 12 {
            0 => format!("# Chapter {}", i / 12 + 1),
            5 => "- a short list item".to_string(),
            _ => format!(
                "Paragraph {} contains enough text to span multiple lines \
                 and test the line breaking algorithm.",
                i
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn synthetic_measurements(count: usize) -> Vec<BlockMeasurement> {
    let mut pos = 0;
    (0..count)
        .map(|i| {
            let start_pos = pos;
            pos += 40 + i % 17;
            BlockMeasurement {
                start_pos,
                end_pos: pos,
                height: 24.0 + (i % 7) as f32 * 24.0,
            }
        })
        .collect()
}

fn bench_page_breaks(c: &mut Criterion) {
    let geometry = letter().geometry();
    let policy = PackingPolicy::default();
    let measurements = synthetic_measurements(10_000);

    c.bench_function("page_breaks_10k_blocks", |b| {
        b.iter(|| {
            black_box(calculate_page_breaks(
                black_box(&measurements),
                &geometry,
                &policy,
            ));
        });
    });
}

fn bench_measure_blocks(c: &mut Criterion) {
    let template = letter();
    let geometry = template.geometry();
    let surface = TypesetSurface::new(&geometry, &template.typography);
    let document = Document::from_text(&manuscript(500));

    c.bench_function("measure_500_blocks", |b| {
        b.iter(|| {
            black_box(measure_blocks(&document, &surface).ok());
        });
    });
}

fn bench_recompute(c: &mut Criterion) {
    let template = letter();
    let surface = TypesetSurface::new(&template.geometry(), &template.typography);
    let mut document = Document::from_text(&manuscript(500));
    let mut paginator = Paginator::new(template);

    c.bench_function("recompute_after_edit", |b| {
        b.iter(|| {
            document.apply_edit(EditOp::set_text(3, "edited"));
            black_box(paginator.recompute(&document, &surface));
        });
    });
}

fn bench_decoration_diff(c: &mut Criterion) {
    let geometry = letter().geometry();
    let policy = PackingPolicy::default();
    let before = calculate_page_breaks(&synthetic_measurements(2_000), &geometry, &policy);
    let mut shifted = synthetic_measurements(2_001);
    shifted.remove(0);
    let after = calculate_page_breaks(&shifted, &geometry, &policy);

    c.bench_function("decoration_diff_shifted_breaks", |b| {
        let mut renderer = DecorationRenderer::new();
        let mut generation = 0;
        b.iter(|| {
            generation += 2;
            black_box(renderer.render(&before, false, generation));
            black_box(renderer.render(&after, false, generation + 1));
        });
    });
}

fn bench_preview_visible(c: &mut Criterion) {
    let template = letter();
    let surface = TypesetSurface::new(&template.geometry(), &template.typography);
    let document = Document::from_text(&manuscript(2_000));
    let mut paginator = Paginator::new(template);
    paginator.recompute(&document, &surface);
    let viewport = Rect::new(0.0, 20_000.0, 816.0, 1056.0);

    c.bench_function("preview_visible_pages", |b| {
        b.iter(|| {
            let preview = paginator.preview();
            black_box(preview.visible(viewport).count());
        });
    });
}

criterion_group!(
    benches,
    bench_page_breaks,
    bench_measure_blocks,
    bench_recompute,
    bench_decoration_diff,
    bench_preview_visible,
);

criterion_main!(benches);
