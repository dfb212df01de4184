//! Benchmarks for cleanup and reconstruction throughput.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdftranscript::{
    reconstruct_text, CleanupPreset, DocumentReconstructor, LineClassifier, RenderOptions,
};
use pdftranscript::{DocumentStats, Line};

/// Builds raw page text that looks like a wrapped report page.
fn synthetic_page(sections: usize) -> String {
    let mut text = String::new();
    for i in 0..sections {
        text.push_str(&format!("SECTION {} OVERVIEW\n", i + 1));
        text.push_str("The committee reviewed the quarterly figures and noted that\n");
        text.push_str("spending stayed within the approved budget for the period.\n");
        text.push_str("- first recommendation for the board\n");
        text.push_str("- second recommendation for the board\n");
        text.push_str(&format!("{}\n\x0c", i + 1));
    }
    text
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");

    for sections in [1, 10, 50].iter() {
        let page = synthetic_page(*sections);
        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter(|| reconstruct_text(black_box(&page)));
        });
    }

    group.finish();
}

fn bench_cleanup_presets(c: &mut Criterion) {
    let page = synthetic_page(10);

    for preset in [
        CleanupPreset::Minimal,
        CleanupPreset::Standard,
        CleanupPreset::Aggressive,
    ] {
        let reconstructor =
            DocumentReconstructor::new(RenderOptions::new().with_cleanup_preset(preset));
        c.bench_function(&format!("cleanup_{:?}", preset).to_lowercase(), |b| {
            b.iter(|| reconstructor.reconstruct(black_box(&page)));
        });
    }
}

fn bench_classify(c: &mut Criterion) {
    let page = synthetic_page(10);
    let lines: Vec<Line> = pdftranscript::model::split_lines(&page);
    let stats = DocumentStats::from_lines(&lines);
    let classifier = LineClassifier::default();

    c.bench_function("classify_lines", |b| {
        b.iter(|| {
            for index in 0..lines.len() {
                black_box(classifier.classify(black_box(&lines), index, &stats));
            }
        });
    });
}

criterion_group!(benches, bench_reconstruct, bench_cleanup_presets, bench_classify);
criterion_main!(benches);
