//! Annotation Benchmarks
//!
//! Normalization, rendering and PNG encoding for a typical ID card photo
//! with a full page of detections.
//!
//! Run with: `cargo bench --bench annotate`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;
use std::time::Duration;

use image::{ImageFormat, Rgb, RgbImage};

use idlens_server::annotate::{Annotator, SourceImage};
use idlens_server::detection::normalize;
use idlens_server::ocr::{block_type, NormalizedBox, RawBlock};

/// Grid of WORD blocks covering the page, like a dense ID card response
fn create_blocks(count: usize) -> Vec<RawBlock> {
    (0..count)
        .map(|i| {
            let column = (i % 8) as f64;
            let row = (i / 8) as f64;
            RawBlock::new(
                block_type::WORD,
                Some(&format!("WORD{}", i + 1)),
                NormalizedBox::new(0.02 + column * 0.12, 0.02 + row * 0.1, 0.1, 0.05),
            )
        })
        .collect()
}

fn create_source(width: u32, height: u32) -> SourceImage {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(width, height, Rgb([230, 230, 230]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode source image");
    SourceImage::decode(bytes).expect("Failed to decode source image")
}

/// Benchmark block normalization
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for count in [10usize, 60, 200] {
        let blocks = create_blocks(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &blocks, |b, blocks| {
            b.iter(|| {
                let detections = normalize(black_box(blocks), 1000, 800).expect("Failed to normalize");
                black_box(detections)
            })
        });
    }

    group.finish();
}

/// Benchmark rendering and PNG encoding
fn bench_annotate(c: &mut Criterion) {
    let annotator = Annotator::with_font_path(None).expect("Failed to load font");
    let source = create_source(1000, 800);
    let detections = normalize(&create_blocks(60), 1000, 800).expect("Failed to normalize");

    let mut group = c.benchmark_group("annotate");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("render_1000x800_60", |b| {
        b.iter(|| {
            let canvas = annotator
                .render(black_box(source.pixels()), &detections)
                .expect("Failed to render");
            black_box(canvas)
        })
    });

    group.bench_function("render_and_encode_1000x800_60", |b| {
        b.iter(|| {
            let annotated = annotator
                .annotate(black_box(&source), &detections)
                .expect("Failed to annotate");
            black_box(annotated.to_base64())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_annotate);
criterion_main!(benches);
