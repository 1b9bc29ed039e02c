//! Benchmarks for the per-frame detection pipeline
//!
//! The whole pass has to fit well inside the ~33 ms frame budget at camera
//! resolutions; these benches watch the three hot stages.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use face_tracker::config::Config;
use face_tracker::face_detection::FaceScanner;
use face_tracker::grayscale::rgba_to_luminance;
use face_tracker::pipeline::{DetectionPipeline, FrameProcessor, RgbaFrame};

/// Noisy RGBA frame with a face-like checker patch in the middle
fn synthetic_frame(width: usize, height: usize) -> RgbaFrame {
    let mut data = vec![0u8; width * height * 4];
    for (i, chunk) in data.chunks_exact_mut(4).enumerate() {
        let x = i % width;
        let y = i / width;
        let in_patch =
            x >= width / 2 - 50 && x < width / 2 + 50 && y >= height / 2 - 60 && y < height / 2 + 60;
        let value = if in_patch {
            if (x + y) % 2 == 0 {
                110
            } else {
                170
            }
        } else {
            40 + (rand::random::<u8>() % 20)
        };
        chunk[0] = value;
        chunk[1] = value;
        chunk[2] = value;
        chunk[3] = 255;
    }
    RgbaFrame { data, width, height }
}

fn benchmark_grayscale(c: &mut Criterion) {
    let mut group = c.benchmark_group("grayscale");

    for (width, height) in [(320, 240), (640, 480), (1280, 720)] {
        let frame = synthetic_frame(width, height);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &frame,
            |b, frame| {
                b.iter(|| rgba_to_luminance(black_box(&frame.data), frame.width, frame.height).unwrap());
            },
        );
    }

    group.finish();
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_scan");

    let scanner = FaceScanner::default();
    for (width, height) in [(320, 240), (640, 480)] {
        let frame = synthetic_frame(width, height);
        let gray = rgba_to_luminance(&frame.data, frame.width, frame.height).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &gray,
            |b, gray| {
                b.iter(|| black_box(scanner.scan(black_box(gray))));
            },
        );
    }

    group.finish();
}

fn benchmark_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");

    let pipeline = DetectionPipeline::new(&Config::default());
    for (width, height) in [(320, 240), (640, 480)] {
        let frame = synthetic_frame(width, height);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &frame,
            |b, frame| {
                b.iter(|| pipeline.process(black_box(frame)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_grayscale, benchmark_scan, benchmark_full_pipeline);
criterion_main!(benches);
