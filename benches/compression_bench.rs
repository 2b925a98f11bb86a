use batch_squeeze::archive::{write_zip, PendingEntry};
use batch_squeeze::processing::compress_bytes;
use batch_squeeze::{
    compress, plan, CandidateFile, CompressionOptions, NullSink, ReferenceStore, Session,
    SessionConfig,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Arc;

fn create_test_image(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn bench_plan(c: &mut Criterion) {
    c.bench_function("plan", |b| {
        b.iter(|| plan(black_box(4032), black_box(3024)))
    });
}

fn bench_compress_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress_bytes");
    group.sample_size(10);

    for (width, height) in [(640, 480), (1920, 1080), (3000, 2000)] {
        let bytes = create_test_image(width, height);
        let options = CompressionOptions::default();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &bytes,
            |b, bytes| b.iter(|| compress_bytes("bench.png", black_box(bytes), &options)),
        );
    }

    group.finish();
}

fn bench_compress_async(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let file = CandidateFile::from_bytes("bench.png", create_test_image(800, 600), "image/png", 0);
    let options = CompressionOptions::default();
    let store = ReferenceStore::new();
    let (file, options, store) = (&file, &options, &store);

    c.bench_function("compress_async", |b| {
        b.to_async(&runtime).iter(|| async move {
            let artifact = compress(file, 0, options, store).await.unwrap();
            store.revoke(&artifact.reference);
        })
    });
}

fn bench_batch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let files: Vec<CandidateFile> = (0..8)
        .map(|i| {
            CandidateFile::from_bytes(format!("img{}.png", i), create_test_image(320, 240), "image/png", i)
        })
        .collect();
    let files = &files;

    let mut group = c.benchmark_group("run_batch");
    group.sample_size(10);
    group.bench_function("eight_files", |b| {
        b.to_async(&runtime).iter(|| async move {
            let session = Session::new(SessionConfig::immediate(), Arc::new(NullSink));
            session.add_files(files.clone());
            session.run_batch(80).await.unwrap()
        })
    });
    group.finish();
}

fn bench_write_zip(c: &mut Criterion) {
    let entries: Vec<PendingEntry> = (0..20)
        .map(|i| PendingEntry {
            path: format!("compressed_images/compressed_img{}.jpg", i),
            bytes: Arc::from(vec![(i % 256) as u8; 64 * 1024]),
        })
        .collect();

    c.bench_function("write_zip", |b| b.iter(|| write_zip(black_box(&entries))));
}

criterion_group!(
    benches,
    bench_plan,
    bench_compress_bytes,
    bench_compress_async,
    bench_batch,
    bench_write_zip
);
criterion_main!(benches);
