use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jpeg_transform::{Image, ImageCodec, YCbCr};

fn create_test_img(rows: usize, cols: usize) -> Image {
    Image::from_fn(rows, cols, |row, col| {
        YCbCr::new(
            ((row * 3 + col) % 256) as u8,
            ((row + col * 2) % 256) as u8,
            ((row * col) % 256) as u8,
        )
    })
}

fn criterion_benchmark(c: &mut Criterion) {
    let image = create_test_img(512, 768);
    let codec = ImageCodec::default();
    let streams = codec.encode(&image).unwrap();

    c.bench_function("encode 768x512", |b| {
        b.iter(|| codec.encode(black_box(&image)).unwrap())
    });

    c.bench_function("decode 768x512", |b| {
        b.iter(|| codec.decode(black_box(&streams), 512, 768).unwrap())
    });

    let codec16 = ImageCodec::new(16).unwrap();
    c.bench_function("encode 768x512 16x16 blocks", |b| {
        b.iter(|| codec16.encode(black_box(&image)).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
