use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lutbox::image_pipeline::{apply_lut, ChannelOrder, LutSpec, RasterBuffer};

fn generate_raster(width: u32, height: u32, channels: usize) -> RasterBuffer {
    let mut data = Vec::with_capacity(width as usize * height as usize * channels);
    for y in 0..height {
        for x in 0..width {
            let value = ((x + y) % 256) as u8;
            data.extend_from_slice(&[value, value.wrapping_mul(3), value.wrapping_mul(7)]);
            if channels == 4 {
                data.push(255);
            }
        }
    }
    RasterBuffer::new(width, height, channels, ChannelOrder::Rgb, data).unwrap()
}

fn generate_lut(level: usize) -> LutSpec {
    let data: Vec<u8> = (0..level.pow(3) * 3).map(|i| (i % 256) as u8).collect();
    LutSpec::from_raw((level * level) as u32, level as u32, 3, data, 0).unwrap()
}

fn benchmark_apply_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_lut_by_size");
    let lut = generate_lut(33);

    let sizes = vec![
        (100, 100, "100x100"),
        (800, 600, "800x600"),
        (2000, 1500, "2000x1500"),
    ];

    for (width, height, label) in sizes {
        let raster = generate_raster(width, height, 3);
        group.bench_with_input(BenchmarkId::from_parameter(label), &raster, |b, raster| {
            b.iter(|| apply_lut(black_box(raster), &lut, ChannelOrder::Rgb));
        });
    }

    group.finish();
}

fn benchmark_apply_by_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_lut_by_layout");
    let lut = generate_lut(64);
    let rgb = generate_raster(800, 600, 3);
    let bgra = generate_raster(800, 600, 4).to_order(ChannelOrder::Bgr);

    group.bench_function("rgb", |b| {
        b.iter(|| apply_lut(black_box(&rgb), &lut, ChannelOrder::Rgb))
    });
    group.bench_function("bgra", |b| {
        b.iter(|| apply_lut(black_box(&bgra), &lut, ChannelOrder::Bgr))
    });

    group.finish();
}

criterion_group!(benches, benchmark_apply_by_size, benchmark_apply_by_layout);
criterion_main!(benches);
