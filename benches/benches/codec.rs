//! Benchmark suite for archive, codec, and render paths
//!
//! This benchmark measures the decode throughput of the container and codec
//! layers and the cost of rasterizing and compositing frames, which is where
//! a viewer spends its time when paging through a client's data set.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use tkviewer_benches::{
	generate_archive_data, generate_palette_data, generate_sheet_data, generate_table_data, sizes,
};
use tkviewer_types::file::{dat, dna, epf, pal};
use tkviewer_types::render::{MobRenderer, TileRenderer, rasterize};

/// Benchmark archive decoding across entry counts
fn bench_archive_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("dat_decode");

	for entry_count in [16usize, 128, 1024] {
		let data = generate_archive_data(entry_count, 4096);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", entry_count), &data, |b, data| {
			b.iter(|| {
				let result = dat::File::from_bytes(black_box(data));
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark sprite sheet decoding across frame sizes
fn bench_sheet_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("epf_decode");

	for dim in [sizes::ICON, sizes::TILE, sizes::MOB, sizes::EFFECT] {
		let data = generate_sheet_data(8, dim);
		let pixels = 8 * dim as u64 * dim as u64;
		group.throughput(Throughput::Elements(pixels));
		group.bench_with_input(
			BenchmarkId::new("decode", format!("{dim}x{dim}")),
			&data,
			|b, data| {
				b.iter(|| {
					let result = epf::File::from_bytes(black_box(data));
					black_box(result)
				});
			},
		);
	}

	group.finish();
}

/// Benchmark frame extraction from a decoded sheet
fn bench_frame_extraction(c: &mut Criterion) {
	let mut group = c.benchmark_group("epf_frames");

	let sheet = epf::File::from_bytes(&generate_sheet_data(32, sizes::TILE)).unwrap();

	group.throughput(Throughput::Elements(sheet.frame_count() as u64));
	group.bench_function("extract_all", |b| {
		b.iter(|| {
			for frame in black_box(&sheet).frames() {
				black_box(frame.unwrap());
			}
		});
	});

	group.finish();
}

/// Benchmark palette store decoding
fn bench_palette_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("pal_decode");

	for sub_palettes in [1usize, 8, 64] {
		let data = generate_palette_data(sub_palettes);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", sub_palettes), &data, |b, data| {
			b.iter(|| {
				let result = pal::File::from_bytes(black_box(data));
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark descriptor table decoding
fn bench_table_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("dna_decode");

	for descriptors in [64usize, 512] {
		let data = generate_table_data(descriptors, 4, 8, 64);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", descriptors), &data, |b, data| {
			b.iter(|| {
				let result = dna::File::from_bytes(black_box(data), dna::Kind::Mob);
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark frame rasterization across frame sizes
fn bench_rasterize(c: &mut Criterion) {
	let mut group = c.benchmark_group("rasterize");

	let palettes = pal::File::from_bytes(&generate_palette_data(4)).unwrap();
	for dim in [sizes::ICON, sizes::TILE, sizes::MOB, sizes::EFFECT] {
		let sheet = epf::File::from_bytes(&generate_sheet_data(1, dim)).unwrap();
		let frame = sheet.frame(0).unwrap();

		group.throughput(Throughput::Elements(dim as u64 * dim as u64));
		group.bench_with_input(
			BenchmarkId::new("frame", format!("{dim}x{dim}")),
			&frame,
			|b, frame| {
				b.iter(|| black_box(rasterize(black_box(frame), &palettes, 0, 0)));
			},
		);
	}

	group.finish();
}

/// Benchmark the render cache on cold and hot paths
fn bench_render_cache(c: &mut Criterion) {
	let mut group = c.benchmark_group("render_cache");

	let sheets = vec![epf::File::from_bytes(&generate_sheet_data(8, sizes::TILE)).unwrap()];
	let palettes = pal::File::from_bytes(&generate_palette_data(1)).unwrap();

	group.bench_function("cold", |b| {
		b.iter(|| {
			let mut renderer = TileRenderer::new(sheets.clone(), palettes.clone());
			for index in 0..8 {
				black_box(renderer.render(index, 0));
			}
		});
	});

	group.bench_function("hot", |b| {
		let mut renderer = TileRenderer::new(sheets.clone(), palettes.clone());
		for index in 0..8 {
			renderer.render(index, 0);
		}
		b.iter(|| {
			for index in 0..8 {
				black_box(renderer.render(index, 0));
			}
		});
	});

	group.finish();
}

/// Benchmark animation compositing end to end
fn bench_compose(c: &mut Criterion) {
	let mut group = c.benchmark_group("compose");
	group.sample_size(50); // Fewer samples for the larger workload

	let table = dna::File::from_bytes(&generate_table_data(1, 4, 16, 8), dna::Kind::Mob).unwrap();
	let sheets = vec![epf::File::from_bytes(&generate_sheet_data(8, sizes::MOB)).unwrap()];
	let palettes = pal::File::from_bytes(&generate_palette_data(1)).unwrap();

	let mut renderer = MobRenderer::new(table, sheets, palettes);
	group.bench_function("mob_animation", |b| {
		b.iter(|| black_box(renderer.render_animation(0).unwrap()));
	});

	group.finish();
}

criterion_group!(
	benches,
	bench_archive_decode,
	bench_sheet_decode,
	bench_frame_extraction,
	bench_palette_decode,
	bench_table_decode,
	bench_rasterize,
	bench_render_cache,
	bench_compose,
);

criterion_main!(benches);
