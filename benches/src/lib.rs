//! Benchmark helper utilities for tkviewer-rs
//!
//! This module provides utilities for generating synthetic game data and
//! common benchmark helpers for the tkviewer-rs project.
//!
//! No real client files ship with the repository, so every workload is
//! generated: sheets carry a per-frame index pattern, palettes a hue ramp,
//! and archives pack the generated payloads back to back. The shapes mirror
//! what the client actually loads (48x48 ground tiles, multi-frame mob
//! sheets, palette stores with a handful of sub-palettes).

use tkviewer_types::file::{dat, dna, pal};

/// Generates a sprite sheet with `frame_count` square frames of `dim` pixels
///
/// Every pixel is visible and carries a rolling palette index, which makes
/// the rasterizer touch the whole palette during a decode benchmark.
pub fn generate_sheet_data(frame_count: usize, dim: u16) -> Vec<u8> {
	let pixel_count = dim as usize * dim as usize;

	let mut data = Vec::new();
	let mut descriptors = Vec::with_capacity(frame_count);
	for frame in 0..frame_count {
		let pixel_offset = data.len() as u32;
		data.extend((0..pixel_count).map(|i| ((i + frame) % 256) as u8));
		let stencil_offset = data.len() as u32;
		data.extend(std::iter::repeat_n(0xFFu8, pixel_count.div_ceil(8)));
		descriptors.push((pixel_offset, stencil_offset));
	}

	let mut bytes = Vec::new();
	bytes.extend_from_slice(&(frame_count as u16).to_le_bytes());
	bytes.extend_from_slice(&dim.to_le_bytes());
	bytes.extend_from_slice(&dim.to_le_bytes());
	bytes.extend_from_slice(&0u16.to_le_bytes());
	bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
	bytes.extend_from_slice(&data);
	for (pixel_offset, stencil_offset) in descriptors {
		bytes.extend_from_slice(&0i16.to_le_bytes());
		bytes.extend_from_slice(&0i16.to_le_bytes());
		bytes.extend_from_slice(&(dim as i16).to_le_bytes());
		bytes.extend_from_slice(&(dim as i16).to_le_bytes());
		bytes.extend_from_slice(&pixel_offset.to_le_bytes());
		bytes.extend_from_slice(&stencil_offset.to_le_bytes());
	}
	bytes
}

/// Generates a palette store with `sub_palettes` hue-ramp sub-palettes
pub fn generate_palette_data(sub_palettes: usize) -> Vec<u8> {
	let mut file = pal::File::new();
	for shift in 0..sub_palettes {
		let mut palette = pal::Palette::new();
		for index in 0..=255u8 {
			let value = index.wrapping_add(shift as u8);
			palette.set(
				index,
				pal::Color::rgb(value, value.wrapping_mul(2), value.wrapping_mul(3)),
			);
		}
		file.push_palette(palette);
	}
	file.to_bytes()
}

/// Generates an archive with `entry_count` payloads of `entry_size` bytes
pub fn generate_archive_data(entry_count: usize, entry_size: usize) -> Vec<u8> {
	let mut archive = dat::File::new();
	for i in 0..entry_count {
		archive.put(format!("entry{i:04}.epf"), vec![(i % 256) as u8; entry_size]);
	}
	archive.to_bytes()
}

/// Generates a mob descriptor table
///
/// Each descriptor gets `chunks` chunks of `blocks` blocks, with frame
/// offsets cycling over `frame_count` so a compositing benchmark hits every
/// generated frame.
pub fn generate_table_data(descriptors: usize, chunks: usize, blocks: usize, frame_count: usize) -> Vec<u8> {
	let mut table = dna::File::new(dna::Kind::Mob);
	for _ in 0..descriptors {
		let mut descriptor = dna::Descriptor {
			base_frame: 0,
			marker: 0,
			palette_id: 0,
			chunks: Vec::with_capacity(chunks),
		};
		for chunk in 0..chunks {
			let blocks = (0..blocks)
				.map(|block| dna::Block::new(((chunk + block) % frame_count.max(1)) as i32, 100))
				.collect();
			descriptor.chunks.push(dna::Chunk::new(blocks));
		}
		table.push_descriptor(descriptor);
	}
	table.to_bytes()
}

/// Common frame dimensions for synthetic test data
pub mod sizes {
	/// Inventory icon frame: 24x24 (576 pixels)
	pub const ICON: u16 = 24;
	/// Ground tile frame: 48x48 (2,304 pixels) - the client's native tile size
	pub const TILE: u16 = 48;
	/// Mob frame: 128x128 (16,384 pixels)
	pub const MOB: u16 = 128;
	/// Full-screen effect frame: 256x256 (65,536 pixels)
	pub const EFFECT: u16 = 256;
}

#[cfg(test)]
mod tests {
	use super::*;
	use tkviewer_types::file::epf;

	#[test]
	fn test_generate_sheet_data() {
		let data = generate_sheet_data(4, sizes::TILE);
		let sheet = epf::File::from_bytes(&data).unwrap();

		assert_eq!(sheet.frame_count(), 4);
		assert_eq!(sheet.width(), sizes::TILE);

		let frame = sheet.frame(3).unwrap();
		assert_eq!(frame.width(), sizes::TILE as usize);
		assert!(frame.is_visible(0));
	}

	#[test]
	fn test_generate_palette_data() {
		let data = generate_palette_data(8);
		let palettes = pal::File::from_bytes(&data).unwrap();
		assert_eq!(palettes.sub_palette_count(), 8);
	}

	#[test]
	fn test_generate_archive_data() {
		let data = generate_archive_data(16, 512);
		let archive = dat::File::from_bytes(&data).unwrap();
		assert_eq!(archive.len(), 16);
		assert_eq!(archive.entries()[0].size(), 512);
	}

	#[test]
	fn test_generate_table_data() {
		let data = generate_table_data(4, 2, 8, 16);
		let table = dna::File::from_bytes(&data, dna::Kind::Mob).unwrap();
		assert_eq!(table.len(), 4);
		assert_eq!(table.get(0).unwrap().chunks.len(), 2);
	}
}
