//! Shared synthetic-data builders for the integration tests.

use std::sync::Once;

use tkviewer_rs::prelude::*;

pub const RED: Color = Color::rgb(255, 0, 0);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const BLUE: Color = Color::rgb(0, 0, 255);

static INIT: Once = Once::new();

/// Initialize the logger once for the whole test binary, with the default
/// level set to info if `RUST_LOG` is not set.
pub fn init_logging() {
	INIT.call_once(|| {
		let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
			.is_test(true)
			.try_init();
	});
}

/// Frame geometry (top, left, bottom, right) plus its pixel and stencil
/// segments.
pub type FrameSpec = (i16, i16, i16, i16, Vec<u8>, Vec<u8>);

/// A square frame filled with one palette index, fully visible.
pub fn solid_frame(top: i16, left: i16, size: i16, index: u8) -> FrameSpec {
	let pixel_count = size as usize * size as usize;
	(
		top,
		left,
		top + size,
		left + size,
		vec![index; pixel_count],
		vec![0xFF; pixel_count.div_ceil(8)],
	)
}

/// Serializes a sprite sheet whose segments are laid out back to back.
pub fn sheet_bytes(frames: &[FrameSpec]) -> Vec<u8> {
	let mut data = Vec::new();
	let mut descriptors = Vec::with_capacity(frames.len());
	for (top, left, bottom, right, pixels, stencil) in frames {
		let pixel_offset = data.len() as u32;
		data.extend_from_slice(pixels);
		let stencil_offset = data.len() as u32;
		data.extend_from_slice(stencil);
		descriptors.push((*top, *left, *bottom, *right, pixel_offset, stencil_offset));
	}

	let width = frames.iter().map(|f| (f.3 - f.1).max(0) as u16).max().unwrap_or(0);
	let height = frames.iter().map(|f| (f.2 - f.0).max(0) as u16).max().unwrap_or(0);

	let mut bytes = Vec::new();
	bytes.extend_from_slice(&(frames.len() as u16).to_le_bytes());
	bytes.extend_from_slice(&width.to_le_bytes());
	bytes.extend_from_slice(&height.to_le_bytes());
	bytes.extend_from_slice(&0u16.to_le_bytes());
	bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
	bytes.extend_from_slice(&data);
	for (top, left, bottom, right, pixel_offset, stencil_offset) in descriptors {
		bytes.extend_from_slice(&top.to_le_bytes());
		bytes.extend_from_slice(&left.to_le_bytes());
		bytes.extend_from_slice(&bottom.to_le_bytes());
		bytes.extend_from_slice(&right.to_le_bytes());
		bytes.extend_from_slice(&pixel_offset.to_le_bytes());
		bytes.extend_from_slice(&stencil_offset.to_le_bytes());
	}
	bytes
}

/// Palette store with primaries in the low indices.
///
/// Sub-palette 0 maps 1 to red, 2 to green, 3 to blue; sub-palette 1 swaps
/// red and blue so palette selection shows up in rendered pixels.
pub fn two_tone_palettes() -> PalFile {
	let mut base = Palette::new();
	base.set(1, RED);
	base.set(2, GREEN);
	base.set(3, BLUE);

	let mut alt = Palette::new();
	alt.set(1, BLUE);
	alt.set(2, GREEN);
	alt.set(3, RED);

	let mut file = PalFile::from_palette(base);
	file.push_palette(alt);
	file
}

/// One-chunk descriptor whose blocks are (frame offset, duration) pairs.
pub fn descriptor(base_frame: u32, palette_id: u32, blocks: &[(i32, i32)]) -> Descriptor {
	Descriptor {
		base_frame,
		marker: 0,
		palette_id,
		chunks: vec![Chunk::new(
			blocks.iter().map(|&(offset, duration)| Block::new(offset, duration)).collect(),
		)],
	}
}
