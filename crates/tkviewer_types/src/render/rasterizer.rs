//! Palette-indexed frame rasterization.
//!
//! Sprite frames store one palette index per pixel plus a visibility stencil;
//! turning one into RGBA is a pure function of the frame, the palette file,
//! the sub-palette selected for the asset, and a color-cycle offset.
//!
//! The cycle offset is added to every raw index with byte wraparound before
//! the palette lookup. Cycled assets (water, torches) animate by shifting the
//! offset over time while their pixel data stays fixed. An offset of 256 is
//! therefore identical to 0.
//!
//! Empty frames (zero width or height) rasterize to a fixed-size transparent
//! placeholder so callers can tile results without special cases.
//!
//! ## Example
//!
//! ```no_run
//! use tkviewer_types::file::{epf, pal};
//! use tkviewer_types::render::rasterize;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sheet = epf::File::open("tile0.epf")?;
//! let palettes = pal::File::open("tile.pal")?;
//!
//! let frame = sheet.frame(0)?;
//! let image = rasterize(&frame, &palettes, 0, 0);
//! println!("rendered {image}");
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use crate::file::epf::Frame;
use crate::file::pal;
use crate::render::RasterImage;

/// Edge length of the placeholder image produced for empty frames.
///
/// Matches the client's ground tile size so placeholders slot into tile grids.
pub const PLACEHOLDER_DIM: u32 = 48;

/// Rasterizes a sprite frame to an RGBA image.
///
/// # Arguments
///
/// * `frame` - Decoded sprite frame
/// * `palettes` - Palette file supplying colors
/// * `sub_palette` - Sub-palette index; out-of-range values clamp to 0
/// * `cycle_offset` - Color-cycle offset, applied modulo 256
///
/// Pixels whose stencil bit is clear come out fully transparent no matter
/// what the palette says; visible pixels keep the palette color's own alpha.
pub fn rasterize(frame: &Frame, palettes: &pal::File, sub_palette: usize, cycle_offset: i32) -> RasterImage {
	let width = frame.width();
	let height = frame.height();
	if width == 0 || height == 0 {
		return RasterImage::blank(PLACEHOLDER_DIM, PLACEHOLDER_DIM);
	}

	let offset = cycle_offset.rem_euclid(256) as u8;
	let raw = frame.pixels();
	let mut pixels = vec![0u8; width * height * 4];

	for (index, rgba) in pixels.chunks_exact_mut(4).enumerate() {
		if !frame.is_visible(index) {
			continue;
		}
		let effective = raw[index].wrapping_add(offset);
		let color = palettes.color_at(sub_palette, effective);
		rgba[0] = color.r;
		rgba[1] = color.g;
		rgba[2] = color.b;
		rgba[3] = color.a;
	}

	RasterImage::new(width as u32, height as u32, pixels)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
	frame: usize,
	sub_palette: usize,
	cycle_offset: i32,
}

/// Cache of rasterized frames keyed by frame index, sub-palette, and cycle
/// offset.
///
/// The cache never observes sheet or palette mutation on its own; whoever
/// mutates the owning data must call [`RenderCache::invalidate`] or
/// [`RenderCache::clear`], otherwise stale images keep being served.
#[derive(Debug, Clone, Default)]
pub struct RenderCache {
	images: HashMap<CacheKey, RasterImage>,
}

impl RenderCache {
	/// Creates an empty cache
	pub fn new() -> Self {
		Self::default()
	}

	fn key(frame: usize, sub_palette: usize, cycle_offset: i32) -> CacheKey {
		CacheKey {
			frame,
			sub_palette,
			cycle_offset: cycle_offset.rem_euclid(256),
		}
	}

	/// Looks up a cached image.
	///
	/// Cycle offsets are normalized, so a hit at offset 0 is also a hit at
	/// offset 256.
	pub fn get(&self, frame: usize, sub_palette: usize, cycle_offset: i32) -> Option<&RasterImage> {
		self.images.get(&Self::key(frame, sub_palette, cycle_offset))
	}

	/// Stores a rasterized image
	pub fn insert(&mut self, frame: usize, sub_palette: usize, cycle_offset: i32, image: RasterImage) {
		self.images.insert(Self::key(frame, sub_palette, cycle_offset), image);
	}

	/// Drops every cached image for one frame index
	pub fn invalidate(&mut self, frame: usize) {
		self.images.retain(|key, _| key.frame != frame);
	}

	/// Drops all cached images
	pub fn clear(&mut self) {
		self.images.clear();
	}

	/// Returns the number of cached images
	pub fn len(&self) -> usize {
		self.images.len()
	}

	/// Returns true if nothing is cached
	pub fn is_empty(&self) -> bool {
		self.images.is_empty()
	}
}
