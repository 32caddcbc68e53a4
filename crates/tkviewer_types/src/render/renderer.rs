//! Asset renderers tying sheets, palettes, and descriptor tables together.
//!
//! Each renderer owns the files one asset family needs and a [`RenderCache`]
//! for the frames it has already rasterized. Frame indices are global across
//! the owned sheets, in sheet order, the way the client numbers them.
//!
//! Renderers never fail on missing or corrupt frames; those render as the
//! fixed-size transparent placeholder so a viewer can keep paging through an
//! imperfect data set.
//!
//! ## Example
//!
//! ```no_run
//! use tkviewer_types::file::{dna, epf, pal};
//! use tkviewer_types::render::MobRenderer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = dna::File::open("mon.dna", dna::Kind::Mob)?;
//! let sheets = vec![epf::File::open("mon0.epf")?];
//! let palettes = pal::File::open("mon.pal")?;
//!
//! let mut renderer = MobRenderer::new(table, sheets, palettes);
//! let animation = renderer.render_animation(0)?;
//! println!("{} step(s)", animation.len());
//! # Ok(())
//! # }
//! ```

use crate::file::dna::{self, Chunk, Descriptor};
use crate::file::epf::{self, Frame, FrameEntry};
use crate::file::pal::{self, Quantizer};
use crate::file::{FileType, TkFileError};
use crate::render::compositor::{TimedImage, aggregate, place_frame};
use crate::render::pivot::PivotBounds;
use crate::render::raster::RasterImage;
use crate::render::rasterizer::{PLACEHOLDER_DIM, RenderCache, rasterize};

/// Resolves a global frame index to (sheet index, frame index within sheet)
fn locate_frame(sheets: &[epf::File], index: usize) -> Option<(usize, usize)> {
	let mut base = 0;
	for (sheet_index, sheet) in sheets.iter().enumerate() {
		let count = sheet.frame_count();
		if index < base + count {
			return Some((sheet_index, index - base));
		}
		base += count;
	}
	None
}

/// Returns the descriptor record of a global frame, if it exists
fn entry_at(sheets: &[epf::File], index: usize) -> Option<FrameEntry> {
	let (sheet, frame) = locate_frame(sheets, index)?;
	sheets[sheet].get_entry(frame).copied()
}

/// Slices the frame behind a global index, if it exists and is intact
fn frame_at(sheets: &[epf::File], index: usize) -> Option<Frame> {
	let (sheet, frame) = locate_frame(sheets, index)?;
	sheets[sheet].frame(frame).ok()
}

fn total_frames(sheets: &[epf::File]) -> usize {
	sheets.iter().map(epf::File::frame_count).sum()
}

/// Rasterizes one frame through the cache
fn render_cached(
	cache: &mut RenderCache,
	palettes: &pal::File,
	frame: &Frame,
	global_index: usize,
	sub_palette: usize,
	cycle_offset: i32,
) -> RasterImage {
	if let Some(hit) = cache.get(global_index, sub_palette, cycle_offset) {
		return hit.clone();
	}
	let image = rasterize(frame, palettes, sub_palette, cycle_offset);
	cache.insert(global_index, sub_palette, cycle_offset, image.clone());
	image
}

/// Renders a global frame index, falling back to the placeholder when the
/// index resolves to nothing usable
fn render_global(
	cache: &mut RenderCache,
	sheets: &[epf::File],
	palettes: &pal::File,
	global_index: usize,
	sub_palette: usize,
	cycle_offset: i32,
) -> RasterImage {
	match frame_at(sheets, global_index) {
		Some(frame) => render_cached(cache, palettes, &frame, global_index, sub_palette, cycle_offset),
		None => RasterImage::blank(PLACEHOLDER_DIM, PLACEHOLDER_DIM),
	}
}

/// Renders one chunk of a descriptor as a timed sequence on its pivot canvas.
///
/// Blocks whose frame cannot be resolved are skipped; a chunk where every
/// block skips yields an empty sequence, which downstream merging treats as
/// nothing to display.
fn render_chunk_sequence(
	cache: &mut RenderCache,
	sheets: &[epf::File],
	palettes: &pal::File,
	descriptor: &Descriptor,
	chunk: &Chunk,
) -> Vec<TimedImage> {
	let entries: Vec<FrameEntry> = chunk
		.blocks
		.iter()
		.filter_map(|block| descriptor.frame_index(block))
		.filter_map(|global| entry_at(sheets, global))
		.collect();
	let bounds = PivotBounds::from_entries(entries.iter());
	let sub_palette = descriptor.palette_id as usize;

	let mut sequence = Vec::new();
	for block in &chunk.blocks {
		let Some(global) = descriptor.frame_index(block) else {
			continue;
		};
		let Some(frame) = frame_at(sheets, global) else {
			continue;
		};

		let image = render_cached(cache, palettes, &frame, global, sub_palette, 0);
		let placed = place_frame(&bounds, frame.entry(), &image);
		sequence.push(TimedImage::new(placed, block.duration.max(0) as u32));
	}

	sequence
}

fn render_descriptor(
	cache: &mut RenderCache,
	sheets: &[epf::File],
	palettes: &pal::File,
	descriptor: &Descriptor,
) -> Vec<TimedImage> {
	let sequences: Vec<Vec<TimedImage>> = descriptor
		.chunks
		.iter()
		.map(|chunk| render_chunk_sequence(cache, sheets, palettes, descriptor, chunk))
		.collect();
	aggregate(&sequences)
}

/// Renderer for static, individually indexed frames (tiles, items, icons).
///
/// A tile's sub-palette comes from the optional palette map (one entry per
/// global frame index, as resolved from the client's tile tables); without a
/// map every tile uses sub-palette 0.
#[derive(Debug, Clone)]
pub struct TileRenderer {
	sheets: Vec<epf::File>,
	palettes: pal::File,
	palette_map: Option<Vec<u32>>,
	cache: RenderCache,
}

impl TileRenderer {
	/// Creates a renderer without a palette map
	pub fn new(sheets: Vec<epf::File>, palettes: pal::File) -> Self {
		Self {
			sheets,
			palettes,
			palette_map: None,
			cache: RenderCache::new(),
		}
	}

	/// Creates a renderer with a per-tile sub-palette map
	pub fn with_palette_map(sheets: Vec<epf::File>, palettes: pal::File, palette_map: Vec<u32>) -> Self {
		Self {
			sheets,
			palettes,
			palette_map: Some(palette_map),
			cache: RenderCache::new(),
		}
	}

	/// Returns the total frame count across all owned sheets
	pub fn frame_count(&self) -> usize {
		total_frames(&self.sheets)
	}

	/// Returns the descriptor record of a tile's frame, if the index exists
	pub fn frame_entry(&self, tile_index: usize) -> Option<FrameEntry> {
		entry_at(&self.sheets, tile_index)
	}

	/// Renders a tile with its mapped sub-palette.
	///
	/// Unknown indices and corrupt frames produce the transparent
	/// placeholder.
	pub fn render(&mut self, tile_index: usize, cycle_offset: i32) -> RasterImage {
		let sub_palette = self
			.palette_map
			.as_ref()
			.and_then(|map| map.get(tile_index))
			.map(|&id| id as usize)
			.unwrap_or(0);
		self.render_with_palette(tile_index, cycle_offset, sub_palette)
	}

	/// Renders a tile with an explicit sub-palette, bypassing the map
	pub fn render_with_palette(&mut self, tile_index: usize, cycle_offset: i32, sub_palette: usize) -> RasterImage {
		render_global(
			&mut self.cache,
			&self.sheets,
			&self.palettes,
			tile_index,
			sub_palette,
			cycle_offset,
		)
	}

	/// Re-quantizes `image` into the frame behind `tile_index` and drops the
	/// stale cache entries for it.
	///
	/// # Errors
	///
	/// Returns [`TkFileError::IndexOutOfRange`] if the index resolves to no
	/// sheet, or the sheet's own error if the replacement fails.
	pub fn replace_frame(
		&mut self,
		tile_index: usize,
		image: &RasterImage,
		quantizer: &Quantizer,
	) -> Result<(), TkFileError> {
		let Some((sheet, frame)) = locate_frame(&self.sheets, tile_index) else {
			return Err(TkFileError::index_out_of_range(
				FileType::Epf,
				tile_index,
				self.frame_count(),
			));
		};
		self.sheets[sheet].replace_frame(frame, image, quantizer)?;
		self.cache.invalidate(tile_index);
		Ok(())
	}

	/// Swaps the palette file and drops every cached image
	pub fn set_palettes(&mut self, palettes: pal::File) {
		self.palettes = palettes;
		self.cache.clear();
	}

	/// Drops every cached image
	pub fn invalidate_cache(&mut self) {
		self.cache.clear();
	}
}

/// Renderer for equipment part animations driven by a part descriptor table
#[derive(Debug, Clone)]
pub struct PartRenderer {
	table: dna::File,
	sheets: Vec<epf::File>,
	palettes: pal::File,
	cache: RenderCache,
}

impl PartRenderer {
	/// Creates a renderer from a part table and its companion files
	pub fn new(table: dna::File, sheets: Vec<epf::File>, palettes: pal::File) -> Self {
		Self {
			table,
			sheets,
			palettes,
			cache: RenderCache::new(),
		}
	}

	/// Returns the number of part descriptors in the table
	pub fn descriptor_count(&self) -> usize {
		self.table.len()
	}

	/// Returns the descriptor table
	pub fn table(&self) -> &dna::File {
		&self.table
	}

	/// Renders every layer of one part and merges them into a single timed
	/// sequence.
	///
	/// # Errors
	///
	/// Returns [`TkFileError::IndexOutOfRange`] if the table has no such
	/// descriptor.
	pub fn render_animation(&mut self, index: usize) -> Result<Vec<TimedImage>, TkFileError> {
		let Self { table, sheets, palettes, cache } = self;
		let descriptor = table
			.get(index)
			.ok_or_else(|| TkFileError::index_out_of_range(FileType::Dna, index, table.len()))?;
		Ok(render_descriptor(cache, sheets, palettes, descriptor))
	}

	/// Renders a single layer of one part as its own timed sequence.
	///
	/// # Errors
	///
	/// Returns [`TkFileError::IndexOutOfRange`] if either index is out of
	/// range.
	pub fn render_chunk(&mut self, index: usize, chunk_index: usize) -> Result<Vec<TimedImage>, TkFileError> {
		let Self { table, sheets, palettes, cache } = self;
		let descriptor = table
			.get(index)
			.ok_or_else(|| TkFileError::index_out_of_range(FileType::Dna, index, table.len()))?;
		let chunk = descriptor
			.chunks
			.get(chunk_index)
			.ok_or_else(|| TkFileError::index_out_of_range(FileType::Dna, chunk_index, descriptor.chunks.len()))?;
		Ok(render_chunk_sequence(cache, sheets, palettes, descriptor, chunk))
	}

	/// Drops every cached image
	pub fn invalidate_cache(&mut self) {
		self.cache.clear();
	}
}

/// Renderer for monster animations driven by a mob descriptor table
#[derive(Debug, Clone)]
pub struct MobRenderer {
	table: dna::File,
	sheets: Vec<epf::File>,
	palettes: pal::File,
	cache: RenderCache,
}

impl MobRenderer {
	/// Creates a renderer from a mob table and its companion files
	pub fn new(table: dna::File, sheets: Vec<epf::File>, palettes: pal::File) -> Self {
		Self {
			table,
			sheets,
			palettes,
			cache: RenderCache::new(),
		}
	}

	/// Returns the number of mob descriptors in the table
	pub fn descriptor_count(&self) -> usize {
		self.table.len()
	}

	/// Returns the descriptor table
	pub fn table(&self) -> &dna::File {
		&self.table
	}

	/// Renders every layer of one mob and merges them into a single timed
	/// sequence.
	///
	/// # Errors
	///
	/// Returns [`TkFileError::IndexOutOfRange`] if the table has no such
	/// descriptor.
	pub fn render_animation(&mut self, index: usize) -> Result<Vec<TimedImage>, TkFileError> {
		let Self { table, sheets, palettes, cache } = self;
		let descriptor = table
			.get(index)
			.ok_or_else(|| TkFileError::index_out_of_range(FileType::Dna, index, table.len()))?;
		Ok(render_descriptor(cache, sheets, palettes, descriptor))
	}

	/// Renders a single layer of one mob as its own timed sequence.
	///
	/// # Errors
	///
	/// Returns [`TkFileError::IndexOutOfRange`] if either index is out of
	/// range.
	pub fn render_chunk(&mut self, index: usize, chunk_index: usize) -> Result<Vec<TimedImage>, TkFileError> {
		let Self { table, sheets, palettes, cache } = self;
		let descriptor = table
			.get(index)
			.ok_or_else(|| TkFileError::index_out_of_range(FileType::Dna, index, table.len()))?;
		let chunk = descriptor
			.chunks
			.get(chunk_index)
			.ok_or_else(|| TkFileError::index_out_of_range(FileType::Dna, chunk_index, descriptor.chunks.len()))?;
		Ok(render_chunk_sequence(cache, sheets, palettes, descriptor, chunk))
	}

	/// Drops every cached image
	pub fn invalidate_cache(&mut self) {
		self.cache.clear();
	}
}

/// Renderer for effect animations given as explicit frame/duration steps
#[derive(Debug, Clone)]
pub struct EffectRenderer {
	sheets: Vec<epf::File>,
	palettes: pal::File,
	cache: RenderCache,
}

impl EffectRenderer {
	/// Creates a renderer from effect sheets and their palette file
	pub fn new(sheets: Vec<epf::File>, palettes: pal::File) -> Self {
		Self {
			sheets,
			palettes,
			cache: RenderCache::new(),
		}
	}

	/// Returns the total frame count across all owned sheets
	pub fn frame_count(&self) -> usize {
		total_frames(&self.sheets)
	}

	/// Renders a sequence of (global frame index, duration) steps on a
	/// shared pivot canvas.
	///
	/// Steps whose frame cannot be resolved are skipped, so a fully
	/// unresolvable sequence comes back empty.
	pub fn render_sequence(&mut self, steps: &[(usize, u32)], sub_palette: usize) -> Vec<TimedImage> {
		let Self { sheets, palettes, cache } = self;

		let entries: Vec<FrameEntry> = steps
			.iter()
			.filter_map(|&(global, _)| entry_at(sheets, global))
			.collect();
		let bounds = PivotBounds::from_entries(entries.iter());

		let mut sequence = Vec::new();
		for &(global, duration) in steps {
			let Some(frame) = frame_at(sheets, global) else {
				continue;
			};
			let image = render_cached(cache, palettes, &frame, global, sub_palette, 0);
			let placed = place_frame(&bounds, frame.entry(), &image);
			sequence.push(TimedImage::new(placed, duration));
		}

		sequence
	}

	/// Drops every cached image
	pub fn invalidate_cache(&mut self) {
		self.cache.clear();
	}
}

/// Tagged union over the asset-specific renderers.
///
/// Code that juggles several asset kinds at once (viewers, exporters) can
/// hold these in one collection and dispatch by matching.
#[derive(Debug, Clone)]
pub enum AssetRenderer {
	/// Static frame renderer
	Tile(TileRenderer),
	/// Part animation renderer
	Part(PartRenderer),
	/// Mob animation renderer
	Mob(MobRenderer),
	/// Effect sequence renderer
	Effect(EffectRenderer),
}

impl AssetRenderer {
	/// Returns how many assets this renderer can address: frames for tile
	/// and effect renderers, descriptors for part and mob renderers
	pub fn count(&self) -> usize {
		match self {
			AssetRenderer::Tile(renderer) => renderer.frame_count(),
			AssetRenderer::Part(renderer) => renderer.descriptor_count(),
			AssetRenderer::Mob(renderer) => renderer.descriptor_count(),
			AssetRenderer::Effect(renderer) => renderer.frame_count(),
		}
	}

	/// Drops every cached image in the underlying renderer
	pub fn invalidate_cache(&mut self) {
		match self {
			AssetRenderer::Tile(renderer) => renderer.invalidate_cache(),
			AssetRenderer::Part(renderer) => renderer.invalidate_cache(),
			AssetRenderer::Mob(renderer) => renderer.invalidate_cache(),
			AssetRenderer::Effect(renderer) => renderer.invalidate_cache(),
		}
	}
}

impl From<TileRenderer> for AssetRenderer {
	fn from(renderer: TileRenderer) -> Self {
		AssetRenderer::Tile(renderer)
	}
}

impl From<PartRenderer> for AssetRenderer {
	fn from(renderer: PartRenderer) -> Self {
		AssetRenderer::Part(renderer)
	}
}

impl From<MobRenderer> for AssetRenderer {
	fn from(renderer: MobRenderer) -> Self {
		AssetRenderer::Mob(renderer)
	}
}

impl From<EffectRenderer> for AssetRenderer {
	fn from(renderer: EffectRenderer) -> Self {
		AssetRenderer::Effect(renderer)
	}
}
