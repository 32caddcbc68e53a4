//! Frame structures for EPF sprite sheets.

use std::fmt::Display;

/// Frame descriptor from the table at the end of an EPF file.
///
/// The bounding box is stored as signed 16-bit values on disk and widened
/// here; negative coordinates are real and drive pivot alignment when an
/// animation's frames share one canvas. Offsets are relative to the start
/// of the sheet's shared data block.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameEntry {
	/// Top edge of the bounding box
	pub top: i32,
	/// Left edge of the bounding box
	pub left: i32,
	/// Bottom edge of the bounding box
	pub bottom: i32,
	/// Right edge of the bounding box
	pub right: i32,
	/// Offset of the pixel segment in the data block
	pub pixel_offset: u32,
	/// Offset of the stencil segment in the data block
	pub stencil_offset: u32,
}

impl FrameEntry {
	/// Creates a new frame descriptor.
	pub fn new(
		top: i32,
		left: i32,
		bottom: i32,
		right: i32,
		pixel_offset: u32,
		stencil_offset: u32,
	) -> Self {
		Self {
			top,
			left,
			bottom,
			right,
			pixel_offset,
			stencil_offset,
		}
	}

	/// Frame width in pixels. An inverted box clamps to zero.
	pub fn width(&self) -> usize {
		(self.right - self.left).max(0) as usize
	}

	/// Frame height in pixels. An inverted box clamps to zero.
	pub fn height(&self) -> usize {
		(self.bottom - self.top).max(0) as usize
	}

	/// Total number of pixels in this frame.
	pub fn pixel_count(&self) -> usize {
		self.width() * self.height()
	}

	/// Length of the bit-packed stencil segment in bytes.
	pub fn stencil_len(&self) -> usize {
		self.pixel_count().div_ceil(8)
	}

	/// Returns true if either dimension is zero.
	pub fn is_empty(&self) -> bool {
		self.width() == 0 || self.height() == 0
	}
}

impl Display for FrameEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Frame: {}x{} box=({},{})-({},{}) pixels=0x{:08X} stencil=0x{:08X}",
			self.width(),
			self.height(),
			self.left,
			self.top,
			self.right,
			self.bottom,
			self.pixel_offset,
			self.stencil_offset
		)
	}
}

/// A decoded frame: descriptor plus owned pixel and stencil bytes.
///
/// Pixels are palette indices in row-major order. The stencil packs one
/// visibility bit per pixel in the same order, most significant bit first;
/// a set bit means the pixel is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
	entry: FrameEntry,
	pixels: Vec<u8>,
	stencil: Vec<u8>,
}

impl Frame {
	/// Creates a new frame from a descriptor and its data segments.
	///
	/// # Panics
	///
	/// Panics if the pixel or stencil length does not match the descriptor's
	/// dimensions.
	pub fn new(entry: FrameEntry, pixels: Vec<u8>, stencil: Vec<u8>) -> Self {
		assert_eq!(pixels.len(), entry.pixel_count(), "pixel data length must match dimensions");
		assert_eq!(
			stencil.len(),
			entry.stencil_len(),
			"stencil data length must match dimensions"
		);
		Self {
			entry,
			pixels,
			stencil,
		}
	}

	/// Creates a fully hidden frame: all indices zero, all stencil bits clear.
	pub fn blank(entry: FrameEntry) -> Self {
		Self {
			pixels: vec![0; entry.pixel_count()],
			stencil: vec![0; entry.stencil_len()],
			entry,
		}
	}

	/// Returns the frame descriptor.
	pub fn entry(&self) -> &FrameEntry {
		&self.entry
	}

	/// Frame width in pixels.
	pub fn width(&self) -> usize {
		self.entry.width()
	}

	/// Frame height in pixels.
	pub fn height(&self) -> usize {
		self.entry.height()
	}

	/// Returns the palette-index pixels in row-major order.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Returns the bit-packed stencil bytes.
	pub fn stencil(&self) -> &[u8] {
		&self.stencil
	}

	/// Gets the palette index at (x, y), or None when out of bounds.
	pub fn get_pixel(&self, x: usize, y: usize) -> Option<u8> {
		if x >= self.width() || y >= self.height() {
			return None;
		}
		self.pixels.get(y * self.width() + x).copied()
	}

	/// Returns the visibility bit for a pixel by row-major index.
	pub fn is_visible(&self, index: usize) -> bool {
		let byte_index = index >> 3;
		let bit_in_byte = 7 - (index & 7);
		match self.stencil.get(byte_index) {
			Some(byte) => (byte >> bit_in_byte) & 1 != 0,
			None => false,
		}
	}

	/// Returns the visibility bit for the pixel at (x, y).
	pub fn is_visible_at(&self, x: usize, y: usize) -> bool {
		if x >= self.width() || y >= self.height() {
			return false;
		}
		self.is_visible(y * self.width() + x)
	}

	/// Consumes the frame, returning its descriptor and data segments.
	pub fn into_parts(self) -> (FrameEntry, Vec<u8>, Vec<u8>) {
		(self.entry, self.pixels, self.stencil)
	}
}

impl Display for Frame {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.entry)
	}
}
