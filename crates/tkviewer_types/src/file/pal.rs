//! `.PAL` palette store support for `tkviewer-rs`.
//!
//! PAL files carry the shared color tables every indexed sprite in the client
//! resolves against. One file holds any number of 256-color sub-palettes;
//! animation descriptors and tile tables select a sub-palette by index at
//! render time.
//!
//! # File Structure
//!
//! ```text
//! Offset  Size    Field
//! ------  ----    ------------------------------------------------
//! 0x00    9       magic "DLPalette"
//! 0x09    15      reserved (preserved verbatim)
//! 0x18    1       animation_count (u8)
//! 0x19    7       reserved (preserved verbatim)
//! 0x20    2*A     animation offsets (u16 each, retained, not interpreted)
//! then    1024*N  sub-palettes: 256 colors x 4 bytes (A, R, G, B)
//! ```
//!
//! Sub-palettes run to the end of the input; a color region whose length is
//! not a multiple of 1024 is malformed.
//!
//! # Usage Examples
//!
//! ```no_run
//! use tkviewer_types::file::pal::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let palettes = File::open("tile.pal")?;
//!
//! println!("{} sub-palettes", palettes.sub_palette_count());
//! let color = palettes.color_at(0, 17);
//! println!("index 17 -> {}", color);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::file::{FileType, TkFileError};

/// PAL file constants.
pub mod constants {
	/// Magic tag at the start of every PAL file
	pub const MAGIC: [u8; 9] = *b"DLPalette";

	/// Size of the fixed header (magic + reserved + count + reserved)
	pub const HEADER_SIZE: usize = 32;

	/// Size of one serialized sub-palette (256 colors x 4 bytes)
	pub const BLOCK_SIZE: usize = 1024;

	/// Number of colors in a sub-palette
	pub const PALETTE_SIZE: usize = 256;
}

/// ARGB color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new color from components.
	pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a fully opaque RGB color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(255, r, g, b)
	}

	/// Creates a fully opaque grayscale color.
	pub const fn gray(value: u8) -> Self {
		Self::rgb(value, value, value)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Returns the color as a packed 32-bit ARGB value.
	pub const fn to_argb32(self) -> u32 {
		((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
	}

	/// Creates a color from a packed 32-bit ARGB value.
	pub const fn from_argb32(argb: u32) -> Self {
		Self {
			a: ((argb >> 24) & 0xFF) as u8,
			r: ((argb >> 16) & 0xFF) as u8,
			g: ((argb >> 8) & 0xFF) as u8,
			b: (argb & 0xFF) as u8,
		}
	}

	/// Squared Euclidean distance to another color, on RGB only.
	///
	/// Alpha is ignored: quantization treats transparency separately
	/// through the stencil.
	pub fn distance_squared(self, other: Color) -> u32 {
		let dr = self.r as i32 - other.r as i32;
		let dg = self.g as i32 - other.g as i32;
		let db = self.b as i32 - other.b as i32;
		(dr * dr + dg * dg + db * db) as u32
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::transparent()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ARGB({}, {}, {}, {})", self.a, self.r, self.g, self.b)
	}
}

/// One 256-color sub-palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [Color; constants::PALETTE_SIZE],
}

impl Palette {
	/// Creates a palette with all colors set to transparent black.
	pub fn new() -> Self {
		Self {
			colors: [Color::transparent(); constants::PALETTE_SIZE],
		}
	}

	/// Creates a grayscale palette where every index maps to its own value.
	pub fn grayscale() -> Self {
		let mut palette = Self::new();
		for i in 0..constants::PALETTE_SIZE {
			palette.colors[i] = Color::gray(i as u8);
		}
		palette
	}

	/// Loads a sub-palette from one 1024-byte block.
	///
	/// # Errors
	///
	/// Returns an error if the slice is shorter than one block.
	pub fn from_bytes(data: &[u8]) -> Result<Self, TkFileError> {
		if data.len() < constants::BLOCK_SIZE {
			return Err(TkFileError::insufficient_data(
				FileType::Pal,
				constants::BLOCK_SIZE,
				data.len(),
			));
		}

		let mut palette = Self::new();
		for (i, argb) in data[..constants::BLOCK_SIZE].chunks_exact(4).enumerate() {
			palette.colors[i] = Color::new(argb[0], argb[1], argb[2], argb[3]);
		}
		Ok(palette)
	}

	/// Serializes the sub-palette to one 1024-byte block.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut data = Vec::with_capacity(constants::BLOCK_SIZE);
		for color in &self.colors {
			data.push(color.a);
			data.push(color.r);
			data.push(color.g);
			data.push(color.b);
		}
		data
	}

	/// Gets a color by index.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors[index as usize]
	}

	/// Sets a color at the specified index.
	#[inline]
	pub fn set(&mut self, index: u8, color: Color) {
		self.colors[index as usize] = color;
	}

	/// Returns a reference to the color array.
	#[inline]
	pub fn colors(&self) -> &[Color; constants::PALETTE_SIZE] {
		&self.colors
	}

	/// Returns an iterator over palette colors.
	pub fn iter(&self) -> impl Iterator<Item = &Color> {
		self.colors.iter()
	}

	/// Returns an iterator over palette colors with their indices.
	pub fn iter_indexed(&self) -> impl Iterator<Item = (u8, &Color)> {
		self.colors.iter().enumerate().map(|(i, c)| (i as u8, c))
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Palette: {} colors", constants::PALETTE_SIZE)
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Color;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}

impl std::ops::IndexMut<u8> for Palette {
	fn index_mut(&mut self, index: u8) -> &mut Self::Output {
		&mut self.colors[index as usize]
	}
}

/// PAL file: a magic-tagged list of sub-palettes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	reserved_head: [u8; 15],
	reserved_tail: [u8; 7],
	animation_offsets: Vec<u16>,
	palettes: Vec<Palette>,
}

impl File {
	/// Creates an empty PAL file with no sub-palettes.
	pub fn new() -> Self {
		Self {
			reserved_head: [0; 15],
			reserved_tail: [0; 7],
			animation_offsets: Vec::new(),
			palettes: Vec::new(),
		}
	}

	/// Creates a PAL file holding a single sub-palette.
	pub fn from_palette(palette: Palette) -> Self {
		let mut file = Self::new();
		file.palettes.push(palette);
		file
	}

	/// Opens a PAL file from the given path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or is malformed.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TkFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Loads a PAL file from a byte slice.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The magic tag is wrong
	/// - The header or offset table is truncated
	/// - The color region length is not a multiple of 1024
	pub fn from_bytes(data: &[u8]) -> Result<Self, TkFileError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(TkFileError::insufficient_data(
				FileType::Pal,
				constants::HEADER_SIZE,
				data.len(),
			));
		}

		let magic = &data[0..9];
		if magic != constants::MAGIC {
			return Err(TkFileError::invalid_magic(FileType::Pal, &constants::MAGIC, magic));
		}

		let reserved_head: [u8; 15] = data[9..24].try_into()?;
		let animation_count = data[24] as usize;
		let reserved_tail: [u8; 7] = data[25..32].try_into()?;

		let offsets_end = constants::HEADER_SIZE + animation_count * 2;
		if data.len() < offsets_end {
			return Err(TkFileError::insufficient_data(FileType::Pal, offsets_end, data.len()));
		}

		let mut animation_offsets = Vec::with_capacity(animation_count);
		for chunk in data[constants::HEADER_SIZE..offsets_end].chunks_exact(2) {
			animation_offsets.push(u16::from_le_bytes([chunk[0], chunk[1]]));
		}

		let color_region = &data[offsets_end..];
		if color_region.len() % constants::BLOCK_SIZE != 0 {
			return Err(TkFileError::InvalidDataLength {
				file_type: FileType::Pal,
				length: color_region.len(),
			});
		}

		let mut palettes = Vec::with_capacity(color_region.len() / constants::BLOCK_SIZE);
		for block in color_region.chunks_exact(constants::BLOCK_SIZE) {
			palettes.push(Palette::from_bytes(block)?);
		}

		Ok(Self {
			reserved_head,
			reserved_tail,
			animation_offsets,
			palettes,
		})
	}

	/// Loads a PAL file from any reader.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the file is malformed.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, TkFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Returns the number of sub-palettes.
	pub fn sub_palette_count(&self) -> usize {
		self.palettes.len()
	}

	/// Gets a sub-palette by index.
	pub fn get(&self, index: usize) -> Option<&Palette> {
		self.palettes.get(index)
	}

	/// Returns the first sub-palette, the common case for single-palette files.
	pub fn first(&self) -> Option<&Palette> {
		self.palettes.first()
	}

	/// Returns a reference to all sub-palettes.
	pub fn palettes(&self) -> &[Palette] {
		&self.palettes
	}

	/// Appends a sub-palette.
	pub fn push_palette(&mut self, palette: Palette) {
		self.palettes.push(palette);
	}

	/// Returns the animation offsets read from the header.
	///
	/// The client stores these but this library does not interpret them;
	/// they round-trip through [`File::to_bytes`] unchanged.
	pub fn animation_offsets(&self) -> &[u16] {
		&self.animation_offsets
	}

	/// Resolves a color through a sub-palette.
	///
	/// An out-of-range sub-palette index clamps to sub-palette 0, matching
	/// the client's renderer. A file with no sub-palettes at all resolves
	/// everything to transparent black.
	pub fn color_at(&self, sub_palette: usize, index: u8) -> Color {
		let sub_palette = if sub_palette >= self.palettes.len() { 0 } else { sub_palette };
		match self.palettes.get(sub_palette) {
			Some(palette) => palette.get(index),
			None => Color::transparent(),
		}
	}

	/// Serializes the PAL file to bytes, preserving reserved header bytes
	/// and animation offsets verbatim.
	pub fn to_bytes(&self) -> Vec<u8> {
		let size = constants::HEADER_SIZE
			+ self.animation_offsets.len() * 2
			+ self.palettes.len() * constants::BLOCK_SIZE;
		let mut data = Vec::with_capacity(size);

		data.extend_from_slice(&constants::MAGIC);
		data.extend_from_slice(&self.reserved_head);
		data.push(self.animation_offsets.len() as u8);
		data.extend_from_slice(&self.reserved_tail);
		for offset in &self.animation_offsets {
			data.extend_from_slice(&offset.to_le_bytes());
		}
		for palette in &self.palettes {
			data.extend_from_slice(&palette.to_bytes());
		}

		data
	}

	/// Saves the PAL file to disk.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be written.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TkFileError> {
		std::fs::write(path, self.to_bytes())?;
		Ok(())
	}
}

impl Default for File {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"PAL File: {} sub-palettes, {} animation offsets",
			self.palettes.len(),
			self.animation_offsets.len()
		)
	}
}

impl TryFrom<&[u8]> for File {
	type Error = TkFileError;

	fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
		Self::from_bytes(value)
	}
}

impl From<&File> for Vec<u8> {
	fn from(file: &File) -> Self {
		file.to_bytes()
	}
}

/// Nearest-color lookup against one sub-palette.
///
/// Built once per palette and reused when re-quantizing RGBA images back
/// into indexed frames. Matching is by squared Euclidean distance over
/// RGB; transparency is handled by the caller through the stencil.
#[derive(Debug, Clone)]
pub struct Quantizer {
	colors: [Color; constants::PALETTE_SIZE],
}

impl Quantizer {
	/// Creates a quantizer from a sub-palette.
	pub fn new(palette: &Palette) -> Self {
		Self {
			colors: *palette.colors(),
		}
	}

	/// Creates a quantizer from an explicit index-to-color map.
	pub fn from_colors(colors: [Color; constants::PALETTE_SIZE]) -> Self {
		Self {
			colors,
		}
	}

	/// Returns the palette index whose color is closest to the given one.
	pub fn nearest(&self, color: Color) -> u8 {
		let mut best = 0usize;
		let mut best_distance = u32::MAX;
		for (i, candidate) in self.colors.iter().enumerate() {
			let distance = color.distance_squared(*candidate);
			if distance < best_distance {
				best = i;
				best_distance = distance;
			}
		}
		best as u8
	}
}
