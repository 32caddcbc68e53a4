//! `.EPF` sprite sheet support for `tkviewer-rs`.
//!
//! EPF files hold the client's indexed sprite frames: a shared data block of
//! palette-index pixels and bit-packed visibility stencils, described by a
//! table of frame descriptors at the end of the file. Colors never live in
//! the sheet itself; frames resolve against a sub-palette from a PAL file at
//! render time.
//!
//! # File Structure
//!
//! All integers are little-endian.
//!
//! ```text
//! Offset       Size  Field
//! ------       ----  ------------------------------------------------
//! 0x00         2     frame_count (u16)
//! 0x02         2     width (u16, nominal canvas width)
//! 0x04         2     height (u16, nominal canvas height)
//! 0x06         2     flags (u16, opaque, preserved verbatim)
//! 0x08         4     data_length (u32)
//! 0x0C         D     shared data block
//! 0x0C + D     16*N  frame descriptors
//! ```
//!
//! Each frame descriptor (16 bytes):
//!
//! ```text
//! +0x00  2  top (i16)
//! +0x02  2  left (i16)
//! +0x04  2  bottom (i16)
//! +0x06  2  right (i16)
//! +0x08  4  pixel_offset (u32, relative to the data block)
//! +0x0C  4  stencil_offset (u32, relative to the data block)
//! ```
//!
//! A frame's pixel segment is `width * height` bytes of palette indices in
//! row-major order; its stencil segment is `ceil(width * height / 8)` bytes,
//! one bit per pixel in the same order, most significant bit first, set
//! meaning visible. Segments may alias inside the data block in files the
//! client shipped; re-encoding lays them out frame by frame.
//!
//! # Usage Examples
//!
//! ```no_run
//! use tkviewer_types::file::epf::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sheet = File::open("tile0.epf")?;
//!
//! println!("{} frames, nominal {}x{}", sheet.frame_count(), sheet.width(), sheet.height());
//!
//! let frame = sheet.frame(0)?;
//! println!("frame 0: {}x{}", frame.width(), frame.height());
//! # Ok(())
//! # }
//! ```

use std::io::Read;

use crate::file::{FileType, TkFileError, pal::Quantizer};
use crate::render::RasterImage;

pub mod frame;

pub use frame::{Frame, FrameEntry};


/// EPF file constants.
pub mod constants {
	/// Size of the file header in bytes
	pub const HEADER_SIZE: usize = 12;

	/// Size of one frame descriptor in bytes
	pub const DESCRIPTOR_SIZE: usize = 16;
}

/// EPF sprite sheet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	width: u16,
	height: u16,
	flags: u16,
	data: Vec<u8>,
	entries: Vec<FrameEntry>,
}

impl File {
	/// Creates an empty sprite sheet.
	pub fn new() -> Self {
		Self {
			width: 0,
			height: 0,
			flags: 0,
			data: Vec::new(),
			entries: Vec::new(),
		}
	}

	/// Opens an EPF file from the given path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or the sheet structure
	/// is malformed.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, TkFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Loads an EPF file from a byte slice.
	///
	/// # Errors
	///
	/// Returns an error if the header, data block or descriptor table runs
	/// past the end of the input.
	pub fn from_bytes(data: &[u8]) -> Result<Self, TkFileError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(TkFileError::insufficient_data(
				FileType::Epf,
				constants::HEADER_SIZE,
				data.len(),
			));
		}

		let frame_count = u16::from_le_bytes(data[0..2].try_into()?) as usize;
		let width = u16::from_le_bytes(data[2..4].try_into()?);
		let height = u16::from_le_bytes(data[4..6].try_into()?);
		let flags = u16::from_le_bytes(data[6..8].try_into()?);
		let data_length = u32::from_le_bytes(data[8..12].try_into()?) as usize;

		let data_end = constants::HEADER_SIZE + data_length;
		let descriptors_end = data_end + frame_count * constants::DESCRIPTOR_SIZE;
		if data.len() < descriptors_end {
			return Err(TkFileError::insufficient_data(FileType::Epf, descriptors_end, data.len()));
		}

		let block = data[constants::HEADER_SIZE..data_end].to_vec();

		let mut entries = Vec::with_capacity(frame_count);
		for i in 0..frame_count {
			let offset = data_end + i * constants::DESCRIPTOR_SIZE;
			let top = i16::from_le_bytes(data[offset..offset + 2].try_into()?) as i32;
			let left = i16::from_le_bytes(data[offset + 2..offset + 4].try_into()?) as i32;
			let bottom = i16::from_le_bytes(data[offset + 4..offset + 6].try_into()?) as i32;
			let right = i16::from_le_bytes(data[offset + 6..offset + 8].try_into()?) as i32;
			let pixel_offset = u32::from_le_bytes(data[offset + 8..offset + 12].try_into()?);
			let stencil_offset = u32::from_le_bytes(data[offset + 12..offset + 16].try_into()?);

			entries.push(FrameEntry::new(top, left, bottom, right, pixel_offset, stencil_offset));
		}

		Ok(Self {
			width,
			height,
			flags,
			data: block,
			entries,
		})
	}

	/// Loads an EPF file from any reader.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the sheet structure is malformed.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, TkFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Returns the number of frames.
	pub fn frame_count(&self) -> usize {
		self.entries.len()
	}

	/// Returns the nominal canvas width.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Returns the nominal canvas height.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Returns the opaque header flags, preserved for round-trips.
	pub fn flags(&self) -> u16 {
		self.flags
	}

	/// Returns a reference to the frame descriptors.
	pub fn entries(&self) -> &[FrameEntry] {
		&self.entries
	}

	/// Returns a specific frame descriptor.
	pub fn get_entry(&self, index: usize) -> Option<&FrameEntry> {
		self.entries.get(index)
	}

	/// Decodes one frame, slicing its pixel and stencil segments out of the
	/// shared data block.
	///
	/// # Errors
	///
	/// Returns an error if the index is out of range or a segment runs past
	/// the end of the data block.
	pub fn frame(&self, index: usize) -> Result<Frame, TkFileError> {
		let entry = self
			.entries
			.get(index)
			.copied()
			.ok_or_else(|| TkFileError::index_out_of_range(FileType::Epf, index, self.entries.len()))?;

		let pixel_start = entry.pixel_offset as usize;
		let pixel_end = pixel_start + entry.pixel_count();
		if pixel_end > self.data.len() {
			return Err(TkFileError::insufficient_data(FileType::Epf, pixel_end, self.data.len()));
		}

		let stencil_start = entry.stencil_offset as usize;
		let stencil_end = stencil_start + entry.stencil_len();
		if stencil_end > self.data.len() {
			return Err(TkFileError::insufficient_data(
				FileType::Epf,
				stencil_end,
				self.data.len(),
			));
		}

		Ok(Frame::new(
			entry,
			self.data[pixel_start..pixel_end].to_vec(),
			self.data[stencil_start..stencil_end].to_vec(),
		))
	}

	/// Replaces a frame with a re-quantized RGBA image.
	///
	/// Pixels with alpha 0 become index 0 with a cleared stencil bit; every
	/// other pixel takes the quantizer's nearest palette index with its
	/// stencil bit set. The frame's bounding box is reset to the image size
	/// at the origin, the shared data block is rebuilt with fresh offsets,
	/// and the nominal sheet dimensions grow if the new frame exceeds them.
	///
	/// Render caches keyed on this sheet must be invalidated afterwards.
	///
	/// # Errors
	///
	/// Returns an error if the index is out of range or an existing frame's
	/// segments cannot be re-read during the rebuild.
	pub fn replace_frame(
		&mut self,
		index: usize,
		image: &RasterImage,
		quantizer: &Quantizer,
	) -> Result<(), TkFileError> {
		if index >= self.entries.len() {
			return Err(TkFileError::index_out_of_range(FileType::Epf, index, self.entries.len()));
		}

		let width = image.width() as usize;
		let height = image.height() as usize;
		let (pixels, stencil) = quantize_image(image, quantizer);

		let mut segments = Vec::with_capacity(self.entries.len());
		for i in 0..self.entries.len() {
			if i == index {
				segments.push((pixels.clone(), stencil.clone()));
			} else {
				let (_, frame_pixels, frame_stencil) = self.frame(i)?.into_parts();
				segments.push((frame_pixels, frame_stencil));
			}
		}

		self.entries[index] = FrameEntry::new(0, 0, height as i32, width as i32, 0, 0);

		let mut data = Vec::new();
		for (entry, (frame_pixels, frame_stencil)) in self.entries.iter_mut().zip(segments) {
			entry.pixel_offset = data.len() as u32;
			data.extend_from_slice(&frame_pixels);
			entry.stencil_offset = data.len() as u32;
			data.extend_from_slice(&frame_stencil);
		}

		self.data = data;
		self.width = self.width.max(width as u16);
		self.height = self.height.max(height as u16);
		Ok(())
	}

	/// Serializes the sheet to bytes.
	pub fn to_bytes(&self) -> Vec<u8> {
		let size = constants::HEADER_SIZE
			+ self.data.len()
			+ self.entries.len() * constants::DESCRIPTOR_SIZE;
		let mut buffer = Vec::with_capacity(size);

		buffer.extend_from_slice(&(self.entries.len() as u16).to_le_bytes());
		buffer.extend_from_slice(&self.width.to_le_bytes());
		buffer.extend_from_slice(&self.height.to_le_bytes());
		buffer.extend_from_slice(&self.flags.to_le_bytes());
		buffer.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
		buffer.extend_from_slice(&self.data);

		for entry in &self.entries {
			buffer.extend_from_slice(&(entry.top as i16).to_le_bytes());
			buffer.extend_from_slice(&(entry.left as i16).to_le_bytes());
			buffer.extend_from_slice(&(entry.bottom as i16).to_le_bytes());
			buffer.extend_from_slice(&(entry.right as i16).to_le_bytes());
			buffer.extend_from_slice(&entry.pixel_offset.to_le_bytes());
			buffer.extend_from_slice(&entry.stencil_offset.to_le_bytes());
		}

		buffer
	}

	/// Saves the sheet to disk.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be written.
	pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), TkFileError> {
		std::fs::write(path, self.to_bytes())?;
		Ok(())
	}

	/// Returns an iterator over all frames.
	pub fn frames(&self) -> FrameIterator<'_> {
		FrameIterator {
			file: self,
			current_index: 0,
		}
	}
}

fn quantize_image(image: &RasterImage, quantizer: &Quantizer) -> (Vec<u8>, Vec<u8>) {
	use crate::file::pal::Color;

	let pixel_count = image.width() as usize * image.height() as usize;
	let mut pixels = Vec::with_capacity(pixel_count);
	let mut stencil = vec![0u8; pixel_count.div_ceil(8)];

	for (i, rgba) in image.pixels().chunks_exact(4).enumerate() {
		if rgba[3] == 0 {
			pixels.push(0);
		} else {
			pixels.push(quantizer.nearest(Color::new(rgba[3], rgba[0], rgba[1], rgba[2])));
			stencil[i >> 3] |= 1 << (7 - (i & 7));
		}
	}

	(pixels, stencil)
}

impl Default for File {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"EPF File: {} frames, nominal {}x{}, {} data bytes",
			self.entries.len(),
			self.width,
			self.height,
			self.data.len()
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

/// Iterator over the frames of an EPF file.
///
/// Yields `Result` so a corrupt frame mid-sheet surfaces instead of ending
/// the iteration early.
#[derive(Debug, Clone)]
pub struct FrameIterator<'a> {
	file: &'a File,
	current_index: usize,
}

impl<'a> Iterator for FrameIterator<'a> {
	type Item = Result<Frame, TkFileError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.current_index >= self.file.frame_count() {
			return None;
		}
		let frame = self.file.frame(self.current_index);
		self.current_index += 1;
		Some(frame)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.file.frame_count() - self.current_index;
		(remaining, Some(remaining))
	}
}

impl<'a> ExactSizeIterator for FrameIterator<'a> {
	fn len(&self) -> usize {
		self.file.frame_count() - self.current_index
	}
}

impl<'a> IntoIterator for &'a File {
	type Item = Result<Frame, TkFileError>;
	type IntoIter = FrameIterator<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames()
	}
}
