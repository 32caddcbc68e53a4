//! Owned RGBA pixel buffers produced by the render pipeline.
//!
//! A [`RasterImage`] is purely derived data: rasterizing a sprite frame or
//! compositing an animation step produces one, and nothing in the file layer
//! ever persists it.

use crate::file::pal::Color;

/// Row-major RGBA8 image buffer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RasterImage {
	width: u32,
	height: u32,
	pixels: Vec<u8>,
}

impl RasterImage {
	/// Creates an image from an existing pixel buffer.
	///
	/// # Arguments
	///
	/// * `width` - Image width in pixels
	/// * `height` - Image height in pixels
	/// * `pixels` - RGBA8 data, row-major, 4 bytes per pixel
	///
	/// # Panics
	///
	/// Panics if `pixels.len()` is not `width * height * 4`.
	pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
		assert_eq!(
			pixels.len(),
			width as usize * height as usize * 4,
			"pixel buffer length must match dimensions"
		);
		Self { width, height, pixels }
	}

	/// Creates a fully transparent image of the given size
	pub fn blank(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
			pixels: vec![0; width as usize * height as usize * 4],
		}
	}

	/// Returns the image width in pixels
	#[inline]
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Returns the image height in pixels
	#[inline]
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Returns the raw RGBA8 pixel data
	#[inline]
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Returns the raw RGBA8 pixel data mutably
	#[inline]
	pub fn pixels_mut(&mut self) -> &mut [u8] {
		&mut self.pixels
	}

	/// Consumes the image and returns its pixel buffer
	pub fn into_pixels(self) -> Vec<u8> {
		self.pixels
	}

	fn pixel_index(&self, x: u32, y: u32) -> Option<usize> {
		if x >= self.width || y >= self.height {
			return None;
		}
		Some((y as usize * self.width as usize + x as usize) * 4)
	}

	/// Returns the color at the given position, or None if out of bounds
	pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
		let index = self.pixel_index(x, y)?;
		Some(Color::new(
			self.pixels[index + 3],
			self.pixels[index],
			self.pixels[index + 1],
			self.pixels[index + 2],
		))
	}

	/// Sets the color at the given position.
	///
	/// Returns false if the position is out of bounds.
	pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) -> bool {
		let Some(index) = self.pixel_index(x, y) else {
			return false;
		};
		self.pixels[index] = color.r;
		self.pixels[index + 1] = color.g;
		self.pixels[index + 2] = color.b;
		self.pixels[index + 3] = color.a;
		true
	}

	/// Alpha-composites `source` over this image with its top-left corner at
	/// `(x, y)`.
	///
	/// Source pixels falling outside this image are clipped. Positions may be
	/// negative, in which case the overhanging part of the source is dropped.
	pub fn draw_over(&mut self, source: &RasterImage, x: i32, y: i32) {
		for src_y in 0..source.height {
			let Ok(dst_y) = u32::try_from(y + src_y as i32) else {
				continue;
			};
			if dst_y >= self.height {
				continue;
			}

			for src_x in 0..source.width {
				let Ok(dst_x) = u32::try_from(x + src_x as i32) else {
					continue;
				};
				if dst_x >= self.width {
					continue;
				}

				let src_index = (src_y as usize * source.width as usize + src_x as usize) * 4;
				let dst_index = (dst_y as usize * self.width as usize + dst_x as usize) * 4;
				blend_pixel(
					&mut self.pixels[dst_index..dst_index + 4],
					&source.pixels[src_index..src_index + 4],
				);
			}
		}
	}
}

impl std::fmt::Display for RasterImage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}x{} RGBA image", self.width, self.height)
	}
}

/// Source-over blend of one straight-alpha RGBA pixel onto another.
///
/// Both slices must be exactly 4 bytes.
fn blend_pixel(dst: &mut [u8], src: &[u8]) {
	let src_a = u32::from(src[3]);
	if src_a == 0 {
		return;
	}
	if src_a == 255 {
		dst.copy_from_slice(src);
		return;
	}

	let dst_a = u32::from(dst[3]);
	let inv = dst_a * (255 - src_a) / 255;
	let out_a = src_a + inv;
	if out_a == 0 {
		dst.fill(0);
		return;
	}

	for channel in 0..3 {
		let src_c = u32::from(src[channel]);
		let dst_c = u32::from(dst[channel]);
		dst[channel] = ((src_c * src_a + dst_c * inv) / out_a) as u8;
	}
	dst[3] = out_a as u8;
}
