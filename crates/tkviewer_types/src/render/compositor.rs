//! Layered animation compositing.
//!
//! Animated assets are stored as independent layers, each an ordered loop of
//! timed frames. Compositing aligns every layer's frames on a shared pivot
//! canvas, then folds the layers together bottom-up into one timed sequence
//! ready for playback or export.

use crate::file::epf::FrameEntry;
use crate::render::{PivotBounds, RasterImage};

/// One step of an animation: an image and how long it is shown, in ticks
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimedImage {
	/// Composited RGBA image for this step
	pub image: RasterImage,
	/// Display duration in ticks
	pub duration: u32,
}

impl TimedImage {
	/// Creates a timed animation step
	pub fn new(image: RasterImage, duration: u32) -> Self {
		Self { image, duration }
	}
}

/// Pastes a rasterized frame onto a transparent canvas of the aggregate size.
///
/// The frame lands at the offset [`PivotBounds::placement`] assigns it, so
/// frames sharing an anchor line up across the whole sequence.
pub fn place_frame(bounds: &PivotBounds, entry: &FrameEntry, image: &RasterImage) -> RasterImage {
	let mut canvas = RasterImage::blank(bounds.width(), bounds.height());
	let (x, y) = bounds.placement(entry);
	canvas.draw_over(image, x, y);
	canvas
}

/// Merges two timed sequences into one, drawing `over` on top of `under`.
///
/// The result has `max(L1, L2)` steps; step `i` composites `under[i % L1]`
/// then `over[i % L2]` on a canvas big enough for both, and takes its
/// duration from `under[i % L1]`. An empty side passes the other side
/// through unchanged, so layers with nothing to display cost nothing.
pub fn merge(under: &[TimedImage], over: &[TimedImage]) -> Vec<TimedImage> {
	if under.is_empty() {
		return over.to_vec();
	}
	if over.is_empty() {
		return under.to_vec();
	}

	let count = under.len().max(over.len());
	let width = under[0].image.width().max(over[0].image.width());
	let height = under[0].image.height().max(over[0].image.height());

	let mut merged = Vec::with_capacity(count);
	for i in 0..count {
		let bottom = &under[i % under.len()];
		let top = &over[i % over.len()];

		let mut canvas = RasterImage::blank(width, height);
		canvas.draw_over(&bottom.image, 0, 0);
		canvas.draw_over(&top.image, 0, 0);

		merged.push(TimedImage::new(canvas, bottom.duration));
	}

	merged
}

/// Folds any number of timed sequences into one, lowest layer first
pub fn aggregate(sequences: &[Vec<TimedImage>]) -> Vec<TimedImage> {
	sequences
		.iter()
		.fold(Vec::new(), |merged, sequence| merge(&merged, sequence))
}
