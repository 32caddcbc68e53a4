//! Pivot alignment for frames that share a logical anchor.
//!
//! Animation frames of one entity carry bounding boxes of different sizes and
//! positions in a shared sprite space; the box coordinates are relative to the
//! entity's anchor (feet, center). [`PivotBounds`] is the aggregate box over a
//! set of frames, from which the common canvas size and the anchor's position
//! on that canvas both fall out.

use crate::file::epf::FrameEntry;

/// Aggregate bounding box over a set of sprite frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PivotBounds {
	/// Minimum left edge over all frames
	pub left: i32,
	/// Minimum top edge over all frames
	pub top: i32,
	/// Maximum right edge over all frames
	pub right: i32,
	/// Maximum bottom edge over all frames
	pub bottom: i32,
}

impl PivotBounds {
	/// Computes the aggregate box over the given frame entries.
	///
	/// An empty set yields a zero box.
	pub fn from_entries<'a, I>(entries: I) -> Self
	where
		I: IntoIterator<Item = &'a FrameEntry>,
	{
		let mut bounds: Option<Self> = None;
		for entry in entries {
			match bounds.as_mut() {
				None => {
					bounds = Some(Self {
						left: entry.left,
						top: entry.top,
						right: entry.right,
						bottom: entry.bottom,
					});
				}
				Some(aggregate) => {
					aggregate.left = aggregate.left.min(entry.left);
					aggregate.top = aggregate.top.min(entry.top);
					aggregate.right = aggregate.right.max(entry.right);
					aggregate.bottom = aggregate.bottom.max(entry.bottom);
				}
			}
		}
		bounds.unwrap_or_default()
	}

	/// Returns the canvas width covering every frame
	#[inline]
	pub fn width(&self) -> u32 {
		(self.right - self.left).max(0) as u32
	}

	/// Returns the canvas height covering every frame
	#[inline]
	pub fn height(&self) -> u32 {
		(self.bottom - self.top).max(0) as u32
	}

	/// Returns the anchor's x position on the canvas
	#[inline]
	pub fn pivot_x(&self) -> i32 {
		self.left.abs()
	}

	/// Returns the anchor's y position on the canvas
	#[inline]
	pub fn pivot_y(&self) -> i32 {
		self.top.abs()
	}

	/// Returns true if the canvas has no area
	pub fn is_empty(&self) -> bool {
		self.width() == 0 || self.height() == 0
	}

	/// Returns a frame's placement on the canvas.
	///
	/// The offset keeps every contributing frame inside the canvas while
	/// frames sharing an anchor stay aligned to each other.
	pub fn placement(&self, entry: &FrameEntry) -> (i32, i32) {
		(entry.left - self.left, entry.top - self.top)
	}
}

impl std::fmt::Display for PivotBounds {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"bounds ({}, {})-({}, {}), canvas {}x{}, pivot ({}, {})",
			self.left,
			self.top,
			self.right,
			self.bottom,
			self.width(),
			self.height(),
			self.pivot_x(),
			self.pivot_y()
		)
	}
}
