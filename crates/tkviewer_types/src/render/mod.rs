//! Image reconstruction for `tkviewer-rs` project.
//!
//! Everything in here derives RGBA images from the decoded file types:
//! rasterizing palette-indexed frames, aligning animation frames on pivot
//! canvases, compositing layers, and the per-asset-family renderers that tie
//! a set of files together.

pub mod compositor;
pub mod pivot;
pub mod raster;
pub mod rasterizer;
pub mod renderer;

// Re-export the render pipeline types
pub use compositor::{TimedImage, aggregate, merge, place_frame};
pub use pivot::PivotBounds;
pub use raster::RasterImage;
pub use rasterizer::{PLACEHOLDER_DIM, RenderCache, rasterize};
pub use renderer::{AssetRenderer, EffectRenderer, MobRenderer, PartRenderer, TileRenderer};
