//! End-to-end tests for `tkviewer-rs`
//!
//! These drive the public API the way the CLI does: synthetic archives,
//! sheets, palettes, and descriptor tables are built in memory, serialized,
//! and pushed through the full decode and render pipeline.

mod archive;
mod rendering;
mod sprites;
mod support;
