#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `tkviewer-rs` decodes the data files of the classic NexusTK client and turns
//! them back into images: archives, palettes, sprite sheets, and the animation
//! tables that stitch sheets into moving characters.
//!
pub use tkviewer_internal::*;
