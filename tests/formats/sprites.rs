//! Sprite sheet decode, palette resolution, and re-import tests.

use tkviewer_rs::prelude::*;

use crate::support;

#[test]
fn decodes_frames_and_resolves_colors() {
	let sheet = EpfFile::from_bytes(&support::sheet_bytes(&[
		support::solid_frame(0, 0, 2, 1),
		support::solid_frame(0, 0, 2, 2),
	]))
	.unwrap();
	let palettes = support::two_tone_palettes();

	assert_eq!(sheet.frame_count(), 2);

	let image = rasterize(&sheet.frame(0).unwrap(), &palettes, 0, 0);
	assert_eq!(image.get_pixel(0, 0), Some(support::RED));

	// Sub-palette 1 swaps red and blue
	let image = rasterize(&sheet.frame(0).unwrap(), &palettes, 1, 0);
	assert_eq!(image.get_pixel(0, 0), Some(support::BLUE));

	// Green is the same in both sub-palettes
	let image = rasterize(&sheet.frame(1).unwrap(), &palettes, 1, 0);
	assert_eq!(image.get_pixel(1, 1), Some(support::GREEN));
}

#[test]
fn out_of_range_sub_palette_clamps_to_base() {
	let sheet = EpfFile::from_bytes(&support::sheet_bytes(&[support::solid_frame(0, 0, 2, 1)]))
		.unwrap();
	let palettes = support::two_tone_palettes();

	let image = rasterize(&sheet.frame(0).unwrap(), &palettes, 40, 0);
	assert_eq!(image.get_pixel(0, 0), Some(support::RED));
}

#[test]
fn quantizes_imported_artwork() {
	let mut sheet = EpfFile::from_bytes(&support::sheet_bytes(&[support::solid_frame(0, 0, 2, 1)]))
		.unwrap();
	let palettes = support::two_tone_palettes();
	let quantizer = Quantizer::new(palettes.first().unwrap());

	let mut image = RasterImage::blank(2, 2);
	image.put_pixel(0, 0, Color::rgb(250, 10, 10));
	image.put_pixel(1, 0, Color::rgb(5, 240, 12));
	image.put_pixel(0, 1, Color::new(0, 9, 9, 9));
	image.put_pixel(1, 1, Color::rgb(30, 20, 230));

	sheet.replace_frame(0, &image, &quantizer).unwrap();

	// Round-trip through bytes before checking the re-imported frame
	let reloaded = EpfFile::from_bytes(&sheet.to_bytes()).unwrap();
	let frame = reloaded.frame(0).unwrap();

	assert_eq!(frame.pixels(), &[1, 2, 0, 3]);
	assert!(frame.is_visible_at(0, 0));
	assert!(!frame.is_visible_at(0, 1));

	// The transparent pixel stays transparent after rasterizing
	let rendered = rasterize(&frame, &palettes, 0, 0);
	assert_eq!(rendered.get_pixel(0, 0), Some(support::RED));
	assert_eq!(rendered.get_pixel(0, 1), Some(Color::transparent()));
}

#[test]
fn descriptor_table_survives_the_wire() {
	let mut table = DnaFile::new(DescriptorKind::Part);
	table.push_descriptor(support::descriptor(10, 2, &[(0, 100), (1, 50)]));
	table.push_descriptor(support::descriptor(12, 0, &[(0, 25)]));

	let reloaded = DnaFile::from_bytes(&table.to_bytes(), DescriptorKind::Part).unwrap();
	assert_eq!(reloaded.len(), 2);

	let descriptor = reloaded.get(0).unwrap();
	assert_eq!(descriptor.base_frame, 10);
	assert_eq!(descriptor.palette_id, 2);
	assert_eq!(descriptor.chunks[0].blocks.len(), 2);
	assert_eq!(descriptor.frame_index(&descriptor.chunks[0].blocks[1]), Some(11));
}
