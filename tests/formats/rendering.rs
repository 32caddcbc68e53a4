//! End-to-end compositing tests for the renderer layer.

use tkviewer_rs::prelude::*;

use crate::support;

/// Two one-frame sheets with offset bounding boxes: a red 2x2 frame whose
/// box spans (-2, -1) to (0, 1), and a green 2x2 frame at the origin. Their
/// shared canvas is 4x3 with the red frame placed at (0, 0) and the green
/// one at (2, 1).
fn offset_sheets() -> Vec<EpfFile> {
	vec![
		EpfFile::from_bytes(&support::sheet_bytes(&[support::solid_frame(-1, -2, 2, 1)])).unwrap(),
		EpfFile::from_bytes(&support::sheet_bytes(&[support::solid_frame(0, 0, 2, 2)])).unwrap(),
	]
}

#[test]
fn mob_animation_composites_on_shared_pivot() {
	let mut table = DnaFile::new(DescriptorKind::Mob);
	table.push_descriptor(support::descriptor(0, 0, &[(0, 100), (1, 50)]));

	let mut renderer = MobRenderer::new(table, offset_sheets(), support::two_tone_palettes());
	let animation = renderer.render_animation(0).unwrap();

	assert_eq!(animation.len(), 2);
	assert_eq!(animation[0].duration, 100);
	assert_eq!(animation[1].duration, 50);

	// Every step shares the pivot-aligned canvas
	for step in &animation {
		assert_eq!((step.image.width(), step.image.height()), (4, 3));
	}

	let first = &animation[0].image;
	assert_eq!(first.get_pixel(0, 0), Some(support::RED));
	assert_eq!(first.get_pixel(1, 1), Some(support::RED));
	assert_eq!(first.get_pixel(2, 1), Some(Color::transparent()));

	let second = &animation[1].image;
	assert_eq!(second.get_pixel(2, 1), Some(support::GREEN));
	assert_eq!(second.get_pixel(3, 2), Some(support::GREEN));
	assert_eq!(second.get_pixel(0, 0), Some(Color::transparent()));
}

#[test]
fn part_chunks_overlay_and_cycle() {
	let mut table = DnaFile::new(DescriptorKind::Part);
	table.push_descriptor(Descriptor {
		base_frame: 0,
		marker: 0,
		palette_id: 0,
		chunks: vec![
			Chunk::new(vec![Block::new(0, 100), Block::new(0, 50)]),
			Chunk::new(vec![Block::new(1, 30)]),
		],
	});

	let mut renderer = PartRenderer::new(table, offset_sheets(), support::two_tone_palettes());
	let animation = renderer.render_animation(0).unwrap();

	// The single-step overlay chunk cycles against the longer base chunk,
	// which keeps the step count and durations
	assert_eq!(animation.len(), 2);
	assert_eq!(animation[0].duration, 100);
	assert_eq!(animation[1].duration, 50);

	for step in &animation {
		assert_eq!((step.image.width(), step.image.height()), (2, 2));
		assert_eq!(step.image.get_pixel(0, 0), Some(support::GREEN));
		assert_eq!(step.image.get_pixel(1, 1), Some(support::GREEN));
	}
}

#[test]
fn empty_descriptor_renders_nothing() {
	let mut table = DnaFile::new(DescriptorKind::Mob);
	table.push_descriptor(Descriptor {
		base_frame: 0,
		marker: 0,
		palette_id: 0,
		chunks: Vec::new(),
	});

	let mut renderer = MobRenderer::new(table, offset_sheets(), support::two_tone_palettes());
	assert!(renderer.render_animation(0).unwrap().is_empty());
	assert!(renderer.render_animation(1).is_err());
}

#[test]
fn tile_cache_refreshes_after_frame_import() {
	let sheets =
		vec![EpfFile::from_bytes(&support::sheet_bytes(&[support::solid_frame(0, 0, 2, 1)])).unwrap()];
	let mut renderer = TileRenderer::new(sheets, support::two_tone_palettes());

	assert_eq!(renderer.render(0, 0).get_pixel(0, 0), Some(support::RED));

	// Import a blue replacement; the cached raster must not leak through
	let mut replacement = RasterImage::blank(2, 2);
	for y in 0..2 {
		for x in 0..2 {
			replacement.put_pixel(x, y, support::BLUE);
		}
	}
	let palettes = support::two_tone_palettes();
	let quantizer = Quantizer::new(palettes.first().unwrap());
	renderer.replace_frame(0, &replacement, &quantizer).unwrap();

	assert_eq!(renderer.render(0, 0).get_pixel(0, 0), Some(support::BLUE));
}

#[test]
fn tile_palette_map_selects_sub_palette() {
	let sheets =
		vec![EpfFile::from_bytes(&support::sheet_bytes(&[support::solid_frame(0, 0, 2, 1)])).unwrap()];
	let mut renderer =
		TileRenderer::with_palette_map(sheets, support::two_tone_palettes(), vec![1]);

	assert_eq!(renderer.render(0, 0).get_pixel(0, 0), Some(support::BLUE));
}

#[test]
fn degenerate_frames_render_as_placeholders() {
	let sheet =
		EpfFile::from_bytes(&support::sheet_bytes(&[(0, 0, 0, 0, Vec::new(), Vec::new())])).unwrap();
	let mut renderer = TileRenderer::new(vec![sheet], support::two_tone_palettes());

	let image = renderer.render(0, 0);
	assert_eq!((image.width(), image.height()), (PLACEHOLDER_DIM, PLACEHOLDER_DIM));
	assert!(image.pixels().iter().all(|&byte| byte == 0));

	// An out-of-range tile index falls back the same way
	let missing = renderer.render(99, 0);
	assert_eq!((missing.width(), missing.height()), (PLACEHOLDER_DIM, PLACEHOLDER_DIM));
}

#[test]
fn effect_sequence_shares_canvas_and_durations() {
	let mut renderer = EffectRenderer::new(offset_sheets(), support::two_tone_palettes());
	let animation = renderer.render_sequence(&[(0, 10), (1, 20)], 0);

	assert_eq!(animation.len(), 2);
	assert_eq!(animation[0].duration, 10);
	assert_eq!(animation[1].duration, 20);
	assert_eq!((animation[0].image.width(), animation[0].image.height()), (4, 3));
	assert_eq!(animation[0].image.get_pixel(0, 0), Some(support::RED));
	assert_eq!(animation[1].image.get_pixel(2, 1), Some(support::GREEN));
}

#[test]
fn renders_straight_out_of_an_archive() {
	support::init_logging();

	let mut table = DnaFile::new(DescriptorKind::Mob);
	table.push_descriptor(support::descriptor(0, 0, &[(0, 100), (1, 50)]));

	let mut packed = DatFile::new();
	packed.put("mon0.epf", support::sheet_bytes(&[support::solid_frame(-1, -2, 2, 1)]));
	packed.put("mon1.epf", support::sheet_bytes(&[support::solid_frame(0, 0, 2, 2)]));
	packed.put("mon.pal", support::two_tone_palettes().to_bytes());
	packed.put("mon.dna", table.to_bytes());

	let archive = DatFile::from_bytes(&packed.to_bytes()).unwrap();

	let sprites = archive.extract_sprites();
	assert!(sprites.is_clean());
	let sheets: Vec<EpfFile> = sprites.loaded.into_iter().map(|(_, sheet)| sheet).collect();

	let palettes = PalFile::from_bytes(&archive.get("mon.pal").unwrap().data).unwrap();
	let table = DnaFile::from_bytes(&archive.get("mon.dna").unwrap().data, DescriptorKind::Mob)
		.unwrap();

	let mut renderer = MobRenderer::new(table, sheets, palettes);
	let animation = renderer.render_animation(0).unwrap();

	assert_eq!(animation.len(), 2);
	assert_eq!(animation[0].image.get_pixel(0, 0), Some(support::RED));
	assert_eq!(animation[1].image.get_pixel(2, 1), Some(support::GREEN));
}
