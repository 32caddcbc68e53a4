//! Archive container tests covering the pack, save, and scan cycle.

use tkviewer_rs::prelude::*;

use crate::support;

#[test]
fn packs_and_reloads_nested_assets() {
	let sheet = EpfFile::from_bytes(&support::sheet_bytes(&[support::solid_frame(0, 0, 2, 1)]))
		.unwrap();
	let palettes = support::two_tone_palettes();

	let mut archive = DatFile::new();
	archive.put("tile0.epf", sheet.to_bytes());
	archive.put("tile.pal", palettes.to_bytes());

	let reloaded = DatFile::from_bytes(&archive.to_bytes()).unwrap();
	assert_eq!(reloaded.len(), 2);

	// Lookups are case-insensitive like the client's loader
	let sheet_back = EpfFile::from_bytes(&reloaded.get("TILE0.EPF").unwrap().data).unwrap();
	assert_eq!(sheet_back, sheet);

	let palettes_back = PalFile::from_bytes(&reloaded.get("tile.pal").unwrap().data).unwrap();
	assert_eq!(palettes_back.sub_palette_count(), 2);
	assert_eq!(palettes_back.color_at(0, 1), support::RED);
	assert_eq!(palettes_back.color_at(1, 1), support::BLUE);
}

#[test]
fn saves_and_reopens_from_disk() {
	let mut archive = DatFile::new();
	archive.put("a.epf", vec![1, 2, 3, 4]);
	archive.put("b.pal", vec![5, 6]);

	let path = std::env::temp_dir().join(format!("tkviewer_archive_{}.dat", std::process::id()));
	archive.save(&path).unwrap();
	let reloaded = DatFile::open(&path).unwrap();
	let _ = std::fs::remove_file(&path);

	assert_eq!(reloaded, archive);
}

#[test]
fn baram_variant_keeps_long_names() {
	let mut archive = DatFile::with_variant(DatVariant::Baram);
	archive.put("a_very_long_member_name.epf", vec![7; 4]);

	let bytes = archive.to_bytes();
	let reloaded = DatFile::from_bytes_variant(&bytes, DatVariant::Baram).unwrap();

	assert_eq!(reloaded.variant(), DatVariant::Baram);
	assert_eq!(reloaded.entries()[0].name, "a_very_long_member_name.epf");
	assert_eq!(reloaded.entries()[0].data, vec![7; 4]);
}

#[test]
fn bulk_scan_reports_failures_without_aborting() {
	support::init_logging();

	let mut archive = DatFile::new();
	archive.put("good.epf", support::sheet_bytes(&[support::solid_frame(0, 0, 2, 1)]));
	archive.put("bad.epf", vec![1, 2, 3]);
	archive.put("good.pal", support::two_tone_palettes().to_bytes());
	archive.put("bad.pal", b"NotAPalette".to_vec());
	archive.put("readme.txt", b"hello".to_vec());
	let archive = DatFile::from_bytes(&archive.to_bytes()).unwrap();

	let sprites = archive.extract_sprites();
	assert_eq!(sprites.loaded.len(), 1);
	assert_eq!(sprites.loaded[0].0, "good.epf");
	assert_eq!(sprites.failures.len(), 1);
	assert_eq!(sprites.failures[0].0, "bad.epf");
	assert!(!sprites.is_clean());

	let palettes = archive.extract_palettes();
	assert_eq!(palettes.loaded.len(), 1);
	assert_eq!(palettes.failures.len(), 1);
	assert_eq!(palettes.failures[0].0, "bad.pal");

	for (name, error) in sprites.failures.iter().chain(palettes.failures.iter()) {
		log::warn!("{name}: {error}");
	}
}
