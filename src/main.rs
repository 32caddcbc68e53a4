//! TKViewer CLI Utility
//!
//! A command-line tool for inspecting, extracting, and rendering NexusTK
//! client data files.
//!
//! # Features
//!
//! - **list**: List the entries of a DAT archive
//! - **extract**: Write every archive entry out as a file
//! - **info**: Display information about a DAT, PAL, EPF, or DNA file
//! - **render**: Rasterize one sprite frame to a PNG image
//! - **animate**: Composite a descriptor's animation to PNG frames with JSON metadata
//! - **scan**: Walk a directory, decoding every archive and its sprite/palette entries
//! - **descriptors**: Print an animation descriptor table, optionally as JSON
//!
//! # Usage
//!
//! ```bash
//! # List an archive
//! cargo run -- list tile.dat
//!
//! # Extract an archive into a directory
//! cargo run -- extract char.dat -o char/
//!
//! # Show file details with a hex preview
//! cargo run -- info tile.pal --hex
//!
//! # Render frame 12 of a sheet
//! cargo run -- render tile0.epf -p tile.pal -i 12 -o tile_012.png
//!
//! # Composite mob 7 into PNG frames plus metadata.json
//! cargo run -- animate mon.dna -k mob -s mon0.epf -s mon1.epf -p mon.pal 7
//!
//! # Sweep a client data directory
//! cargo run -- scan ~/games/nexustk/data
//!
//! # Dump a part table as JSON
//! cargo run -- descriptors Body.dna -k part --json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use image::{ImageBuffer, RgbaImage};
use serde::{Deserialize, Serialize};
use tkviewer_rs::prelude::*;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "tkviewer")]
#[command(author = "tkviewer-rs project")]
#[command(version)]
#[command(about = "NexusTK data file toolkit - list, extract, render, and scan client files", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

/// Archive name-field width selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ArchiveVariant {
	/// 13-byte name fields (NexusTK)
	Standard,
	/// 32-byte name fields (Baram)
	Baram,
}

impl From<ArchiveVariant> for DatVariant {
	fn from(variant: ArchiveVariant) -> Self {
		match variant {
			ArchiveVariant::Standard => DatVariant::Standard,
			ArchiveVariant::Baram => DatVariant::Baram,
		}
	}
}

/// Descriptor table family selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TableKind {
	/// Monster tables
	Mob,
	/// Equipment part tables
	Part,
}

impl From<TableKind> for DescriptorKind {
	fn from(kind: TableKind) -> Self {
		match kind {
			TableKind::Mob => DescriptorKind::Mob,
			TableKind::Part => DescriptorKind::Part,
		}
	}
}

#[derive(Subcommand)]
enum Commands {
	/// List the entries of a DAT archive
	List {
		/// Input DAT archive path
		#[arg(value_name = "ARCHIVE")]
		archive: PathBuf,

		/// Archive layout variant
		#[arg(long, value_enum, default_value = "standard")]
		variant: ArchiveVariant,
	},

	/// Extract entries of a DAT archive into a directory
	Extract {
		/// Input DAT archive path
		#[arg(value_name = "ARCHIVE")]
		archive: PathBuf,

		/// Extract only the entry with this name (case-insensitive)
		#[arg(short, long, value_name = "NAME")]
		entry: Option<String>,

		/// Output directory (optional, defaults to `<archive>_extracted/`)
		#[arg(short, long, value_name = "OUTPUT_DIR")]
		output: Option<PathBuf>,

		/// Archive layout variant
		#[arg(long, value_enum, default_value = "standard")]
		variant: ArchiveVariant,
	},

	/// Display information about a DAT, PAL, EPF, or DNA file
	Info {
		/// Input file path
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Show a hex preview of the file head
		#[arg(long)]
		hex: bool,

		/// Archive layout variant, for DAT inputs
		#[arg(long, value_enum, default_value = "standard")]
		variant: ArchiveVariant,

		/// Descriptor table family, required for DNA inputs
		#[arg(short, long, value_enum)]
		kind: Option<TableKind>,
	},

	/// Rasterize one sprite frame to a PNG image
	Render {
		/// Input EPF sprite sheet path
		#[arg(value_name = "SHEET")]
		sheet: PathBuf,

		/// Path to the companion PAL palette file
		#[arg(short, long, value_name = "PALETTE")]
		palette: PathBuf,

		/// Frame index to render (0-based)
		#[arg(short, long, default_value_t = 0)]
		index: usize,

		/// Sub-palette index
		#[arg(long, default_value_t = 0)]
		sub_palette: usize,

		/// Color-cycle offset
		#[arg(long, default_value_t = 0, allow_negative_numbers = true)]
		cycle_offset: i32,

		/// Output PNG path (optional, defaults to `frame_<INDEX>.png`)
		#[arg(short, long, value_name = "OUTPUT")]
		output: Option<PathBuf>,
	},

	/// Composite one descriptor's animation to PNG frames with JSON metadata
	Animate {
		/// Input DNA descriptor table path
		#[arg(value_name = "TABLE")]
		table: PathBuf,

		/// Descriptor index to composite (0-based)
		#[arg(value_name = "INDEX")]
		index: usize,

		/// Descriptor table family
		#[arg(short, long, value_enum)]
		kind: TableKind,

		/// Paths to the companion EPF sheets, in frame-index order
		#[arg(short, long = "sheet", value_name = "SHEET", required = true)]
		sheets: Vec<PathBuf>,

		/// Path to the companion PAL palette file
		#[arg(short, long, value_name = "PALETTE")]
		palette: PathBuf,

		/// Output directory (optional, defaults to `<table>_<INDEX>/`)
		#[arg(short, long, value_name = "OUTPUT_DIR")]
		output: Option<PathBuf>,
	},

	/// Walk a directory, decoding every DAT archive and its sprite/palette entries
	Scan {
		/// Directory to walk
		#[arg(value_name = "DIRECTORY")]
		directory: PathBuf,

		/// Archive layout variant
		#[arg(long, value_enum, default_value = "standard")]
		variant: ArchiveVariant,
	},

	/// Print an animation descriptor table
	Descriptors {
		/// Input DNA descriptor table path
		#[arg(value_name = "TABLE")]
		table: PathBuf,

		/// Descriptor table family
		#[arg(short, long, value_enum)]
		kind: TableKind,

		/// Print as JSON instead of text
		#[arg(long)]
		json: bool,

		/// Limit output to a single descriptor (0-based)
		#[arg(short, long, value_name = "INDEX")]
		index: Option<usize>,
	},
}

/// Per-step metadata for JSON serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StepMetadata {
	/// Step index within the animation
	index: usize,
	/// Display duration in ticks
	duration: u32,
	/// PNG filename of the composited step
	filename: String,
}

/// Complete animation metadata structure
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnimationMetadata {
	/// Descriptor index the animation came from
	descriptor: usize,
	/// Canvas width in pixels
	width: u32,
	/// Canvas height in pixels
	height: u32,
	/// Number of composited steps
	step_count: usize,
	/// List of step metadata
	steps: Vec<StepMetadata>,
}

/// Save an RGBA image as PNG
fn save_png(image: &RasterImage, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
	let buffer: RgbaImage = ImageBuffer::from_raw(image.width(), image.height(), image.pixels().to_vec())
		.ok_or("failed to build image buffer")?;
	buffer.save(path)?;
	Ok(())
}

/// Format the first bytes of a buffer as spaced hex lines
fn hex_preview(data: &[u8], limit: usize) -> String {
	let mut out = String::new();
	for (line, chunk) in data.iter().take(limit).collect::<Vec<_>>().chunks(16).enumerate() {
		let pairs: Vec<String> = chunk.iter().map(|byte| hex::encode([**byte])).collect();
		out.push_str(&format!("   {:04x}: {}\n", line * 16, pairs.join(" ")));
	}
	out
}

/// Handle list command
fn handle_list(archive: PathBuf, variant: ArchiveVariant) -> Result<(), Box<dyn std::error::Error>> {
	let dat = DatFile::open_variant(&archive, variant.into())?;

	println!("📦 {} ({} variant)", archive.display(), dat.variant());
	println!("   {} entries", dat.len());
	for entry in dat.entries() {
		println!("   {:<16} {:>10} bytes", entry.name, entry.size());
	}

	Ok(())
}

/// Handle extract command
fn handle_extract(
	archive: PathBuf,
	entry_name: Option<String>,
	output: Option<PathBuf>,
	variant: ArchiveVariant,
) -> Result<(), Box<dyn std::error::Error>> {
	let dat = DatFile::open_variant(&archive, variant.into())?;

	if let Some(name) = &entry_name {
		if dat.get(name).is_none() {
			return Err(format!("no entry named '{}' in {}", name, archive.display()).into());
		}
	}

	let output_dir = output.unwrap_or_else(|| {
		let stem = archive
			.file_stem()
			.map(|stem| stem.to_string_lossy().into_owned())
			.unwrap_or_else(|| "archive".to_string());
		archive.with_file_name(format!("{stem}_extracted"))
	});
	fs::create_dir_all(&output_dir)?;

	let mut written = 0usize;
	for entry in dat.entries() {
		if let Some(name) = &entry_name {
			if !entry.name.eq_ignore_ascii_case(name) {
				continue;
			}
		}
		if entry.name.contains(['/', '\\']) {
			log::warn!("skipping entry with path separator in name: {}", entry.name);
			continue;
		}
		fs::write(output_dir.join(&entry.name), &entry.data)?;
		written += 1;
	}

	println!("✓ Extracted {} -> {} ({} entries)", archive.display(), output_dir.display(), written);

	Ok(())
}

/// Handle info command
fn handle_info(
	input: PathBuf,
	hex: bool,
	variant: ArchiveVariant,
	kind: Option<TableKind>,
) -> Result<(), Box<dyn std::error::Error>> {
	let data = fs::read(&input)?;

	println!("📄 {}", input.display());
	println!("   Size: {} bytes ({:.2} KB)", data.len(), data.len() as f64 / 1024.0);

	if hex {
		println!("\n🔍 Head:");
		print!("{}", hex_preview(&data, 64));
	}

	let extension = input
		.extension()
		.map(|ext| ext.to_string_lossy().to_lowercase())
		.unwrap_or_default();

	match extension.as_str() {
		"dat" => {
			let dat = DatFile::from_bytes_variant(&data, variant.into())?;
			println!("\n📊 Archive ({} variant):", dat.variant());
			println!("   Entries: {}", dat.len());
			for entry in dat.entries() {
				println!("   {:<16} {:>10} bytes", entry.name, entry.size());
			}
		}
		"pal" => {
			let palettes = PalFile::from_bytes(&data)?;
			println!("\n📊 Palette:");
			println!("   Sub-palettes: {}", palettes.sub_palette_count());
			println!("   Animated color offsets: {}", palettes.animation_offsets().len());
		}
		"epf" => {
			let sheet = EpfFile::from_bytes(&data)?;
			println!("\n📊 Sprite sheet:");
			println!("   Frames: {}", sheet.frame_count());
			println!("   Nominal size: {}x{}", sheet.width(), sheet.height());
			println!("   Flags: {:#06x}", sheet.flags());
			for (index, entry) in sheet.entries().iter().enumerate() {
				println!(
					"   Frame {:3}: {}x{} at ({}, {})",
					index,
					entry.width(),
					entry.height(),
					entry.left,
					entry.top
				);
			}
		}
		"dna" | "dsc" => {
			let Some(kind) = kind else {
				return Err("descriptor tables need --kind mob|part".into());
			};
			let table = DnaFile::from_bytes(&data, kind.into())?;
			println!("\n📊 {table}");
		}
		other => {
			println!("\n⚠ Unrecognized extension {other:?}; use --hex to inspect raw bytes");
		}
	}

	Ok(())
}

/// Handle render command
fn handle_render(
	sheet: PathBuf,
	palette: PathBuf,
	index: usize,
	sub_palette: usize,
	cycle_offset: i32,
	output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
	let sheet_file = EpfFile::open(&sheet)?;
	let palettes = PalFile::open(&palette)?;

	let frame = sheet_file.frame(index)?;
	let image = rasterize(&frame, &palettes, sub_palette, cycle_offset);

	let output = output.unwrap_or_else(|| PathBuf::from(format!("frame_{index:03}.png")));
	save_png(&image, &output)?;

	println!(
		"✓ Rendered frame {} of {} -> {} ({}x{})",
		index,
		sheet.display(),
		output.display(),
		image.width(),
		image.height()
	);

	Ok(())
}

/// Handle animate command
fn handle_animate(
	table: PathBuf,
	index: usize,
	kind: TableKind,
	sheets: Vec<PathBuf>,
	palette: PathBuf,
	output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
	let table_file = DnaFile::open(&table, kind.into())?;
	let palettes = PalFile::open(&palette)?;
	let mut sheet_files = Vec::with_capacity(sheets.len());
	for path in &sheets {
		sheet_files.push(EpfFile::open(path)?);
	}

	let animation = match kind {
		TableKind::Mob => MobRenderer::new(table_file, sheet_files, palettes).render_animation(index)?,
		TableKind::Part => PartRenderer::new(table_file, sheet_files, palettes).render_animation(index)?,
	};

	if animation.is_empty() {
		println!("⚠ Descriptor {index} has nothing to display");
		return Ok(());
	}

	let output_dir = output.unwrap_or_else(|| {
		let stem = table
			.file_stem()
			.map(|stem| stem.to_string_lossy().into_owned())
			.unwrap_or_else(|| "animation".to_string());
		table.with_file_name(format!("{stem}_{index:03}"))
	});
	fs::create_dir_all(&output_dir)?;

	let mut metadata = AnimationMetadata {
		descriptor: index,
		width: animation[0].image.width(),
		height: animation[0].image.height(),
		step_count: animation.len(),
		steps: Vec::new(),
	};

	for (step, timed) in animation.iter().enumerate() {
		let filename = format!("step_{step:03}.png");
		save_png(&timed.image, &output_dir.join(&filename))?;
		metadata.steps.push(StepMetadata {
			index: step,
			duration: timed.duration,
			filename,
		});
	}

	let metadata_path = output_dir.join("metadata.json");
	fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)?;

	println!(
		"✓ Composited descriptor {} -> {} ({} steps, {}x{})",
		index,
		output_dir.display(),
		metadata.step_count,
		metadata.width,
		metadata.height
	);

	Ok(())
}

/// Handle scan command
fn handle_scan(directory: PathBuf, variant: ArchiveVariant) -> Result<(), Box<dyn std::error::Error>> {
	println!("🔍 Scanning {}", directory.display());

	let mut archives = 0usize;
	let mut sheets = 0usize;
	let mut palettes = 0usize;
	let mut failures = 0usize;

	for entry in WalkDir::new(&directory) {
		let entry = entry?;
		if !entry.file_type().is_file() {
			continue;
		}
		let is_archive = entry
			.path()
			.extension()
			.is_some_and(|ext| ext.eq_ignore_ascii_case("dat"));
		if !is_archive {
			continue;
		}

		let dat = match DatFile::open_variant(entry.path(), variant.into()) {
			Ok(dat) => dat,
			Err(error) => {
				log::warn!("{}: {error}", entry.path().display());
				failures += 1;
				continue;
			}
		};
		archives += 1;

		let sprite_scan = dat.extract_sprites();
		let palette_scan = dat.extract_palettes();
		for (name, error) in sprite_scan.failures.iter().chain(palette_scan.failures.iter()) {
			log::warn!("{}: {name}: {error}", entry.path().display());
			failures += 1;
		}

		println!(
			"   {}: {} entries, {} sheet(s), {} palette(s)",
			entry.path().display(),
			dat.len(),
			sprite_scan.loaded.len(),
			palette_scan.loaded.len()
		);
		sheets += sprite_scan.loaded.len();
		palettes += palette_scan.loaded.len();
	}

	println!("\n📊 Summary:");
	println!("   Archives: {archives}");
	println!("   Sprite sheets: {sheets}");
	println!("   Palettes: {palettes}");
	if failures > 0 {
		println!("   ⚠ Failures: {failures} (see warnings)");
	}

	Ok(())
}

/// Handle descriptors command
fn handle_descriptors(
	table: PathBuf,
	kind: TableKind,
	json: bool,
	index: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
	let file = DnaFile::open(&table, kind.into())?;

	match (json, index) {
		(true, Some(index)) => {
			let descriptor = file.get(index).ok_or("descriptor index out of range")?;
			println!("{}", serde_json::to_string_pretty(descriptor)?);
		}
		(true, None) => {
			println!("{}", serde_json::to_string_pretty(file.descriptors())?);
		}
		(false, Some(index)) => {
			let descriptor = file.get(index).ok_or("descriptor index out of range")?;
			println!(
				"Descriptor {}: base frame {}, palette {}, marker {:#04x}",
				index, descriptor.base_frame, descriptor.palette_id, descriptor.marker
			);
			for (chunk_index, chunk) in descriptor.chunks.iter().enumerate() {
				println!("  Chunk {chunk_index} ({} block(s)):", chunk.blocks.len());
				for block in &chunk.blocks {
					println!(
						"    frame {:+}, duration {}, transparency {}",
						block.frame_offset, block.duration, block.transparency
					);
				}
			}
		}
		(false, None) => {
			print!("{file}");
		}
	}

	Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();

	let cli = Cli::parse();

	match cli.command {
		Commands::List {
			archive,
			variant,
		} => handle_list(archive, variant),

		Commands::Extract {
			archive,
			entry,
			output,
			variant,
		} => handle_extract(archive, entry, output, variant),

		Commands::Info {
			input,
			hex,
			variant,
			kind,
		} => handle_info(input, hex, variant, kind),

		Commands::Render {
			sheet,
			palette,
			index,
			sub_palette,
			cycle_offset,
			output,
		} => handle_render(sheet, palette, index, sub_palette, cycle_offset, output),

		Commands::Animate {
			table,
			index,
			kind,
			sheets,
			palette,
			output,
		} => handle_animate(table, index, kind, sheets, palette, output),

		Commands::Scan {
			directory,
			variant,
		} => handle_scan(directory, variant),

		Commands::Descriptors {
			table,
			kind,
			json,
			index,
		} => handle_descriptors(table, kind, json, index),
	}
}
