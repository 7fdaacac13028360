#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

pub mod atlas;
pub mod config;
pub mod descriptor;
pub mod emit;
pub mod error;
pub mod packer;

pub use {
	config::Config,
	error::{Error, Result},
};

use {
	std::{
		fs,
		io::{self, Write},
		path::{Path, PathBuf},
	},
	tracing::info,
};

pub type Vec2 = [usize; 2];
pub const X: usize = 0;
pub const Y: usize = 1;
pub const WIDTH: usize = 0;
pub const HEIGHT: usize = 1;

pub trait CeilToMultipleExt {
	fn ceilToMultiple(self, of: Self) -> Self;
}
impl CeilToMultipleExt for usize {
	#[inline]
	fn ceilToMultiple(self, of: Self) -> Self {
		self.div_ceil(of) * of
	}
}

#[allow(non_camel_case_types)]
pub trait MaxAssign_Ext {
	fn maxAssign(&mut self, other: Self);
}
impl<T: Copy + Ord> MaxAssign_Ext for T {
	#[inline]
	fn maxAssign(&mut self, other: Self) {
		*self = (*self).max(other);
	}
}

pub(crate) fn createParentDir(path: &Path) -> Result<()> {
	match path.parent() {
		Some(dir) if !dir.as_os_str().is_empty() => {
			fs::create_dir_all(dir).map_err(|source| Error::Io { path: dir.to_owned(), source })
		}
		_ => Ok(()),
	}
}

/// Paths of the four files a successful run regenerates, in the order they are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
	pub atlasPNG: PathBuf,
	pub sheetTSJ: PathBuf,
	pub indexCSV: PathBuf,
	pub catalogTMJ: PathBuf,
}

impl Generated {
	pub fn paths(&self) -> [&Path; 4] {
		[&self.atlasPNG, &self.sheetTSJ, &self.indexCSV, &self.catalogTMJ]
	}
}

/// Runs the whole conversion: load and validate the image-collection tileset, pack,
/// render the atlas, then write the grid tileset, the CSV index and the catalog map.
///
/// Nothing is written unless every referenced image exists and at least one does.
pub fn run(config: &Config) -> Result<Generated> {
	config.validate()?;
	let srcTSJ = config.sourceTSJ();
	let sources = descriptor::ObjectsTileset::load(&srcTSJ)?.resolveImages(&srcTSJ)?;
	info!(images = sources.len(), "validated {}", srcTSJ.display());

	let layout = packer::packSources(&sources, config.tileSize, config.maxSheetWidth)?;
	info!(width = layout.dimensions[WIDTH], height = layout.dimensions[HEIGHT], "packed atlas");
	let placements = packer::intoPlacements(&sources, &layout);

	let generated = Generated {
		atlasPNG: config.atlasPNG(),
		sheetTSJ: config.sheetTSJ(),
		indexCSV: config.indexCSV(),
		catalogTMJ: config.catalogTMJ(),
	};

	let sheet = emit::SheetTileset::new(config::SHEET_NAME, config::SHEET_PNG_NAME, config.tileSize, layout.dimensions);
	// laid out before any write so a block too wide for the catalog leaves no outputs behind
	let catalog = emit::CatalogMap::new(&sheet, &placements, config.catalogWidth)?;

	atlas::Image::render(layout.dimensions, &placements)?.save(&generated.atlasPNG)?;
	emit::writeJSON(&generated.sheetTSJ, &sheet)?;
	emit::writeIndexCSV(&generated.indexCSV, &placements, config.tileSize)?;
	emit::writeJSON(&generated.catalogTMJ, &catalog)?;
	info!(height = catalog.height, "wrote catalog map");

	Ok(generated)
}

/// Writes the one-line message a failed run ends with. It goes straight to `writer`, so the
/// reason for a non-zero exit survives any log filter.
pub fn reportFatal<W: Write>(writer: &mut W, err: &Error) -> io::Result<()> {
	writeln!(writer, "error: {err}")
}
