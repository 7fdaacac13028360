use {
	crate::{Error, Result},
	const_format::concatcp,
	std::path::{Path, PathBuf},
};

pub const TILE: usize = 32;
pub const MAX_SHEET_WIDTH_PX: usize = 3072;
pub const CATALOG_WIDTH_TILES: usize = 120;

pub const SHEET_NAME: &str = "hku_objects_sheet";
pub const SHEET_PNG_NAME: &str = concatcp!(SHEET_NAME, ".png");

const PUBLIC: &str = "public";
const TILESETS: &str = concatcp!(PUBLIC, "/tilesets");
const MAPS: &str = concatcp!(PUBLIC, "/maps");

pub const SRC_TSJ: &str = concatcp!(TILESETS, "/hku_objects.tsj");
pub const OUT_PNG: &str = concatcp!(TILESETS, "/", SHEET_PNG_NAME);
pub const OUT_TSJ: &str = concatcp!(TILESETS, "/", SHEET_NAME, ".tsj");
pub const OUT_CSV: &str = concatcp!(TILESETS, "/", SHEET_NAME, "_index.csv");
pub const OUT_CATALOG: &str = concatcp!(MAPS, "/hku_objects_catalog.tmj");

/// Where the catalog map finds the sheet tileset, relative to the maps directory.
pub const CATALOG_TILESET_SOURCE: &str = concatcp!("../tilesets/", SHEET_NAME, ".tsj");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Project root; every input and output path hangs off `<root>/public`.
	pub root: PathBuf,
	pub tileSize: usize,
	pub maxSheetWidth: usize,
	/// Catalog map width, in tiles.
	pub catalogWidth: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self::new(".")
	}
}

impl Config {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			tileSize: TILE,
			maxSheetWidth: MAX_SHEET_WIDTH_PX,
			catalogWidth: CATALOG_WIDTH_TILES,
		}
	}

	pub fn validate(&self) -> Result<()> {
		if self.tileSize == 0 {
			return Err(Error::Config("tile size must be positive".into()));
		}
		if self.maxSheetWidth < self.tileSize {
			return Err(Error::Config(format!(
				"max sheet width {}px is narrower than one {}px tile",
				self.maxSheetWidth, self.tileSize
			)));
		}
		if self.catalogWidth == 0 {
			return Err(Error::Config("catalog width must be positive".into()));
		}
		Ok(())
	}

	fn join(&self, relative: &str) -> PathBuf {
		self.root.join(Path::new(relative))
	}

	pub fn sourceTSJ(&self) -> PathBuf {
		self.join(SRC_TSJ)
	}
	pub fn atlasPNG(&self) -> PathBuf {
		self.join(OUT_PNG)
	}
	pub fn sheetTSJ(&self) -> PathBuf {
		self.join(OUT_TSJ)
	}
	pub fn indexCSV(&self) -> PathBuf {
		self.join(OUT_CSV)
	}
	pub fn catalogTMJ(&self) -> PathBuf {
		self.join(OUT_CATALOG)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_layout_hangs_off_public() {
		let config = Config::new("/project");
		assert_eq!(config.sourceTSJ(), Path::new("/project/public/tilesets/hku_objects.tsj"));
		assert_eq!(config.atlasPNG(), Path::new("/project/public/tilesets/hku_objects_sheet.png"));
		assert_eq!(config.sheetTSJ(), Path::new("/project/public/tilesets/hku_objects_sheet.tsj"));
		assert_eq!(config.indexCSV(), Path::new("/project/public/tilesets/hku_objects_sheet_index.csv"));
		assert_eq!(config.catalogTMJ(), Path::new("/project/public/maps/hku_objects_catalog.tmj"));
	}

	#[test]
	fn defaults_are_valid() {
		Config::default().validate().unwrap();
	}

	#[test]
	fn zero_tile_size_is_rejected() {
		let config = Config { tileSize: 0, ..Config::default() };
		assert!(matches!(config.validate(), Err(Error::Config(_))));
	}

	#[test]
	fn a_sheet_wider_than_the_catalog_is_allowed() {
		// only real blocks are checked against the catalog width, when it is laid out
		Config { maxSheetWidth: 4000, ..Config::default() }.validate().unwrap();
	}

	#[test]
	fn zero_catalog_width_is_rejected() {
		let config = Config { catalogWidth: 0, ..Config::default() };
		assert!(matches!(config.validate(), Err(Error::Config(_))));
	}
}
