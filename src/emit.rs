//! The three text outputs derived from a packed layout: the grid tileset (`.tsj`), the CSV index
//! and the catalog map (`.tmj`).

use {
	crate::{
		config::CATALOG_TILESET_SOURCE, createParentDir, packer::Placement, Error, MaxAssign_Ext, Result, Vec2,
		HEIGHT, WIDTH, X, Y,
	},
	serde::Serialize,
	std::{
		borrow::Cow,
		fs::File,
		io::{self, BufWriter, Write},
		path::Path,
	},
	tracing::debug,
};

pub const FIRSTGID: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetTileset {
	pub r#type: &'static str,
	pub name: String,
	pub tilewidth: usize,
	pub tileheight: usize,
	pub spacing: usize,
	pub margin: usize,
	pub columns: usize,
	pub tilecount: usize,
	pub image: String,
	pub imagewidth: usize,
	pub imageheight: usize,
}

impl SheetTileset {
	pub fn new(name: &str, image: &str, tileSize: usize, atlasDimensions: Vec2) -> Self {
		let [columns, rows] = atlasDimensions.map(|dimension| dimension / tileSize);
		Self {
			r#type: "tileset",
			name: name.into(),
			tilewidth: tileSize,
			tileheight: tileSize,
			spacing: 0,
			margin: 0,
			columns,
			tilecount: columns * rows,
			image: image.into(),
			imagewidth: atlasDimensions[WIDTH],
			imageheight: atlasDimensions[HEIGHT],
		}
	}

	pub fn rows(&self) -> usize {
		self.imageheight / self.tileheight
	}

	/// Row-major gid of the atlas cell at `tilePoint`.
	pub fn gid(&self, tilePoint: Vec2) -> usize {
		FIRSTGID + tilePoint[Y] * self.columns + tilePoint[X]
	}
}

pub fn writeJSON<T: Serialize>(path: &Path, value: &T) -> Result<()> {
	createParentDir(path)?;
	let ioErr = |source| Error::Io { path: path.to_owned(), source };
	let mut writer = BufWriter::new(File::create(path).map_err(ioErr)?);
	serde_json::to_writer_pretty(&mut writer, value).map_err(|source| Error::Json { path: path.to_owned(), source })?;
	writer.flush().map_err(ioErr)
}

pub const INDEX_CSV_HEADER: [&str; 7] = ["name", "x_tile", "y_tile", "w_tiles", "h_tiles", "orig_w", "orig_h"];

fn csvField(field: &str) -> Cow<'_, str> {
	if field.contains([',', '"', '\r', '\n']) {
		Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
	} else {
		Cow::Borrowed(field)
	}
}

fn writeCSVRecord<W: Write>(writer: &mut W, record: &[&str]) -> io::Result<()> {
	for (i, field) in record.iter().enumerate() {
		if i != 0 {
			writer.write_all(b",")?;
		}
		writer.write_all(csvField(field).as_bytes())?;
	}
	writer.write_all(b"\r\n")
}

/// One record per placement, in pack order; tile columns are in tiles, `orig_*` in pixels.
pub fn writeIndex<W: Write>(writer: &mut W, placements: &[Placement], tileSize: usize) -> io::Result<()> {
	writeCSVRecord(writer, &INDEX_CSV_HEADER)?;
	for placement in placements {
		let [point, dimensions] = placement.tileRect(tileSize);
		let numbers = [point[X], point[Y], dimensions[WIDTH], dimensions[HEIGHT]]
			.into_iter()
			.chain(placement.origDimensions)
			.map(|number| number.to_string())
			.collect::<Vec<_>>();
		let mut record = Vec::with_capacity(INDEX_CSV_HEADER.len());
		record.push(placement.name.as_str());
		record.extend(numbers.iter().map(String::as_str));
		writeCSVRecord(writer, &record)?;
	}
	Ok(())
}

pub fn writeIndexCSV(path: &Path, placements: &[Placement], tileSize: usize) -> Result<()> {
	createParentDir(path)?;
	let ioErr = |source| Error::Io { path: path.to_owned(), source };
	let mut writer = BufWriter::new(File::create(path).map_err(ioErr)?);
	writeIndex(&mut writer, placements, tileSize).map_err(ioErr)?;
	writer.flush().map_err(ioErr)
}

/// Shelf layout of whole tile blocks on a `catalogWidth`-tile wide map, one empty tile between
/// neighbours and one empty row between shelves. Returns each block's top-left tile and the
/// used height, which keeps two spare rows below the last shelf.
pub fn catalogLayout(blockDimensions: &[Vec2], catalogWidth: usize) -> Result<(Vec<Vec2>, usize)> {
	let (mut point, mut rowHeight, mut origins) =
		([0_usize; 2], 0_usize, Vec::with_capacity(blockDimensions.len()));
	for &dimensions in blockDimensions {
		if dimensions[WIDTH] > catalogWidth {
			return Err(Error::CatalogTooNarrow { blockWidth: dimensions[WIDTH], catalogWidth });
		}
		if point[X] + dimensions[WIDTH] > catalogWidth {
			point = [0, point[Y] + rowHeight + 1];
			rowHeight = 0;
		}
		origins.push(point);
		point[X] += dimensions[WIDTH] + 1;
		rowHeight.maxAssign(dimensions[HEIGHT]);
	}
	let usedHeight = (point[Y] + rowHeight + 2).max(1);
	Ok((origins, usedHeight))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogMap {
	pub r#type: &'static str,
	pub version: &'static str,
	pub tiledversion: &'static str,
	pub orientation: &'static str,
	pub renderorder: &'static str,
	pub infinite: bool,
	pub tilewidth: usize,
	pub tileheight: usize,
	pub width: usize,
	pub height: usize,
	pub layers: Vec<TileLayer>,
	pub tilesets: Vec<TilesetRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
	pub r#type: &'static str,
	pub name: &'static str,
	pub width: usize,
	pub height: usize,
	pub opacity: usize,
	pub visible: bool,
	pub data: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TilesetRef {
	pub firstgid: usize,
	pub source: &'static str,
}

impl CatalogMap {
	/// Lays out every placement's full tile block so it can be box-selected in the editor.
	/// Cell values are gids into `sheet`; 0 is empty.
	pub fn new(sheet: &SheetTileset, placements: &[Placement], catalogWidth: usize) -> Result<Self> {
		let tileSize = sheet.tilewidth;
		let rects = placements.iter().map(|placement| placement.tileRect(tileSize)).collect::<Vec<_>>();
		let (origins, height) =
			catalogLayout(&rects.iter().map(|&[_, dimensions]| dimensions).collect::<Vec<_>>(), catalogWidth)?;
		let mut data = vec![0; catalogWidth * height];
		for (&[srcPoint, dimensions], origin) in rects.iter().zip(origins) {
			debug!(?srcPoint, ?origin, "catalog block");
			for dy in 0..dimensions[HEIGHT] {
				for dx in 0..dimensions[WIDTH] {
					data[(origin[Y] + dy) * catalogWidth + origin[X] + dx] =
						sheet.gid([srcPoint[X] + dx, srcPoint[Y] + dy]);
				}
			}
		}
		Ok(Self {
			r#type: "map",
			version: "1.10",
			tiledversion: "1.10.2",
			orientation: "orthogonal",
			renderorder: "right-down",
			infinite: false,
			tilewidth: tileSize,
			tileheight: tileSize,
			width: catalogWidth,
			height,
			layers: vec![TileLayer {
				r#type: "tilelayer",
				name: "catalog",
				width: catalogWidth,
				height,
				opacity: 1,
				visible: true,
				data,
			}],
			tilesets: vec![TilesetRef { firstgid: FIRSTGID, source: CATALOG_TILESET_SOURCE }],
		})
	}
}
