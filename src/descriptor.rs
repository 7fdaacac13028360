//! The Tiled image-collection tileset (`.tsj`) this tool reads.

use {
	crate::{Error, Result, Vec2},
	serde::Deserialize,
	std::{
		env,
		fs::{self, File},
		io::BufReader,
		path::{Component, Path, PathBuf},
	},
	tracing::debug,
};

#[derive(Debug, Default, Deserialize)]
pub struct ObjectsTileset {
	#[serde(default)]
	pub tiles: Vec<Tile>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Tile {
	#[serde(default)]
	pub image: Option<String>,
}

/// A referenced image that exists on disk, with its size read from the PNG header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
	pub name: String,
	pub path: PathBuf,
	pub dimensions: Vec2,
}

pub fn baseDir(tsjPath: &Path) -> &Path {
	tsjPath.parent().unwrap_or_else(|| Path::new(""))
}

/// Absolute form of `path` with `.` and `..` folded away, without touching the filesystem, so
/// a file that does not exist can still be reported by its real location.
pub fn absolutize(path: &Path) -> PathBuf {
	let joined;
	let path = if path.is_absolute() {
		path
	} else {
		joined = env::current_dir().unwrap_or_default().join(path);
		&joined
	};
	let mut normal = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				normal.pop();
			}
			component => normal.push(component),
		}
	}
	normal
}

impl ObjectsTileset {
	pub fn load(path: &Path) -> Result<Self> {
		if !path.exists() {
			return Err(Error::MissingDescriptor(path.to_owned()));
		}
		let text = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
		Self::fromStr(&text).map_err(|source| Error::Json { path: path.to_owned(), source })
	}

	pub fn fromStr(text: &str) -> serde_json::Result<Self> {
		serde_json::from_str(text)
	}

	/// Image references in tile order, skipping tiles without one. Empty strings count as absent.
	pub fn imageRefs(&self) -> impl Iterator<Item = &str> {
		self.tiles.iter().filter_map(|tile| tile.image.as_deref()).filter(|image| !image.is_empty())
	}

	/// Resolves every image reference against the directory of `tsjPath` and probes its size.
	/// Fails on the first missing file, or when the tileset references no image at all.
	pub fn resolveImages(&self, tsjPath: &Path) -> Result<Vec<SourceImage>> {
		let baseDir = baseDir(tsjPath);
		let mut sources = Vec::with_capacity(self.tiles.len());
		for imageRef in self.imageRefs() {
			let path = baseDir.join(imageRef);
			if !path.exists() {
				return Err(Error::MissingImage(absolutize(&path)));
			}
			let path = fs::canonicalize(&path).map_err(|source| Error::Io { path, source })?;
			sources.push(SourceImage::probe(path)?);
		}
		if sources.is_empty() {
			return Err(Error::NoImages(tsjPath.to_owned()));
		}
		Ok(sources)
	}
}

impl SourceImage {
	/// Reads only the PNG header; pixels are decoded later, once, while rendering the atlas.
	pub fn probe(path: PathBuf) -> Result<Self> {
		let file = File::open(&path).map_err(|source| Error::Io { path: path.clone(), source })?;
		let reader = match png::Decoder::new(BufReader::new(file)).read_info() {
			Ok(reader) => reader,
			Err(source) => return Err(Error::PngDecode { path, source }),
		};
		let info = reader.info();
		let dimensions = [info.width as usize, info.height as usize];
		let name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
		debug!(%name, ?dimensions, "probed");
		Ok(Self { name, path, dimensions })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tiles_without_image_are_skipped() {
		let tileset = ObjectsTileset::fromStr(
			r#"{
				"type": "tileset",
				"tiles": [
					{ "id": 0, "image": "../objects/bench.png", "imagewidth": 40 },
					{ "id": 1 },
					{ "id": 2, "image": "" },
					{ "id": 3, "image": "../objects/lamp.png" }
				]
			}"#,
		)
		.unwrap();
		assert_eq!(tileset.imageRefs().collect::<Vec<_>>(), ["../objects/bench.png", "../objects/lamp.png"]);
	}

	#[test]
	fn missing_tiles_array_means_no_images() {
		let tileset = ObjectsTileset::fromStr(r#"{ "name": "hku_objects" }"#).unwrap();
		assert_eq!(tileset.imageRefs().count(), 0);
		let dir = tempfile::tempdir().unwrap();
		assert!(matches!(tileset.resolveImages(&dir.path().join("hku_objects.tsj")), Err(Error::NoImages(_))));
	}

	#[test]
	fn missing_image_is_named() {
		let tileset = ObjectsTileset::fromStr(r#"{ "tiles": [ { "image": "ghost.png" } ] }"#).unwrap();
		let dir = tempfile::tempdir().unwrap();
		match tileset.resolveImages(&dir.path().join("hku_objects.tsj")) {
			Err(Error::MissingImage(path)) => {
				assert!(path.is_absolute());
				assert!(!path.components().any(|component| component == Component::ParentDir));
				assert!(path.ends_with("ghost.png"));
			}
			other => panic!("{other:?}"),
		}
	}

	#[test]
	fn missing_image_is_reported_resolved() {
		let tileset = ObjectsTileset::fromStr(r#"{ "tiles": [ { "image": "../objects/ghost.png" } ] }"#).unwrap();
		let dir = tempfile::tempdir().unwrap();
		let tsj = dir.path().join("public/tilesets/hku_objects.tsj");
		match tileset.resolveImages(&tsj) {
			Err(Error::MissingImage(path)) => assert_eq!(path, absolutize(&dir.path().join("public/objects/ghost.png"))),
			other => panic!("{other:?}"),
		}
	}

	#[test]
	fn absolutize_folds_dot_segments() {
		assert_eq!(absolutize(Path::new("/p/public/tilesets/./../objects/a.png")), Path::new("/p/public/objects/a.png"));
		assert!(absolutize(Path::new("public/objects/a.png")).is_absolute());
	}

	#[test]
	fn missing_descriptor_is_fatal() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("hku_objects.tsj");
		assert!(matches!(ObjectsTileset::load(&path), Err(Error::MissingDescriptor(p)) if p == path));
	}

	#[test]
	fn malformed_descriptor_is_a_json_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("hku_objects.tsj");
		fs::write(&path, "{ \"tiles\": [").unwrap();
		assert!(matches!(ObjectsTileset::load(&path), Err(Error::Json { .. })));
	}
}
