use {std::path::PathBuf, thiserror::Error};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	#[error("Missing: {}", .0.display())]
	MissingDescriptor(PathBuf),

	#[error("Missing object image referenced by tsj: {}", .0.display())]
	MissingImage(PathBuf),

	#[error("No images found in {}", .0.display())]
	NoImages(PathBuf),

	#[error("{}: padded width {paddedWidth}px exceeds the {maxWidth}px sheet width", path.display())]
	ImageTooWide { path: PathBuf, paddedWidth: usize, maxWidth: usize },

	#[error("a {blockWidth}-tile wide block does not fit a {catalogWidth}-tile wide catalog")]
	CatalogTooNarrow { blockWidth: usize, catalogWidth: usize },

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("{}: {source}", path.display())]
	Io { path: PathBuf, source: std::io::Error },

	#[error("{}: {source}", path.display())]
	Json { path: PathBuf, source: serde_json::Error },

	#[error("{}: {source}", path.display())]
	PngDecode { path: PathBuf, source: png::DecodingError },

	#[error("{}: {source}", path.display())]
	PngEncode { path: PathBuf, source: png::EncodingError },

	#[error("{}: unsupported PNG layout {colorType:?} at {bitDepth:?}", path.display())]
	UnsupportedPng { path: PathBuf, colorType: png::ColorType, bitDepth: png::BitDepth },
}
