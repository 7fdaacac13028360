//! RGBA raster buffer and the PNG reading/writing around it.

use {
	crate::{createParentDir, packer::Placement, Error, Result, Vec2, HEIGHT, WIDTH, X, Y},
	png::{BitDepth, ColorType, Transformations},
	std::{
		fs::File,
		io::{BufReader, BufWriter, Read, Write},
		path::Path,
	},
	tracing::debug,
};

const RGBA: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
	pub width: usize,
	pub height: usize,
	pub data: Vec<u8>,
}

impl Image {
	/// Fully transparent.
	pub fn fromWidthHeight(width: usize, height: usize) -> Self {
		Self { width, height, data: vec![0; width * height * RGBA] }
	}

	pub fn dimensions(&self) -> Vec2 {
		[self.width, self.height]
	}

	/// Decodes any PNG into 8-bit RGBA: palettes and tRNS are expanded, 16-bit channels stripped,
	/// gray replicated, and a missing alpha channel filled opaque.
	pub fn fromPNG<R: Read>(reader: R) -> core::result::Result<Self, PngReadError> {
		let mut decoder = png::Decoder::new(reader);
		decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
		let mut png = decoder.read_info()?;
		let mut buffer = vec![0; png.output_buffer_size()];
		let frame = png.next_frame(&mut buffer)?;
		let (width, height) = (frame.width as usize, frame.height as usize);
		let channels = match (frame.color_type, frame.bit_depth) {
			(ColorType::Grayscale, BitDepth::Eight) => 1,
			(ColorType::GrayscaleAlpha, BitDepth::Eight) => 2,
			(ColorType::Rgb, BitDepth::Eight) => 3,
			(ColorType::Rgba, BitDepth::Eight) => 4,
			(colorType, bitDepth) => return Err(PngReadError::Unsupported(colorType, bitDepth)),
		};
		let mut image = Self::fromWidthHeight(width, height);
		let (mut i, lineSize) = (0, frame.line_size);
		for line in buffer[..frame.buffer_size()].chunks_exact(lineSize) {
			for pixel in line[..width * channels].chunks_exact(channels) {
				let rgba = &mut image.data[i..i + RGBA];
				match *pixel {
					[gray] => rgba.copy_from_slice(&[gray, gray, gray, u8::MAX]),
					[gray, alpha] => rgba.copy_from_slice(&[gray, gray, gray, alpha]),
					[r, g, b] => rgba.copy_from_slice(&[r, g, b, u8::MAX]),
					_ => rgba.copy_from_slice(pixel),
				}
				i += RGBA;
			}
		}
		Ok(image)
	}

	pub fn open(path: &Path) -> Result<Self> {
		let file = File::open(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
		Self::fromPNG(BufReader::new(file)).map_err(|err| match err {
			PngReadError::Decoding(source) => Error::PngDecode { path: path.to_owned(), source },
			PngReadError::Unsupported(colorType, bitDepth) => {
				Error::UnsupportedPng { path: path.to_owned(), colorType, bitDepth }
			}
		})
	}

	/// Copies `srcDimensions` pixels of `src` from `srcPoint` to `destPoint`, clipped to both images.
	/// Alpha is copied as is, not blended.
	pub fn blitPixelsRectangle(&mut self, destPoint: Vec2, srcDimensions: Vec2, src: &Image, srcPoint: Vec2) {
		let width = srcDimensions[WIDTH]
			.min(src.width.saturating_sub(srcPoint[X]))
			.min(self.width.saturating_sub(destPoint[X]));
		let height = srcDimensions[HEIGHT]
			.min(src.height.saturating_sub(srcPoint[Y]))
			.min(self.height.saturating_sub(destPoint[Y]));
		if width == 0 {
			return;
		}
		for y in 0..height {
			let srcStart = ((srcPoint[Y] + y) * src.width + srcPoint[X]) * RGBA;
			let destStart = ((destPoint[Y] + y) * self.width + destPoint[X]) * RGBA;
			self.data[destStart..destStart + width * RGBA]
				.copy_from_slice(&src.data[srcStart..srcStart + width * RGBA]);
		}
	}

	/// Allocates a transparent atlas and copies every placement's image into its slot.
	/// Each source is decoded and dropped in turn.
	pub fn render(dimensions: Vec2, placements: &[Placement]) -> Result<Self> {
		let mut atlas = Self::fromWidthHeight(dimensions[WIDTH], dimensions[HEIGHT]);
		for placement in placements {
			let src = Self::open(&placement.path)?;
			debug!(name = %placement.name, point = ?placement.slot.point, "blit");
			atlas.blitPixelsRectangle(placement.slot.point, placement.slot.dimensions, &src, [0, 0]);
		}
		Ok(atlas)
	}

	pub fn writePNG<W: Write>(&self, writer: W) -> core::result::Result<(), png::EncodingError> {
		let mut png = png::Encoder::new(writer, self.width as _, self.height as _);
		png.set_color(ColorType::Rgba);
		png.set_depth(BitDepth::Eight);
		let mut png = png.write_header()?;
		png.write_image_data(&self.data)?;
		png.finish()
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		createParentDir(path)?;
		let file = File::create(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
		self.writePNG(BufWriter::new(file)).map_err(|source| Error::PngEncode { path: path.to_owned(), source })
	}
}

#[derive(Debug, thiserror::Error)]
pub enum PngReadError {
	#[error(transparent)]
	Decoding(#[from] png::DecodingError),

	#[error("unsupported PNG layout {0:?} at {1:?}")]
	Unsupported(ColorType, BitDepth),
}
