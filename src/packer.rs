//! Shelf packing on a tile grid.
//!
//! Images go left to right in input order; a row closes when the next padded image would cross
//! the sheet width, and the next row starts below the tallest image of the closed one. Nothing
//! here touches pixels or the filesystem.

use {
	crate::{descriptor::SourceImage, CeilToMultipleExt, Error, MaxAssign_Ext, Result, Vec2, HEIGHT, WIDTH, X, Y},
	std::path::PathBuf,
	tracing::debug,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("image #{index}: padded width {paddedWidth}px exceeds the {maxWidth}px sheet width")]
pub struct TooWide {
	pub index: usize,
	pub paddedWidth: usize,
	pub maxWidth: usize,
}

/// Position and padded size of one image, in pixels. Both are tile multiples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
	pub point: Vec2,
	pub dimensions: Vec2,
}

/// Slots in pack order plus the atlas size.
///
/// The atlas is only as wide as its widest row, so adding an object can widen it and change the
/// column count, and with it every gid of the sheet, from one run to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
	pub slots: Vec<Slot>,
	/// Atlas size: the bounding box of every slot, rounded up to the tile.
	pub dimensions: Vec2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
	pub name: String,
	pub path: PathBuf,
	pub slot: Slot,
	pub origDimensions: Vec2,
}

impl Placement {
	/// `[x, y]` of the top-left tile and `[w, h]` in tiles.
	pub fn tileRect(&self, tileSize: usize) -> [Vec2; 2] {
		let Slot { point, dimensions } = self.slot;
		[[point[X] / tileSize, point[Y] / tileSize], [dimensions[WIDTH] / tileSize, dimensions[HEIGHT] / tileSize]]
	}
}

/// Packs `sizes` (original pixel sizes, in pack order) into rows no wider than `maxWidth`,
/// itself floored to the tile. An image wider than that is an error.
pub fn pack(
	sizes: impl IntoIterator<Item = Vec2>,
	tileSize: usize,
	maxWidth: usize,
) -> core::result::Result<Layout, TooWide> {
	let maxWidth = maxWidth / tileSize * tileSize;
	let (mut point, mut rowHeight, mut atlasWidth, mut slots) = ([0_usize; 2], 0_usize, 0_usize, Vec::new());
	for (i, size) in sizes.into_iter().enumerate() {
		let dimensions = size.map(|dimension| dimension.ceilToMultiple(tileSize));
		if dimensions[WIDTH] > maxWidth {
			return Err(TooWide { index: i, paddedWidth: dimensions[WIDTH], maxWidth });
		}
		if point[X] != 0 && point[X] + dimensions[WIDTH] > maxWidth {
			point = [0, point[Y] + rowHeight];
			rowHeight = 0;
		}
		slots.push(Slot { point, dimensions });
		point[X] += dimensions[WIDTH];
		atlasWidth.maxAssign(point[X]);
		rowHeight.maxAssign(dimensions[HEIGHT]);
	}
	let dimensions = [atlasWidth, (point[Y] + rowHeight).ceilToMultiple(tileSize)];
	Ok(Layout { slots, dimensions })
}

/// Pairs every probed source with its slot. `layout` must come from packing `sources`' sizes.
pub fn intoPlacements(sources: &[SourceImage], layout: &Layout) -> Vec<Placement> {
	assert_eq!(sources.len(), layout.slots.len());
	let mut placements = Vec::with_capacity(sources.len());
	for (source, &slot) in sources.iter().zip(&layout.slots) {
		debug!(name = %source.name, point = ?slot.point, dimensions = ?slot.dimensions, "placed");
		placements.push(Placement {
			name: source.name.clone(),
			path: source.path.clone(),
			slot,
			origDimensions: source.dimensions,
		});
	}
	placements
}

/// [`pack`] over probed sources, naming the offending file when one is too wide.
pub fn packSources(sources: &[SourceImage], tileSize: usize, maxWidth: usize) -> Result<Layout> {
	pack(sources.iter().map(|source| source.dimensions), tileSize, maxWidth).map_err(
		|TooWide { index, paddedWidth, maxWidth }| Error::ImageTooWide {
			path: sources[index].path.clone(),
			paddedWidth,
			maxWidth,
		},
	)
}

#[cfg(test)]
mod tests {
	use {super::*, proptest::prelude::*};

	fn points(layout: &Layout) -> Vec<Vec2> {
		layout.slots.iter().map(|slot| slot.point).collect()
	}

	#[test]
	fn wraps_when_the_next_image_crosses_the_sheet_width() {
		// 32 + 64 > 64 closes row 0 after the first image, and 64 + 32 > 64 closes row 1
		assert_eq!(
			pack([[20, 20], [40, 10], [32, 32]], 32, 64).unwrap(),
			Layout {
				slots: vec![
					Slot { point: [0, 0], dimensions: [32, 32] },
					Slot { point: [0, 32], dimensions: [64, 32] },
					Slot { point: [0, 64], dimensions: [32, 32] },
				],
				dimensions: [64, 96],
			}
		);
	}

	#[test]
	fn row_height_is_the_tallest_image_in_the_row() {
		let layout = pack([[32, 10], [32, 70], [32, 40], [40, 1]], 32, 96).unwrap();
		assert_eq!(points(&layout), [[0, 0], [32, 0], [64, 0], [0, 96]]);
		assert_eq!(layout.dimensions, [96, 128]);
	}

	#[test]
	fn atlas_width_is_the_bounding_box_not_the_maximum() {
		let layout = pack([[10, 10], [33, 5]], 32, 3072).unwrap();
		assert_eq!(points(&layout), [[0, 0], [32, 0]]);
		assert_eq!(layout.dimensions, [96, 32]);
	}

	#[test]
	fn a_wider_newcomer_widens_the_atlas() {
		let before = pack([[32, 32], [32, 32]], 32, 3072).unwrap();
		let after = pack([[32, 32], [32, 32], [64, 32]], 32, 3072).unwrap();
		assert_eq!(before.slots[..], after.slots[..2]);
		assert_eq!(before.dimensions, [64, 32]);
		assert_eq!(after.dimensions, [128, 32]);
	}

	#[test]
	fn max_width_is_floored_to_the_tile() {
		let layout = pack([[32, 32], [32, 32]], 32, 63).unwrap();
		assert_eq!(points(&layout), [[0, 0], [0, 32]]);
		assert_eq!(layout.dimensions, [32, 64]);
	}

	#[test]
	fn an_exact_fit_does_not_wrap() {
		let layout = pack([[64, 32], [64, 32]], 32, 128).unwrap();
		assert_eq!(points(&layout), [[0, 0], [64, 0]]);
	}

	#[test]
	fn too_wide_image_is_reported_by_index() {
		assert_eq!(
			pack([[32, 32], [97, 32]], 32, 96),
			Err(TooWide { index: 1, paddedWidth: 128, maxWidth: 96 })
		);
	}

	#[test]
	fn too_wide_source_is_reported_by_path() {
		let sources = [SourceImage { name: "wall.png".into(), path: "/objects/wall.png".into(), dimensions: [200, 8] }];
		match packSources(&sources, 32, 128) {
			Err(Error::ImageTooWide { path, paddedWidth: 224, maxWidth: 128 }) => {
				assert_eq!(path, PathBuf::from("/objects/wall.png"));
			}
			other => panic!("{other:?}"),
		}
	}

	#[test]
	fn placements_keep_names_and_original_sizes() {
		let sources = [
			SourceImage { name: "a.png".into(), path: "/o/a.png".into(), dimensions: [20, 20] },
			SourceImage { name: "b.png".into(), path: "/o/b.png".into(), dimensions: [40, 10] },
		];
		let layout = packSources(&sources, 32, 64).unwrap();
		let placements = intoPlacements(&sources, &layout);
		assert_eq!(placements[1].name, "b.png");
		assert_eq!(placements[1].origDimensions, [40, 10]);
		assert_eq!(placements[1].tileRect(32), [[0, 1], [2, 1]]);
	}

	proptest! {
		#[test]
		fn slots_are_tile_aligned_and_inside_the_atlas(
			sizes in proptest::collection::vec((1_usize..200, 1_usize..200), 1..40),
			tileSize in prop_oneof![Just(16_usize), Just(32)],
			maxWidth in 256_usize..1024,
		) {
			let sizes: Vec<Vec2> = sizes.into_iter().map(|(w, h)| [w, h]).collect();
			let layout = pack(sizes.iter().copied(), tileSize, maxWidth).unwrap();
			prop_assert_eq!(layout.slots.len(), sizes.len());
			prop_assert!(layout.dimensions[WIDTH] <= maxWidth);
			prop_assert_eq!(layout.dimensions[WIDTH] % tileSize, 0);
			prop_assert_eq!(layout.dimensions[HEIGHT] % tileSize, 0);
			for (slot, size) in layout.slots.iter().zip(&sizes) {
				for k in 0..2 {
					prop_assert_eq!(slot.point[k] % tileSize, 0);
					prop_assert_eq!(slot.dimensions[k] % tileSize, 0);
					prop_assert!(slot.dimensions[k] >= size[k] && slot.dimensions[k] < size[k] + tileSize);
					prop_assert!(slot.point[k] + slot.dimensions[k] <= layout.dimensions[k]);
				}
			}
		}

		#[test]
		fn packing_is_deterministic(sizes in proptest::collection::vec((1_usize..100, 1_usize..100), 0..20)) {
			let sizes: Vec<Vec2> = sizes.into_iter().map(|(w, h)| [w, h]).collect();
			prop_assert_eq!(pack(sizes.clone(), 32, 320), pack(sizes, 32, 320));
		}
	}
}
