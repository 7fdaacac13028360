#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	clap::Parser,
	hku_objects_sheet::{
		config::{CATALOG_WIDTH_TILES, MAX_SHEET_WIDTH_PX, TILE},
		reportFatal, run, Config,
	},
	std::process::ExitCode,
	tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter},
};

/// Packs the sprites of public/tilesets/hku_objects.tsj into one tile-aligned sheet, with its
/// tileset, a CSV index and a catalog map.
#[derive(Parser, Debug)]
struct Args {
	/// Project root holding the `public` directory
	#[clap(default_value = ".")]
	root: String,

	#[clap(long, default_value_t = TILE)]
	tileSize: usize,

	#[clap(long, default_value_t = MAX_SHEET_WIDTH_PX)]
	maxSheetWidth: usize,

	/// In tiles
	#[clap(long, default_value_t = CATALOG_WIDTH_TILES)]
	catalogWidth: usize,
}

fn main() -> ExitCode {
	tracing_subscriber::registry()
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let Args { root, tileSize, maxSheetWidth, catalogWidth } = Args::parse();
	let config = Config { root: root.into(), tileSize, maxSheetWidth, catalogWidth };
	match run(&config) {
		Ok(generated) => {
			println!("Generated:");
			for path in generated.paths() {
				println!(" - {}", path.display());
			}
			ExitCode::SUCCESS
		}
		Err(err) => {
			_ = reportFatal(&mut std::io::stderr().lock(), &err);
			ExitCode::FAILURE
		}
	}
}
