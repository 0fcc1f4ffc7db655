use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use log::{LevelFilter, info, warn};
use skydrop_air::dispatch::{count_failures, run_tiles};
use skydrop_air::{
    AirspaceIndex, AirspaceReader, GridConfig, PointEncoder, Point, Tile, TileOutcome, TileWriter,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Convert airspace polygons into SkyDrop `.air` tiles
#[derive(Parser, Debug)]
#[command(name = "air-convert", version, about, allow_negative_numbers = true)]
struct Args {
    /// Airspace JSON file
    input: PathBuf,

    /// Only compute the tile containing this latitude ...
    #[arg(requires = "lon")]
    lat: Option<f64>,

    /// ... and longitude
    lon: Option<f64>,

    /// Grid points per tile side
    #[arg(short, long, default_value_t = 300)]
    resolution: usize,

    /// Recompute tiles whose output file already exists
    #[arg(short, long)]
    force: bool,

    /// Print the levels of a single point instead of writing tiles
    #[arg(short, long, value_name = "LAT,LON", value_parser = parse_point)]
    check: Option<Point>,

    /// Directory the tiles are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Number of tiles computed in parallel [default: 2 × cores]
    #[arg(short, long)]
    jobs: Option<usize>,

    /// More output, repeat for even more
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Warn,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }

    fn grid(&self) -> GridConfig {
        let grid = GridConfig::default()
            .with_resolution(self.resolution)
            .with_force(self.force);

        match self.jobs {
            Some(jobs) => grid.with_workers(jobs),
            None => grid,
        }
    }
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {value:?}"))?;

    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|error| format!("{part:?}: {error}"))
    };

    let point = Point::new(parse(lat)?, parse(lon)?);
    if !point.is_valid() {
        return Err(format!("{point} is out of range"));
    }
    Ok(point)
}

/// Flag set on the first Ctrl-C
///
/// Tiles in progress stop at the next grid row and write nothing.
fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    ctrlc::set_handler(move || {
        warn!("Interrupted, abandoning tiles in progress...");
        flag.store(true, Ordering::Relaxed);
    })
    .context("Failed to install the Ctrl-C handler")?;

    Ok(cancel)
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let mut warnings = Vec::new();
    let airspaces = AirspaceReader::from_path(&args.input)
        .and_then(|reader| reader.read_airspaces(&mut warnings))
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    for warning in &warnings {
        warn!("{warning}");
    }
    info!("Loaded {} airspaces", airspaces.len());

    let grid = args.grid();
    let index = AirspaceIndex::new(airspaces);
    let writer = TileWriter::new(&index, PointEncoder::default(), &args.output_dir).with_grid(grid);

    if let Some(point) = args.check {
        for line in writer.check_point(point)? {
            println!("{line}");
        }
        return Ok(());
    }

    let tiles = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => vec![Tile::containing(Point::new(lat, lon))],
        _ => match index.bounding_box() {
            Some(bbox) => Tile::covering(&bbox),
            None => {
                info!("No airspaces, nothing to do");
                return Ok(());
            }
        },
    };

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let cancel = install_interrupt_handler()?;
    let writer = writer.with_cancel_flag(Arc::clone(&cancel));
    let results = run_tiles(&writer, &tiles)?;

    if cancel.load(Ordering::Relaxed) {
        bail!("Interrupted, {} of {} tiles not written", count_failures(&results), results.len());
    }

    let saved = results
        .iter()
        .filter(|(_, result)| matches!(result, Ok(TileOutcome::Saved(_))))
        .count();
    info!("{saved} of {} tiles saved", results.len());

    let failures = count_failures(&results);
    if failures > 0 {
        bail!("{failures} of {} tiles failed", results.len());
    }

    Ok(())
}
