//! Tile raster writer with builder API

use crate::codec::describe_record;
use crate::config::GridConfig;
use crate::encoder::PointEncoder;
use crate::error::{Error, Result};
use crate::geometry::GeometryProvider;
use crate::tile::{Tile, cell_offset};
use crate::types::Point;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::NamedTempFile;

/// Result of processing one tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileOutcome {
    /// Raster computed and written to the path
    Saved(PathBuf),
    /// Output already existed and `force` was off, nothing was computed
    Skipped(PathBuf),
    /// No airspace anywhere near the tile, no file written
    Empty,
}

/// Computes tile rasters and writes them as `.air` files
///
/// # Example
///
/// ```no_run
/// use skydrop_air::{AirspaceIndex, GridConfig, PointEncoder, Tile, TileWriter};
///
/// let index = AirspaceIndex::new(vec![]);
/// let writer = TileWriter::new(&index, PointEncoder::default(), "out")
///     .with_grid(GridConfig::default().with_resolution(100));
///
/// writer.write_tile(Tile::new(48, 9))?;
/// # Ok::<(), skydrop_air::Error>(())
/// ```
pub struct TileWriter<'g, G: GeometryProvider> {
    geometry: &'g G,
    encoder: PointEncoder,
    output_dir: PathBuf,
    grid: GridConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'g, G: GeometryProvider> TileWriter<'g, G> {
    /// Writer for tiles in `output_dir`, with the default grid and no cancel flag
    pub fn new(geometry: &'g G, encoder: PointEncoder, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            geometry,
            encoder,
            output_dir: output_dir.into(),
            grid: GridConfig::default(),
            cancel: None,
        }
    }

    /// Replace the grid resolution, sampling, force and worker settings
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Abort tiles in progress once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Grid settings, also used by `dispatch::run_tiles` to size its pool
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Encoder used for every grid point
    pub fn encoder(&self) -> &PointEncoder {
        &self.encoder
    }

    /// `<output_dir>/<N|S><lat><E|W><lon>.air`
    pub fn output_path(&self, tile: Tile) -> PathBuf {
        self.output_dir.join(tile.file_name())
    }

    /// Compute and persist one tile
    ///
    /// An existing file is kept untouched unless `force` is set. Tiles
    /// without any airspace produce no file; with `force` a stale file from
    /// an earlier run is removed.
    pub fn write_tile(&self, tile: Tile) -> Result<TileOutcome> {
        let path = self.output_path(tile);
        if path.exists() && !self.grid.force {
            log::info!("{tile} exists, skipping...");
            return Ok(TileOutcome::Skipped(path));
        }

        let n = self.grid.resolution;
        log::info!("{tile} computing ({n}x{n})");

        if self.sample_is_empty(tile)? {
            return self.finish_empty(tile, &path);
        }

        let buffer = self.compute(tile)?;
        if buffer.iter().all(|&byte| byte == 0) {
            return self.finish_empty(tile, &path);
        }

        self.persist(&path, &buffer)?;
        log::info!("{tile} saved");
        Ok(TileOutcome::Saved(path))
    }

    /// Encode every grid point of `tile` into a raster buffer
    ///
    /// The buffer holds `resolution² × record_size` bytes, north row first.
    pub fn compute(&self, tile: Tile) -> Result<Vec<u8>> {
        self.sweep(tile, self.grid.resolution, true)
    }

    /// Whether a coarse sample grid finds no airspace at all
    ///
    /// Always `false` when sampling is disabled.
    pub fn sample_is_empty(&self, tile: Tile) -> Result<bool> {
        let n = self.grid.sample_resolution;
        if n == 0 {
            return Ok(false);
        }

        let sample = self.sweep(tile, n, false)?;
        Ok(sample.iter().all(|&byte| byte == 0))
    }

    /// Decoded levels of a single point, every compaction stage logged at `debug`
    pub fn check_point(&self, point: Point) -> Result<Vec<String>> {
        let vectors = self.geometry.vectors_near(point);
        let record = self.encoder.encode_traced(point, &vectors)?;
        Ok(describe_record(&record, self.encoder.config()))
    }

    fn sweep(&self, tile: Tile, n: usize, report_progress: bool) -> Result<Vec<u8>> {
        let record_size = self.encoder.record_size();
        let mut buffer = vec![0u8; n * n * record_size];

        for y in 0..n {
            if self.is_cancelled() {
                return Err(Error::Interrupted {
                    tile: tile.file_name(),
                });
            }

            for x in 0..n {
                let point = tile.grid_point(x, y, n);
                let vectors = self.geometry.vectors_near(point);
                let offset = cell_offset(x, y, n, record_size);
                self.encoder.encode_at(point, &vectors, &mut buffer, offset)?;
            }

            if report_progress {
                log::debug!("{tile}: {} %", (y + 1) * 100 / n);
            }
        }

        Ok(buffer)
    }

    fn finish_empty(&self, tile: Tile, path: &Path) -> Result<TileOutcome> {
        log::info!("{tile} is empty");
        if path.exists() {
            fs::remove_file(path)?;
            log::info!("{tile} removed stale file");
        }
        Ok(TileOutcome::Empty)
    }

    fn persist(&self, path: &Path, buffer: &[u8]) -> Result<()> {
        let mut file = NamedTempFile::new_in(&self.output_dir)?;
        file.write_all(buffer)?;
        file.persist(path).map_err(|error| error.error)?;
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
