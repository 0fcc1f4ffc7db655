//! Explicit configuration for the level pipeline and the tile raster

/// Size of one encoded level in bytes
pub const LEVEL_SIZE: usize = 4;

/// Default number of height levels stored per grid point
pub const DEFAULT_LEVELS: usize = 5;

/// Quantization and budget settings shared by the resolver, compactor and codec
///
/// Distances are in metres, the unit produced by [`AirspaceIndex`](crate::AirspaceIndex).
#[derive(Debug, Clone, PartialEq)]
pub struct LevelConfig {
    /// Number of levels stored per grid point (`N`)
    pub levels: usize,
    /// Feet per altitude byte step
    pub altitude_step_ft: f64,
    /// Degrees per bearing byte step
    pub bearing_step_deg: f64,
    /// Distance units per distance byte step
    pub distance_step: f64,
    /// Largest bearing byte difference still treated as the same direction
    pub bearing_tolerance: u8,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS,
            altitude_step_ft: 250.0,
            bearing_step_deg: 3.0,
            distance_step: 64.0,
            bearing_tolerance: 5,
        }
    }
}

impl LevelConfig {
    /// Bytes written for one grid point
    pub fn record_size(&self) -> usize {
        self.levels * LEVEL_SIZE
    }

    /// Override the number of levels stored per grid point
    ///
    /// Changes the record size and therefore the tile file size.
    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    /// Override the feet per floor/ceiling byte step (default 250)
    pub fn with_altitude_step(mut self, feet: f64) -> Self {
        self.altitude_step_ft = feet;
        self
    }

    /// Override the degrees per bearing byte step (default 3)
    pub fn with_bearing_step(mut self, degrees: f64) -> Self {
        self.bearing_step_deg = degrees;
        self
    }

    /// Override the metres per distance byte step (default 64)
    pub fn with_distance_step(mut self, step: f64) -> Self {
        self.distance_step = step;
        self
    }

    /// Override the largest bearing byte difference merged by the compactor
    ///
    /// `0` only merges levels with identical bearing bytes.
    pub fn with_bearing_tolerance(mut self, tolerance: u8) -> Self {
        self.bearing_tolerance = tolerance;
        self
    }
}

/// Raster and run settings for the tile driver
///
/// The query radius belongs to the geometry, see
/// [`AirspaceIndex::with_query_radius`](crate::AirspaceIndex::with_query_radius).
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Grid points per tile side
    pub resolution: usize,
    /// Grid points per side of the emptiness sample, `0` disables sampling
    pub sample_resolution: usize,
    /// Recompute tiles whose output file already exists
    pub force: bool,
    /// Number of tiles computed concurrently
    pub workers: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: 300,
            sample_resolution: 10,
            force: false,
            workers: default_workers(),
        }
    }
}

impl GridConfig {
    /// Override the number of grid points per tile side
    ///
    /// Default is 300, giving a file of 300 × 300 records.
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Override the side of the coarse grid sampled before a full sweep
    ///
    /// Default is 10. Pass `0` to always run the full sweep.
    pub fn with_sample_resolution(mut self, resolution: usize) -> Self {
        self.sample_resolution = resolution;
        self
    }

    /// Recompute and overwrite tiles that already exist on disk
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Set the number of tiles computed concurrently
    ///
    /// Values below 1 are raised to 1.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

/// Twice the available cores, or 2 if the core count is unknown
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|cores| cores.get() * 2)
        .unwrap_or(2)
}
