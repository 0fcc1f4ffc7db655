use crate::types::{BoundingBox, Point};
use std::fmt;

/// One-degree raster tile, identified by its south-west corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile {
    pub lat: i32,
    pub lon: i32,
}

impl Tile {
    /// Tile whose south-west corner is at `lat`, `lon` degrees
    pub const fn new(lat: i32, lon: i32) -> Self {
        Self { lat, lon }
    }

    /// Tile containing `point`
    pub fn containing(point: Point) -> Self {
        Self::new(point.lat.floor() as i32, point.lon.floor() as i32)
    }

    /// Output file name, e.g. `N48E009.air`
    pub fn file_name(&self) -> String {
        format!("N{:02}E{:03}.air", self.lat, self.lon)
    }

    /// All tiles touching `bbox`, plus a margin of one tile on every side
    ///
    /// Ordered south to north, then west to east.
    pub fn covering(bbox: &BoundingBox) -> Vec<Tile> {
        let south = bbox.bottom.floor() as i32 - 1;
        let north = bbox.top.floor() as i32 + 1;
        let west = bbox.left.floor() as i32 - 1;
        let east = bbox.right.floor() as i32 + 1;

        (south..=north)
            .flat_map(|lat| (west..=east).map(move |lon| Tile::new(lat, lon)))
            .collect()
    }

    /// Position of grid point `(x, y)` in an `n × n` raster
    ///
    /// `x` grows eastwards and `y` northwards from the south-west corner.
    pub fn grid_point(&self, x: usize, y: usize, n: usize) -> Point {
        Point::new(
            f64::from(self.lat) + y as f64 / n as f64,
            f64::from(self.lon) + x as f64 / n as f64,
        )
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Byte offset of grid point `(x, y)` in the tile buffer
///
/// Rows are stored north first: `y = n - 1` is the first row in the file.
pub fn cell_offset(x: usize, y: usize, n: usize, record_size: usize) -> usize {
    ((n - 1 - y) * n + x) * record_size
}
