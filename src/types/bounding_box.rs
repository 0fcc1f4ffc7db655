use crate::types::Point;

/// Mean length of one degree of latitude in metres
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Bounding box for geographic areas
///
/// Represents a rectangular geographic area defined by longitude and latitude bounds.
/// All coordinates are stored in degrees.
///
/// # Limitations
///
/// **Anti-meridian handling**: Simple min/max logic is used, so an area crossing
/// the ±180° longitude line produces a box spanning nearly the entire globe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,   // west longitude
    pub top: f64,    // north latitude
    pub right: f64,  // east longitude
    pub bottom: f64, // south latitude
}

impl BoundingBox {
    /// Create a bounding box from a slice of points
    ///
    /// Returns `None` if the slice is empty.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut bbox = Self::from(*first);
        for &point in rest {
            bbox.extend(point);
        }
        Some(bbox)
    }

    /// Extend bounding box to include a point
    pub fn extend(&mut self, point: Point) {
        self.left = self.left.min(point.lon);
        self.right = self.right.max(point.lon);
        self.top = self.top.max(point.lat);
        self.bottom = self.bottom.min(point.lat);
    }

    /// Merge another bounding box into this one
    pub fn merge(&mut self, other: BoundingBox) {
        self.left = self.left.min(other.left);
        self.right = self.right.max(other.right);
        self.top = self.top.max(other.top);
        self.bottom = self.bottom.min(other.bottom);
    }

    /// Check whether a point lies within the box (edges included)
    pub fn contains(&self, point: Point) -> bool {
        (self.bottom..=self.top).contains(&point.lat)
            && (self.left..=self.right).contains(&point.lon)
    }

    /// Grow the box by `meters` in every direction
    ///
    /// The longitude margin is computed at the latitude closest to a pole,
    /// so the grown box never undershoots.
    pub fn expanded_by_meters(&self, meters: f64) -> Self {
        let lat_margin = meters / METERS_PER_DEGREE;
        let worst_lat = self.top.abs().max(self.bottom.abs()) + lat_margin;
        let cos_lat = worst_lat.min(89.0).to_radians().cos();
        let lon_margin = meters / (METERS_PER_DEGREE * cos_lat);

        Self {
            left: self.left - lon_margin,
            top: self.top + lat_margin,
            right: self.right + lon_margin,
            bottom: self.bottom - lat_margin,
        }
    }
}

impl From<Point> for BoundingBox {
    fn from(point: Point) -> Self {
        Self {
            left: point.lon,
            top: point.lat,
            right: point.lon,
            bottom: point.lat,
        }
    }
}
