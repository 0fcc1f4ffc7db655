use std::fmt;

/// Geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check that both coordinates are finite and within WGS-84 range
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Convert into a `geo` point (x = longitude, y = latitude)
    pub fn to_geo(self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_round_trip_swaps_axes() {
        let point = Point::new(48.5, 9.25);
        let geo_point = point.to_geo();
        assert_eq!(geo_point.x(), 9.25);
        assert_eq!(geo_point.y(), 48.5);
        assert_eq!(Point::from(geo_point), point);
    }

    #[test]
    fn validity() {
        assert!(Point::new(48.5, 9.25).is_valid());
        assert!(Point::new(-90.0, 180.0).is_valid());
        assert!(!Point::new(91.0, 0.0).is_valid());
        assert!(!Point::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(Point::new(48.723957, 9.153292).to_string(), "48.723957,9.153292");
    }
}
