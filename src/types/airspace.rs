use crate::types::{AirspaceClass, Altitude, BoundingBox, Point};
use geo::{BoundingRect, LineString, Polygon};

/// Airspace volume: a boundary polygon with a floor/ceiling altitude band
///
/// Airspaces are loaded once and then only borrowed; every
/// [`AirspaceVector`](crate::AirspaceVector) refers back to one of them.
#[derive(Debug, Clone)]
pub struct Airspace {
    pub name: String,
    pub class: AirspaceClass,
    pub floor: Altitude,
    pub ceiling: Altitude,

    // Exterior ring in degrees (x = longitude, y = latitude)
    pub boundary: Polygon<f64>,
}

impl Airspace {
    /// Create an airspace from its boundary points
    ///
    /// The ring is closed automatically if the last point differs from the first.
    pub fn new(name: impl Into<String>, floor: Altitude, ceiling: Altitude, points: &[Point]) -> Self {
        let ring: LineString<f64> = points.iter().map(|p| (p.lon, p.lat)).collect();

        Self {
            name: name.into(),
            class: AirspaceClass::Unknown,
            floor,
            ceiling,
            boundary: Polygon::new(ring, vec![]),
        }
    }

    /// Set the airspace class
    pub fn with_class(mut self, class: AirspaceClass) -> Self {
        self.class = class;
        self
    }

    /// Whether `height` lies within `[floor, ceiling)`
    pub fn band_contains(&self, height: Altitude) -> bool {
        self.floor <= height && height < self.ceiling
    }

    /// Bounding box of the boundary, `None` for an empty boundary
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.boundary.bounding_rect().map(|rect| BoundingBox {
            left: rect.min().x,
            top: rect.max().y,
            right: rect.max().x,
            bottom: rect.min().y,
        })
    }
}
