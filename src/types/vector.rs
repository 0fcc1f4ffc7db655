use crate::types::{Airspace, Altitude};
use std::fmt;

/// Relationship between one grid point and one airspace
///
/// Borrows the airspace instead of copying it; only distance, bearing and
/// the inside flag are specific to the point. Two vectors refer to the same
/// airspace when they borrow the same `Airspace` value.
#[derive(Clone, Copy)]
pub struct AirspaceVector<'a> {
    pub airspace: &'a Airspace,
    /// Distance to the boundary in metres, never negative
    pub distance: f64,
    /// Bearing to the boundary in degrees, within `[0, 360)`
    pub bearing: f64,
    /// Whether the point lies inside the boundary
    pub inside: bool,
}

impl<'a> AirspaceVector<'a> {
    /// Create a vector, normalizing the bearing into `[0, 360)`
    pub fn new(airspace: &'a Airspace, distance: f64, bearing: f64, inside: bool) -> Self {
        let mut bearing = bearing.rem_euclid(360.0);
        // rem_euclid rounds tiny negative inputs up to exactly 360.0
        if bearing >= 360.0 {
            bearing = 0.0;
        }

        Self {
            airspace,
            distance: distance.max(0.0),
            bearing,
            inside,
        }
    }

    pub fn floor(&self) -> Altitude {
        self.airspace.floor
    }

    pub fn ceiling(&self) -> Altitude {
        self.airspace.ceiling
    }

    /// Whether the airspace band contains `height`
    pub fn covers(&self, height: Altitude) -> bool {
        self.airspace.band_contains(height)
    }

    /// Whether both vectors point at the very same airspace
    pub fn same_airspace(&self, other: &AirspaceVector<'_>) -> bool {
        std::ptr::eq(self.airspace, other.airspace)
    }

    /// Whether the airspace lies beyond the query radius
    pub fn is_too_far(&self, radius: f64) -> bool {
        self.distance > radius
    }
}

impl fmt::Debug for AirspaceVector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirspaceVector")
            .field("airspace", &self.airspace.name)
            .field("distance", &self.distance)
            .field("bearing", &self.bearing)
            .field("inside", &self.inside)
            .finish()
    }
}
