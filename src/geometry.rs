//! Airspace lookup around a grid point

use crate::types::{Airspace, AirspaceVector, BoundingBox, Point};
use geo::{Closest, Contains, HaversineBearing, HaversineClosestPoint, HaversineDistance};

/// Default radius beyond which airspaces are ignored, in metres
pub const DEFAULT_QUERY_RADIUS: f64 = 100_000.0;

/// Source of airspace vectors for a grid point
///
/// Implementations must return vectors in a stable order: ties in the height
/// band sweep are broken by that order.
pub trait GeometryProvider {
    fn vectors_near(&self, point: Point) -> Vec<AirspaceVector<'_>>;
}

/// Read-only airspace table with pre-computed search boxes
#[derive(Debug)]
pub struct AirspaceIndex {
    airspaces: Vec<Airspace>,
    // Bounding box of each airspace grown by the query radius
    search_boxes: Vec<Option<BoundingBox>>,
    query_radius: f64,
}

impl AirspaceIndex {
    /// Index `airspaces` with the default query radius of 100 km
    pub fn new(airspaces: Vec<Airspace>) -> Self {
        Self::with_query_radius(airspaces, DEFAULT_QUERY_RADIUS)
    }

    /// Index `airspaces`, ignoring everything farther than `radius` metres
    ///
    /// Each bounding box is grown by `radius` once here, so a lookup only
    /// runs the exact geometry for airspaces that can be in range.
    pub fn with_query_radius(airspaces: Vec<Airspace>, radius: f64) -> Self {
        let search_boxes = airspaces
            .iter()
            .map(|airspace| {
                airspace
                    .bounding_box()
                    .map(|bbox| bbox.expanded_by_meters(radius))
            })
            .collect();

        Self {
            airspaces,
            search_boxes,
            query_radius: radius,
        }
    }

    /// Airspaces in the order they were loaded
    pub fn airspaces(&self) -> &[Airspace] {
        &self.airspaces
    }

    /// Radius in metres beyond which airspaces are ignored
    pub fn query_radius(&self) -> f64 {
        self.query_radius
    }

    /// Bounding box of all airspace boundaries, `None` without airspaces
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.airspaces
            .iter()
            .filter_map(Airspace::bounding_box)
            .reduce(|mut bbox, other| {
                bbox.merge(other);
                bbox
            })
    }
}

impl GeometryProvider for AirspaceIndex {
    fn vectors_near(&self, point: Point) -> Vec<AirspaceVector<'_>> {
        self.airspaces
            .iter()
            .zip(&self.search_boxes)
            .filter(|(_, search_box)| search_box.is_some_and(|bbox| bbox.contains(point)))
            .filter_map(|(airspace, _)| airspace_vector(airspace, point))
            .filter(|vector| !vector.is_too_far(self.query_radius))
            .collect()
    }
}

/// Distance, bearing and containment of `point` relative to `airspace`
///
/// The closest boundary point, the distance and the bearing to it are all
/// great-circle values. Returns `None` for an airspace without a usable
/// boundary.
pub fn airspace_vector(airspace: &Airspace, point: Point) -> Option<AirspaceVector<'_>> {
    let origin = point.to_geo();

    let closest = match airspace.boundary.exterior().haversine_closest_point(&origin) {
        Closest::Intersection(closest) | Closest::SinglePoint(closest) => closest,
        Closest::Indeterminate => return None,
    };

    let inside = airspace.boundary.contains(&origin);
    let distance = origin.haversine_distance(&closest);
    let bearing = if distance > 0.0 {
        origin.haversine_bearing(closest)
    } else {
        0.0
    };

    Some(AirspaceVector::new(airspace, distance, bearing, inside))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Altitude;
    use crate::codec::encode_bearing;
    use claims::{assert_none, assert_some};

    fn square(name: &str) -> Airspace {
        Airspace::new(
            name,
            Altitude::agl(0),
            Altitude::msl(5000),
            &[
                Point::new(48.0, 9.0),
                Point::new(48.0, 9.2),
                Point::new(48.2, 9.2),
                Point::new(48.2, 9.0),
            ],
        )
    }

    #[test]
    fn point_inside() {
        let airspace = square("CTR");
        let vector = assert_some!(airspace_vector(&airspace, Point::new(48.1, 9.05)));

        assert!(vector.inside);
        assert!((vector.distance - 3713.0).abs() < 20.0, "{}", vector.distance);
        assert!((vector.bearing - 270.0).abs() < 0.5, "{}", vector.bearing);
    }

    #[test]
    fn point_outside() {
        let airspace = square("CTR");
        let vector = assert_some!(airspace_vector(&airspace, Point::new(48.1, 8.9)));

        assert!(!vector.inside);
        assert!((vector.distance - 7426.0).abs() < 40.0, "{}", vector.distance);
        assert!((vector.bearing - 90.0).abs() < 0.5, "{}", vector.bearing);
    }

    #[test]
    fn nearest_edge_is_measured_in_metres() {
        // L shape: east edge at lon 9.12 (8.9 km), north edge at lat 48.1 (11.1 km).
        // In plain degrees the north edge would look closer.
        let airspace = Airspace::new(
            "L",
            Altitude::msl(0),
            Altitude::msl(5000),
            &[
                Point::new(47.5, 9.12),
                Point::new(47.5, 10.0),
                Point::new(48.3, 10.0),
                Point::new(48.3, 8.5),
                Point::new(48.1, 8.5),
                Point::new(48.1, 9.12),
            ],
        );

        let vector = assert_some!(airspace_vector(&airspace, Point::new(48.0, 9.0)));

        assert!(!vector.inside);
        assert!((vector.distance - 8929.0).abs() < 20.0, "{}", vector.distance);
        assert!((vector.bearing - 90.0).abs() < 1.0, "{}", vector.bearing);
        assert_eq!(encode_bearing(vector.bearing, vector.inside, 3.0), 30);
    }

    #[test]
    fn point_on_boundary() {
        let airspace = square("CTR");
        let vector = assert_some!(airspace_vector(&airspace, Point::new(48.1, 9.0)));

        assert!(vector.distance < 1e-6);
        assert_eq!(vector.bearing, 0.0);
    }

    #[test]
    fn empty_boundary_has_no_vector() {
        let airspace = Airspace::new("EMPTY", Altitude::msl(0), Altitude::msl(1000), &[]);
        assert_none!(airspace_vector(&airspace, Point::new(48.1, 9.05)));
    }

    #[test]
    fn far_airspaces_are_excluded() {
        let index = AirspaceIndex::new(vec![square("CTR")]);

        assert_eq!(index.vectors_near(Point::new(48.1, 9.05)).len(), 1);
        assert_eq!(index.vectors_near(Point::new(48.1, 8.9)).len(), 1);
        assert!(index.vectors_near(Point::new(48.1, 12.0)).is_empty());
    }

    #[test]
    fn radius_is_configurable() {
        let index = AirspaceIndex::with_query_radius(vec![square("CTR")], 5000.0);

        assert_eq!(index.query_radius(), 5000.0);
        assert_eq!(index.vectors_near(Point::new(48.1, 9.05)).len(), 1);
        // 7.4 km away: inside the search box but beyond the radius
        assert!(index.vectors_near(Point::new(48.1, 8.9)).is_empty());
    }

    #[test]
    fn order_follows_the_table() {
        let index = AirspaceIndex::new(vec![square("FIRST"), square("SECOND")]);

        let names: Vec<_> = index
            .vectors_near(Point::new(48.1, 9.1))
            .iter()
            .map(|vector| vector.airspace.name.as_str())
            .collect();
        assert_eq!(names, vec!["FIRST", "SECOND"]);
    }

    #[test]
    fn combined_bounding_box() {
        let index = AirspaceIndex::new(vec![square("CTR")]);
        let bbox = assert_some!(index.bounding_box());

        assert_eq!(bbox.left, 9.0);
        assert_eq!(bbox.top, 48.2);
        assert_none!(AirspaceIndex::new(vec![]).bounding_box());
    }
}
