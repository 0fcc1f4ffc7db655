//! Reduction of the resolved bands to the level budget
//!
//! Three passes run in order, cheapest and safest first:
//!
//! 1. bands repeating the airspace of the band below are dropped,
//! 2. if still over budget, bands that encode to the same distance byte and
//!    a bearing byte within tolerance of the band below are dropped,
//! 3. while still over budget, the farthest airspace not containing the
//!    point is dropped. Running out of such airspaces is fatal.

use crate::codec::LevelDescriptor;
use crate::config::LevelConfig;
use crate::error::{Error, Result};
use crate::resolve::{HeightBands, farthest, format_bands};
use crate::types::{AirspaceVector, Point};

/// Reduces resolved height bands to at most `config.levels` entries
#[derive(Debug, Clone, Copy)]
pub struct LevelCompactor<'c> {
    config: &'c LevelConfig,
    trace: bool,
}

impl<'c> LevelCompactor<'c> {
    /// Compactor for the level budget and bearing tolerance of `config`
    pub fn new(config: &'c LevelConfig) -> Self {
        Self {
            config,
            trace: false,
        }
    }

    /// Log the bands after every pass at `debug` level
    pub fn with_tracing(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Run all passes
    ///
    /// # Errors
    ///
    /// [`Error::LevelBudgetExceeded`] if more airspaces contain `point` than
    /// there are levels.
    pub fn compact<'a>(&self, point: Point, bands: HeightBands<'a>) -> Result<HeightBands<'a>> {
        self.log_stage("All near airspaces sorted by height", &bands);

        let bands = drop_repeated_airspaces(bands);
        self.log_stage("Only unique airspaces (all duplicates removed)", &bands);

        let bands = if bands.len() > self.config.levels {
            drop_near_duplicates(bands, self.config)
        } else {
            bands
        };
        self.log_stage("Airspaces with identical distance/angle removed", &bands);

        let bands = trim_farthest_outside(bands, self.config.levels, point)?;
        self.log_stage("Distant airspaces removed to fit the levels", &bands);

        Ok(bands)
    }

    fn log_stage(&self, title: &str, bands: &HeightBands<'_>) {
        if self.trace {
            log::debug!("{title}:\n{}", format_bands(bands));
        }
    }
}

/// Pass 1: collapse runs of bands holding the same airspace into the lowest one
pub fn drop_repeated_airspaces(bands: HeightBands<'_>) -> HeightBands<'_> {
    let mut previous: Option<AirspaceVector<'_>> = None;

    bands
        .into_iter()
        .filter(|(_, vector)| {
            if previous.is_some_and(|previous| previous.same_airspace(vector)) {
                return false;
            }
            previous = Some(*vector);
            true
        })
        .collect()
}

/// Pass 2: drop bands that look like the band below once quantized
///
/// Compares against the last kept band: equal distance byte and a bearing
/// byte (inside flag included) within `config.bearing_tolerance`.
pub fn drop_near_duplicates<'a>(bands: HeightBands<'a>, config: &LevelConfig) -> HeightBands<'a> {
    let mut previous: Option<LevelDescriptor> = None;

    bands
        .into_iter()
        .filter(|(_, vector)| {
            let descriptor = LevelDescriptor::encode(vector, config);
            if let Some(previous) = previous
                && previous.distance_byte() == descriptor.distance_byte()
                && previous.bearing_byte().abs_diff(descriptor.bearing_byte())
                    <= config.bearing_tolerance
            {
                return false;
            }
            previous = Some(descriptor);
            true
        })
        .collect()
}

/// Pass 3: drop the farthest outside airspace until at most `levels` remain
///
/// Every band holding the dropped airspace goes at once. Airspaces containing
/// the point are never dropped.
pub fn trim_farthest_outside<'a>(
    mut bands: HeightBands<'a>,
    levels: usize,
    point: Point,
) -> Result<HeightBands<'a>> {
    while bands.len() > levels {
        let Some(&victim) = farthest(bands.values().filter(|vector| !vector.inside)) else {
            return Err(Error::LevelBudgetExceeded { point, levels });
        };

        log::trace!("Deleting {victim:?}");
        bands.retain(|_, vector| !vector.same_airspace(&victim));
    }

    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_bands;
    use crate::{Airspace, Altitude};
    use claims::{assert_err, assert_ok};

    const POINT: Point = Point::new(48.5, 9.4);

    /// Airspaces stacked 1000 ft apart, each `thickness` thousand feet thick
    fn stack(count: usize, thickness: i32) -> Vec<Airspace> {
        (0..count)
            .map(|i| {
                let floor = i as i32 * 1000;
                Airspace::new(
                    format!("A{i}"),
                    Altitude::msl(floor),
                    Altitude::msl(floor + thickness * 1000),
                    &[],
                )
            })
            .collect()
    }

    fn names(bands: &HeightBands<'_>) -> Vec<String> {
        bands.values().map(|v| v.airspace.name.clone()).collect()
    }

    #[test]
    fn repeated_airspace_keeps_lowest_band() {
        let airspaces = stack(2, 3);
        let vectors = [
            AirspaceVector::new(&airspaces[0], 100.0, 0.0, false),
            AirspaceVector::new(&airspaces[1], 900.0, 0.0, false),
        ];

        // A0 wins 0..1000 and 1000..3000, A1 wins 3000..4000
        let bands = resolve_bands(&vectors);
        assert_eq!(bands.len(), 3);

        let bands = drop_repeated_airspaces(bands);
        assert_eq!(names(&bands), vec!["A0", "A1"]);
        assert_eq!(
            bands.keys().copied().collect::<Vec<_>>(),
            vec![Altitude::msl(0), Altitude::msl(3000)]
        );
    }

    #[test]
    fn non_adjacent_repeats_survive_pass_one() {
        let airspaces = [
            Airspace::new("WIDE", Altitude::msl(0), Altitude::msl(6000), &[]),
            Airspace::new("NARROW", Altitude::msl(2000), Altitude::msl(3000), &[]),
        ];
        let vectors = [
            AirspaceVector::new(&airspaces[0], 900.0, 0.0, false),
            AirspaceVector::new(&airspaces[1], 100.0, 0.0, false),
        ];

        let bands = drop_repeated_airspaces(resolve_bands(&vectors));
        assert_eq!(names(&bands), vec!["WIDE", "NARROW", "WIDE"]);
    }

    #[test]
    fn near_duplicates_are_merged() {
        let airspaces = stack(4, 1);
        let config = LevelConfig::default();
        let vectors = [
            AirspaceVector::new(&airspaces[0], 640.0, 90.0, false),
            // same distance byte, bearing 5 steps away
            AirspaceVector::new(&airspaces[1], 650.0, 105.0, false),
            // same distance byte, 6 steps from the last kept band
            AirspaceVector::new(&airspaces[2], 640.0, 108.0, false),
            // different distance byte
            AirspaceVector::new(&airspaces[3], 1280.0, 108.0, false),
        ];

        let bands = drop_near_duplicates(resolve_bands(&vectors), &config);
        assert_eq!(names(&bands), vec!["A0", "A2", "A3"]);
    }

    #[test]
    fn inside_flag_prevents_merge() {
        let airspaces = stack(2, 1);
        let config = LevelConfig::default();
        let vectors = [
            AirspaceVector::new(&airspaces[0], 640.0, 90.0, true),
            AirspaceVector::new(&airspaces[1], 640.0, 90.0, false),
        ];

        let bands = drop_near_duplicates(resolve_bands(&vectors), &config);
        assert_eq!(names(&bands), vec!["A0", "A1"]);
    }

    #[test]
    fn pass_two_skipped_within_budget() {
        let airspaces = stack(2, 1);
        let config = LevelConfig::default();
        let vectors = [
            AirspaceVector::new(&airspaces[0], 640.0, 90.0, false),
            AirspaceVector::new(&airspaces[1], 640.0, 90.0, false),
        ];

        let bands = assert_ok!(
            LevelCompactor::new(&config).compact(POINT, resolve_bands(&vectors))
        );
        assert_eq!(names(&bands), vec!["A0", "A1"]);
    }

    #[test]
    fn seven_outside_airspaces_trimmed_to_five() {
        let airspaces = stack(7, 1);
        let config = LevelConfig::default();
        let distances = [1000.0, 9000.0, 2000.0, 3000.0, 8000.0, 4000.0, 5000.0];
        let vectors: Vec<_> = airspaces
            .iter()
            .zip(distances)
            .enumerate()
            .map(|(i, (airspace, distance))| {
                // bearings far apart so pass 2 keeps everything
                AirspaceVector::new(airspace, distance, i as f64 * 40.0, false)
            })
            .collect();

        let bands = assert_ok!(
            LevelCompactor::new(&config).compact(POINT, resolve_bands(&vectors))
        );

        assert_eq!(names(&bands), vec!["A0", "A2", "A3", "A5", "A6"]);
        let heights: Vec<_> = bands.keys().copied().collect();
        assert!(heights.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn inside_airspaces_are_never_trimmed() {
        let airspaces = stack(6, 1);
        let vectors: Vec<_> = airspaces
            .iter()
            .enumerate()
            .map(|(i, airspace)| {
                // the two farthest contain the point
                let inside = i >= 4;
                AirspaceVector::new(airspace, 1000.0 * (i + 1) as f64, i as f64 * 40.0, inside)
            })
            .collect();

        let bands = assert_ok!(trim_farthest_outside(resolve_bands(&vectors), 5, POINT));
        assert_eq!(names(&bands), vec!["A0", "A1", "A2", "A4", "A5"]);
    }

    #[test]
    fn trimming_removes_every_band_of_the_airspace() {
        let airspaces = [
            Airspace::new("WIDE", Altitude::msl(0), Altitude::msl(6000), &[]),
            Airspace::new("NARROW", Altitude::msl(2000), Altitude::msl(3000), &[]),
        ];
        let vectors = [
            AirspaceVector::new(&airspaces[0], 900.0, 0.0, false),
            AirspaceVector::new(&airspaces[1], 100.0, 0.0, false),
        ];

        let bands = drop_repeated_airspaces(resolve_bands(&vectors));
        let bands = assert_ok!(trim_farthest_outside(bands, 2, POINT));
        assert_eq!(names(&bands), vec!["NARROW"]);
    }

    #[test]
    fn too_many_inside_airspaces_is_fatal() {
        let airspaces = stack(3, 1);
        let vectors: Vec<_> = airspaces
            .iter()
            .enumerate()
            .map(|(i, airspace)| AirspaceVector::new(airspace, 500.0, i as f64 * 60.0, true))
            .collect();

        let config = LevelConfig::default().with_levels(2);
        let error = assert_err!(
            LevelCompactor::new(&config).compact(POINT, resolve_bands(&vectors))
        );
        assert!(matches!(
            error,
            Error::LevelBudgetExceeded { point, levels: 2 } if point == POINT
        ));
    }
}
