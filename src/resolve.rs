//! Altitude sweep choosing one airspace per height band
//!
//! Starting at the lowest floor, the sweep visits every altitude at which
//! some airspace begins or ends. For each band it keeps the nearest airspace
//! containing the point, or the nearest airspace at all if none contains it.
//! Ties go to the vector that comes first in the input, so input order is
//! part of the output.

use crate::types::{AirspaceVector, Altitude};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Chosen vector per band, keyed by the altitude at which the band starts
pub type HeightBands<'a> = BTreeMap<Altitude, AirspaceVector<'a>>;

/// Sweep all breakpoints and choose one vector per covered band
///
/// Returns an empty map for an empty input. Bands that no airspace covers
/// are absent from the map.
pub fn resolve_bands<'a>(vectors: &[AirspaceVector<'a>]) -> HeightBands<'a> {
    let mut bands = HeightBands::new();

    let (Some(lowest), Some(highest)) = (lowest_floor(vectors), highest_ceiling(vectors)) else {
        return bands;
    };

    let mut height = lowest;
    while height < highest {
        if let Some(chosen) = choose_for_band(vectors, height) {
            log::trace!("{height}: {chosen:?}");
            bands.insert(height, *chosen);
        }

        match next_breakpoint(vectors, height) {
            Some(next) => height = next,
            None => break,
        }
    }

    bands
}

/// Pick the vector representing the band starting at `height`
///
/// Airspaces containing the point win over closer ones that do not.
pub fn choose_for_band<'v, 'a>(
    vectors: &'v [AirspaceVector<'a>],
    height: Altitude,
) -> Option<&'v AirspaceVector<'a>> {
    let covering = || vectors.iter().filter(move |vector| vector.covers(height));

    nearest(covering().filter(|vector| vector.inside)).or_else(|| nearest(covering()))
}

/// First vector with the smallest distance
pub fn nearest<'v, 'a>(
    vectors: impl IntoIterator<Item = &'v AirspaceVector<'a>>,
) -> Option<&'v AirspaceVector<'a>>
where
    'a: 'v,
{
    vectors.into_iter().fold(None, |best, vector| match best {
        Some(best) if best.distance <= vector.distance => Some(best),
        _ => Some(vector),
    })
}

/// First vector with the largest distance
pub fn farthest<'v, 'a>(
    vectors: impl IntoIterator<Item = &'v AirspaceVector<'a>>,
) -> Option<&'v AirspaceVector<'a>>
where
    'a: 'v,
{
    vectors.into_iter().fold(None, |best, vector| match best {
        Some(best) if best.distance >= vector.distance => Some(best),
        _ => Some(vector),
    })
}

/// Lowest floor among `vectors`, where the sweep starts
pub fn lowest_floor(vectors: &[AirspaceVector<'_>]) -> Option<Altitude> {
    vectors.iter().map(AirspaceVector::floor).min()
}

/// Highest ceiling among `vectors`, where the sweep stops
pub fn highest_ceiling(vectors: &[AirspaceVector<'_>]) -> Option<Altitude> {
    vectors.iter().map(AirspaceVector::ceiling).max()
}

/// Smallest floor or ceiling strictly above `height`
pub fn next_breakpoint(vectors: &[AirspaceVector<'_>], height: Altitude) -> Option<Altitude> {
    vectors
        .iter()
        .flat_map(|vector| [vector.floor(), vector.ceiling()])
        .filter(|&limit| limit > height)
        .min()
}

/// Table of the bands, highest first, for diagnostics
pub fn format_bands(bands: &HeightBands<'_>) -> String {
    let mut table = String::new();
    for (height, vector) in bands.iter().rev() {
        let airspace = vector.airspace;
        let _ = writeln!(
            table,
            " {:>12}  {:>12} .. {:<12} {:<6} {:>6.1}km {:>3.0}° {:?}",
            height.to_string(),
            airspace.floor.to_string(),
            airspace.ceiling.to_string(),
            if vector.inside { "INSIDE" } else { "" },
            vector.distance / 1000.0,
            vector.bearing,
            airspace.name,
        );
    }
    table
}
