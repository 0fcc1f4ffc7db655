//! JSON airspace file reader
//!
//! The expected document looks like this:
//!
//! ```json
//! {"airspaces": [{
//!     "name": "CTR STUTTGART",
//!     "class": "CTR",
//!     "floor": {"ft": 0, "ref": "AGL"},
//!     "ceiling": {"ft": 5000, "ref": "MSL"},
//!     "boundary": [[9.1, 48.6], [9.3, 48.6], [9.3, 48.8], [9.1, 48.6]]
//! }]}
//! ```
//!
//! Boundary points are `[lon, lat]` pairs in degrees.

use crate::error::{Error, Result, Warning};
use crate::types::{Airspace, AirspaceClass, Altitude, AltitudeReference, Point};
use crate::utils::decode_text;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawDocument {
    airspaces: Vec<RawAirspace>,
}

#[derive(Debug, Deserialize)]
struct RawAirspace {
    name: String,
    #[serde(default)]
    class: Option<String>,
    floor: RawAltitude,
    ceiling: RawAltitude,
    boundary: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct RawAltitude {
    ft: f64,
    #[serde(rename = "ref", default)]
    reference: AltitudeReference,
}

impl From<RawAltitude> for Altitude {
    fn from(raw: RawAltitude) -> Self {
        Altitude::new(raw.ft.round() as i32, raw.reference)
    }
}

/// Reader for JSON airspace files
///
/// # Example
///
/// ```no_run
/// use skydrop_air::AirspaceReader;
///
/// let mut warnings = Vec::new();
/// let airspaces = AirspaceReader::from_path("airspace.json")?.read_airspaces(&mut warnings)?;
/// println!("{} airspaces, {} warnings", airspaces.len(), warnings.len());
/// # Ok::<(), skydrop_air::Error>(())
/// ```
pub struct AirspaceReader<R: Read> {
    reader: BufReader<R>,
}

impl AirspaceReader<File> {
    /// Create a reader from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> AirspaceReader<R> {
    /// Create a reader from any `Read` source
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read all airspaces, in file order
    ///
    /// Airspaces of classes that are never rasterized are skipped and
    /// unclosed rings are closed; both push a [`Warning`].
    pub fn read_airspaces(mut self, warnings: &mut Vec<Warning>) -> Result<Vec<Airspace>> {
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;

        let document: RawDocument = serde_json::from_str(&decode_text(&bytes))?;

        let mut airspaces = Vec::with_capacity(document.airspaces.len());
        for raw in document.airspaces {
            if let Some(airspace) = convert_airspace(raw, warnings)? {
                airspaces.push(airspace);
            }
        }

        log::debug!("read {} airspaces", airspaces.len());
        Ok(airspaces)
    }
}

fn convert_airspace(raw: RawAirspace, warnings: &mut Vec<Warning>) -> Result<Option<Airspace>> {
    let class = raw
        .class
        .as_deref()
        .map(AirspaceClass::from_code)
        .unwrap_or_default();

    if !class.is_rasterized() {
        warnings.push(Warning::SkippedClass {
            name: raw.name,
            class: raw.class.unwrap_or_default(),
        });
        return Ok(None);
    }

    let floor = Altitude::from(raw.floor);
    let ceiling = Altitude::from(raw.ceiling);
    if floor >= ceiling {
        return Err(Error::InvalidAltitudeBand {
            name: raw.name,
            floor,
            ceiling,
        });
    }

    let points: Vec<Point> = raw
        .boundary
        .iter()
        .map(|&[lon, lat]| Point::new(lat, lon))
        .collect();
    validate_boundary(&raw.name, &points)?;

    if points.first() != points.last() {
        warnings.push(Warning::UnclosedBoundary {
            name: raw.name.clone(),
        });
    }

    Ok(Some(
        Airspace::new(raw.name, floor, ceiling, &points).with_class(class),
    ))
}

fn validate_boundary(name: &str, points: &[Point]) -> Result<()> {
    let invalid = |reason: String| Error::InvalidBoundary {
        name: name.to_string(),
        reason,
    };

    if let Some(point) = points.iter().find(|point| !point.is_valid()) {
        return Err(invalid(format!("coordinate out of range: {point}")));
    }

    let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
    for &point in points {
        if !distinct.contains(&point) {
            distinct.push(point);
        }
    }
    if distinct.len() < 3 {
        return Err(invalid(format!("{} distinct points, at least 3 needed", distinct.len())));
    }

    Ok(())
}
