//! Fixed 4-byte level encoding read by the device
//!
//! | byte | content                                                     |
//! |------|-------------------------------------------------------------|
//! | 0    | floor / altitude step, bit 7 set for AGL                    |
//! | 1    | ceiling / altitude step, bit 7 set for AGL, `0x7F` = no limit |
//! | 2    | bearing / bearing step, bit 7 set when inside               |
//! | 3    | distance / distance step, saturating                        |
//!
//! A ceiling of `0` (after masking bit 7) marks an unused level. All
//! quantization is lossy and out-of-range values are clamped, never rejected.

use crate::config::{LEVEL_SIZE, LevelConfig};
use crate::types::{AirspaceVector, Altitude, AltitudeReference};
use std::fmt;

const AGL_FLAG: u8 = 0x80;
const INSIDE_FLAG: u8 = 0x80;
const VALUE_MASK: u8 = 0x7F;

/// Low 7 bits of a ceiling byte for an airspace without upper limit
pub const CEILING_MAX: u8 = 0x7F;

/// One encoded level
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelDescriptor([u8; LEVEL_SIZE]);

impl LevelDescriptor {
    /// Padding for levels without airspace
    pub const EMPTY: Self = Self([0; LEVEL_SIZE]);

    /// Wrap four bytes read from a tile record
    pub const fn from_bytes(bytes: [u8; LEVEL_SIZE]) -> Self {
        Self(bytes)
    }

    /// Bytes as written to a tile record
    pub fn as_bytes(&self) -> &[u8; LEVEL_SIZE] {
        &self.0
    }

    /// Quantize an airspace vector
    pub fn encode(vector: &AirspaceVector<'_>, config: &LevelConfig) -> Self {
        Self([
            encode_altitude(vector.floor(), config.altitude_step_ft),
            encode_altitude(vector.ceiling(), config.altitude_step_ft),
            encode_bearing(vector.bearing, vector.inside, config.bearing_step_deg),
            encode_distance(vector.distance, config.distance_step),
        ])
    }

    /// Floor byte including the AGL flag
    pub fn floor_byte(&self) -> u8 {
        self.0[0]
    }

    /// Ceiling byte including the AGL flag
    pub fn ceiling_byte(&self) -> u8 {
        self.0[1]
    }

    /// Bearing byte including the inside flag
    pub fn bearing_byte(&self) -> u8 {
        self.0[2]
    }

    /// Distance in steps, saturated at 255
    pub fn distance_byte(&self) -> u8 {
        self.0[3]
    }

    /// Whether this level holds no airspace
    pub fn is_empty(&self) -> bool {
        self.ceiling_byte() & VALUE_MASK == 0
    }

    /// Dequantize, `None` for an unused level
    pub fn decode(&self, config: &LevelConfig) -> Option<DecodedLevel> {
        if self.is_empty() {
            return None;
        }

        let ceiling = if self.ceiling_byte() & VALUE_MASK == CEILING_MAX {
            Ceiling::Max(AltitudeReference::from_agl_flag(
                self.ceiling_byte() & AGL_FLAG != 0,
            ))
        } else {
            Ceiling::Limited(decode_altitude(self.ceiling_byte(), config.altitude_step_ft))
        };

        Some(DecodedLevel {
            floor: decode_altitude(self.floor_byte(), config.altitude_step_ft),
            ceiling,
            bearing: f64::from(self.bearing_byte() & VALUE_MASK) * config.bearing_step_deg,
            inside: self.bearing_byte() & INSIDE_FLAG != 0,
            distance: f64::from(self.distance_byte()) * config.distance_step,
        })
    }
}

impl fmt::Debug for LevelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [floor, ceiling, bearing, distance] = self.0;
        write!(
            f,
            "LevelDescriptor([0x{floor:02X}, 0x{ceiling:02X}, 0x{bearing:02X}, 0x{distance:02X}])"
        )
    }
}

/// Upper limit of a decoded level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ceiling {
    Limited(Altitude),
    /// No upper limit within the encodable range
    Max(AltitudeReference),
}

impl fmt::Display for Ceiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ceiling::Limited(altitude) => {
                write!(f, "{} {}", altitude.feet, altitude.reference.label())
            }
            Ceiling::Max(reference) => write!(f, "MAX {}", reference.label()),
        }
    }
}

/// Level as the device sees it after dequantization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedLevel {
    pub floor: Altitude,
    pub ceiling: Ceiling,
    pub bearing: f64,
    pub inside: bool,
    pub distance: f64,
}

impl fmt::Display for DecodedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "floor={} {} ceil={} angle={} distance={}",
            self.floor.feet,
            self.floor.reference.label(),
            self.ceiling,
            self.bearing,
            self.distance
        )?;
        if self.inside {
            f.write_str(" INSIDE!")?;
        }
        Ok(())
    }
}

/// Quantize an altitude into a floor/ceiling byte
pub fn encode_altitude(altitude: Altitude, step_ft: f64) -> u8 {
    let raw = (f64::from(altitude.feet) / step_ft)
        .round()
        .clamp(0.0, f64::from(VALUE_MASK)) as u8;

    if altitude.is_agl() { raw | AGL_FLAG } else { raw }
}

/// Dequantize a floor/ceiling byte
pub fn decode_altitude(byte: u8, step_ft: f64) -> Altitude {
    let feet = (f64::from(byte & VALUE_MASK) * step_ft).round() as i32;
    Altitude::new(feet, AltitudeReference::from_agl_flag(byte & AGL_FLAG != 0))
}

/// Quantize a bearing and the inside flag into one byte
///
/// A bearing that rounds up to a full turn wraps to `0`.
pub fn encode_bearing(bearing: f64, inside: bool, step_deg: f64) -> u8 {
    let slots = (360.0 / step_deg).round();
    let raw = (bearing / step_deg)
        .round()
        .rem_euclid(slots)
        .clamp(0.0, f64::from(VALUE_MASK)) as u8;

    if inside { raw | INSIDE_FLAG } else { raw }
}

/// Quantize a distance, saturating at 255 steps
pub fn encode_distance(distance: f64, step: f64) -> u8 {
    (distance / step).round().clamp(0.0, f64::from(u8::MAX)) as u8
}

/// Split a point record into its levels and decode each one
pub fn decode_record(record: &[u8], config: &LevelConfig) -> Vec<Option<DecodedLevel>> {
    record
        .chunks_exact(LEVEL_SIZE)
        .map(|chunk| {
            let mut bytes = [0u8; LEVEL_SIZE];
            bytes.copy_from_slice(chunk);
            LevelDescriptor::from_bytes(bytes).decode(config)
        })
        .collect()
}

/// Human readable listing of a point record, one line per level
pub fn describe_record(record: &[u8], config: &LevelConfig) -> Vec<String> {
    decode_record(record, config)
        .into_iter()
        .enumerate()
        .map(|(index, level)| match level {
            Some(level) => format!("level {index} {level}"),
            None => format!("level {index} ---"),
        })
        .collect()
}
