use crate::types::AltitudeReference;
use std::fmt;

/// Altitude in feet with its reference
///
/// Ordered by feet first, then by reference. Height bands are keyed by this
/// ordering, so two limits at the same feet value but different references
/// are distinct breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Altitude {
    pub feet: i32,
    pub reference: AltitudeReference,
}

impl Altitude {
    pub const fn new(feet: i32, reference: AltitudeReference) -> Self {
        Self { feet, reference }
    }

    /// Altitude above mean sea level
    pub const fn msl(feet: i32) -> Self {
        Self::new(feet, AltitudeReference::MeanSeaLevel)
    }

    /// Altitude above ground level
    pub const fn agl(feet: i32) -> Self {
        Self::new(feet, AltitudeReference::AboveGroundLevel)
    }

    pub fn is_agl(&self) -> bool {
        self.reference == AltitudeReference::AboveGroundLevel
    }
}

impl fmt::Display for Altitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ft {}", self.feet, self.reference.label())
    }
}
