/// Altitude reference
///
/// Variant order matters: at equal feet an MSL altitude sorts before an AGL one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Deserialize)]
pub enum AltitudeReference {
    #[default]
    #[serde(rename = "MSL", alias = "AMSL")]
    MeanSeaLevel,
    #[serde(rename = "AGL")]
    AboveGroundLevel,
}

impl AltitudeReference {
    /// Short label as used in airspace listings
    pub fn label(self) -> &'static str {
        match self {
            AltitudeReference::MeanSeaLevel => "MSL",
            AltitudeReference::AboveGroundLevel => "AGL",
        }
    }

    /// Reference encoded by the high bit of an altitude byte
    pub fn from_agl_flag(agl: bool) -> Self {
        if agl {
            AltitudeReference::AboveGroundLevel
        } else {
            AltitudeReference::MeanSeaLevel
        }
    }
}

/// Airspace class as given in the source data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AirspaceClass {
    #[default]
    Unknown,
    Restricted,
    Danger,
    Prohibited,
    ClassA,
    ClassB,
    ClassC,
    ClassD,
    ClassG,
    ControlZone,
    GliderProhibited,
    RadioMandatoryZone,
    TransponderMandatoryZone,
    WaveWindow,
    Other(String),
}

impl AirspaceClass {
    /// Parse from the class code used by OpenAir style sources
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "" => AirspaceClass::Unknown,
            "R" => AirspaceClass::Restricted,
            "Q" => AirspaceClass::Danger,
            "P" => AirspaceClass::Prohibited,
            "A" => AirspaceClass::ClassA,
            "B" => AirspaceClass::ClassB,
            "C" => AirspaceClass::ClassC,
            "D" => AirspaceClass::ClassD,
            "G" => AirspaceClass::ClassG,
            "CTR" => AirspaceClass::ControlZone,
            "GP" => AirspaceClass::GliderProhibited,
            "RMZ" => AirspaceClass::RadioMandatoryZone,
            "TMZ" => AirspaceClass::TransponderMandatoryZone,
            "W" => AirspaceClass::WaveWindow,
            other => AirspaceClass::Other(other.to_string()),
        }
    }

    /// Whether airspaces of this class end up in the raster
    ///
    /// Mandatory radio/transponder zones, danger areas, wave windows and
    /// class G are not restrictions a pilot has to avoid.
    pub fn is_rasterized(&self) -> bool {
        !matches!(
            self,
            AirspaceClass::RadioMandatoryZone
                | AirspaceClass::TransponderMandatoryZone
                | AirspaceClass::Danger
                | AirspaceClass::WaveWindow
                | AirspaceClass::ClassG
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msl_sorts_before_agl() {
        assert!(AltitudeReference::MeanSeaLevel < AltitudeReference::AboveGroundLevel);
    }

    #[test]
    fn reference_from_agl_flag() {
        assert_eq!(
            AltitudeReference::from_agl_flag(true),
            AltitudeReference::AboveGroundLevel
        );
        assert_eq!(
            AltitudeReference::from_agl_flag(false),
            AltitudeReference::MeanSeaLevel
        );
    }

    #[test]
    fn class_from_code() {
        assert_eq!(AirspaceClass::from_code("R"), AirspaceClass::Restricted);
        assert_eq!(AirspaceClass::from_code(" CTR "), AirspaceClass::ControlZone);
        assert_eq!(AirspaceClass::from_code(""), AirspaceClass::Unknown);
        assert_eq!(
            AirspaceClass::from_code("E"),
            AirspaceClass::Other("E".to_string())
        );
    }

    #[test]
    fn skipped_classes() {
        for code in ["RMZ", "TMZ", "Q", "W", "G"] {
            assert!(!AirspaceClass::from_code(code).is_rasterized(), "{code}");
        }
        for code in ["R", "P", "A", "B", "C", "D", "GP", "CTR", "E", ""] {
            assert!(AirspaceClass::from_code(code).is_rasterized(), "{code}");
        }
    }
}
