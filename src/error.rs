use crate::types::{Altitude, Point};
use std::{fmt, io};

/// Unrecoverable processing errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid airspace file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Airspace {name:?}: floor {floor} is not below ceiling {ceiling}")]
    InvalidAltitudeBand {
        name: String,
        floor: Altitude,
        ceiling: Altitude,
    },

    #[error("Airspace {name:?}: invalid boundary ({reason})")]
    InvalidBoundary { name: String, reason: String },

    /// More airspaces contain the point than there are levels to store them
    #[error("Too many airspaces and none is far away at {point} ({levels} levels available)")]
    LevelBudgetExceeded { point: Point, levels: usize },

    #[error("Interrupted while computing {tile}")]
    Interrupted { tile: String },

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),
}

/// Non-fatal issues encountered while reading airspace input
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Airspace class that is never written to the raster
    SkippedClass { name: String, class: String },

    /// Boundary ring whose last point differs from its first, closed automatically
    UnclosedBoundary { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SkippedClass { name, class } => {
                write!(f, "Skipping airspace {name:?} of class {class}")
            }
            Warning::UnclosedBoundary { name } => {
                write!(f, "Airspace {name:?}: boundary not closed, closing it")
            }
        }
    }
}
