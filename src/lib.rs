#![doc = include_str!("../README.md")]

pub use crate::codec::{Ceiling, DecodedLevel, LevelDescriptor};
pub use crate::compact::LevelCompactor;
pub use crate::config::{GridConfig, LevelConfig};
pub use crate::encoder::PointEncoder;
pub use crate::error::{Error, Result, Warning};
pub use crate::geometry::{AirspaceIndex, GeometryProvider};
pub use crate::reader::AirspaceReader;
pub use crate::resolve::HeightBands;
pub use crate::tile::Tile;
pub use crate::types::*;
pub use crate::writer::{TileOutcome, TileWriter};

pub mod codec;
pub mod compact;
pub mod config;
pub mod dispatch;
pub mod encoder;
mod error;
pub mod geometry;
mod reader;
pub mod resolve;
pub mod tile;
mod types;
pub mod utils;
pub mod writer;
