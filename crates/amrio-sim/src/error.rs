//! Merge-level error type.

use std::error::Error;
use std::fmt;

use amrio_core::{SeriesError, Time};
use amrio_field::FieldError;
use amrio_geometry::GeometryError;

use crate::config::ConfigError;
use crate::decode::DecodeError;

/// Errors that abort the merge of a timestep.
///
/// A timestep that fails with any of these is not admitted: every
/// container of the aggregate is left as it was.
#[derive(Clone, Debug, PartialEq)]
pub enum DataError {
    /// Time-key collision or misplaced insert.
    Series(SeriesError),
    /// Block records do not form a valid geometry.
    Geometry(GeometryError),
    /// A field array does not fit the geometry.
    Field(FieldError),
    /// The decoder could not produce a snapshot.
    Decode(DecodeError),
    /// The configuration is invalid.
    Config(ConfigError),
    /// The scalar payload carries a time that differs from the snapshot's.
    InconsistentTimestep {
        /// Time key of the snapshot.
        expected: Time,
        /// Time stored in the scalar payload.
        found: Time,
    },
    /// A field present in one source part is missing from another.
    MissingField {
        /// Field name.
        name: String,
        /// Index of the part that lacks it.
        part: usize,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Series(e) => write!(f, "series: {e}"),
            Self::Geometry(e) => write!(f, "geometry: {e}"),
            Self::Field(e) => write!(f, "field: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::InconsistentTimestep { expected, found } => {
                write!(f, "scalar time {found} disagrees with snapshot time {expected}")
            }
            Self::MissingField { name, part } => {
                write!(f, "field '{name}' is missing from source part {part}")
            }
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Series(e) => Some(e),
            Self::Geometry(e) => Some(e),
            Self::Field(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SeriesError> for DataError {
    fn from(e: SeriesError) -> Self {
        Self::Series(e)
    }
}

impl From<GeometryError> for DataError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}

impl From<FieldError> for DataError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<DecodeError> for DataError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<ConfigError> for DataError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
