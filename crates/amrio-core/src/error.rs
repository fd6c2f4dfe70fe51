//! Error types for container mutation and composite queries.
//!
//! Split by phase: [`SeriesError`] is raised while building or mutating a
//! time-ordered container, [`SelectError`] while projecting one through
//! the name and spatial axes, [`SliceError`] while resolving a spatial
//! slice against a concrete array shape.

use std::error::Error;
use std::fmt;

use crate::id::Time;

/// Errors from mutating a [`SortedSeries`](crate::SortedSeries).
///
/// Generic over the key type so non-time series report their own keys;
/// simulation containers use the [`Time`] default.
#[derive(Clone, Debug, PartialEq)]
pub enum SeriesError<K = Time> {
    /// The key is already present and the duplicate policy is `Reject`.
    DuplicateKey {
        /// The colliding key.
        key: K,
    },
    /// A key required to exist was not found.
    KeyNotFound {
        /// The missing key.
        key: K,
    },
    /// A positional insert would break ascending key order.
    Misplaced {
        /// The requested position.
        position: usize,
        /// The key that does not fit there.
        key: K,
    },
    /// A positional insert past the end of the container.
    PositionOutOfRange {
        /// The requested position.
        position: usize,
        /// Current container length.
        len: usize,
    },
}

impl<K: fmt::Display> fmt::Display for SeriesError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { key } => write!(f, "duplicate key {key}"),
            Self::KeyNotFound { key } => write!(f, "key {key} not found"),
            Self::Misplaced { position, key } => {
                write!(f, "key {key} does not keep ascending order at position {position}")
            }
            Self::PositionOutOfRange { position, len } => {
                write!(f, "position {position} out of range for length {len}")
            }
        }
    }
}

impl<K: fmt::Debug + fmt::Display> Error for SeriesError<K> {}

/// Errors from resolving a spatial slice against an array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SliceError {
    /// More indexing axes than the array has dimensions.
    TooManyAxes {
        /// Axes requested (excluding ellipsis).
        requested: usize,
        /// Dimensions available.
        ndim: usize,
    },
    /// More than one ellipsis in a single slice.
    MultipleEllipsis,
    /// An integer index outside `-len..len`.
    IndexOutOfBounds {
        /// The array axis being indexed.
        axis: usize,
        /// The offending index.
        index: isize,
        /// Axis length.
        len: usize,
    },
    /// A range with step zero.
    ZeroStep {
        /// The array axis being sliced.
        axis: usize,
    },
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyAxes { requested, ndim } => {
                write!(f, "slice indexes {requested} axes but array has {ndim}")
            }
            Self::MultipleEllipsis => write!(f, "at most one ellipsis is allowed"),
            Self::IndexOutOfBounds { axis, index, len } => {
                write!(f, "index {index} out of bounds for axis {axis} of length {len}")
            }
            Self::ZeroStep { axis } => write!(f, "slice step on axis {axis} is zero"),
        }
    }
}

impl Error for SliceError {}

/// Errors from the name and spatial axes of a composite query.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectError {
    /// A requested name is not present in a selected timestep.
    UnknownName {
        /// The requested name.
        name: String,
        /// The first timestep that lacks it.
        time: Time,
    },
    /// A single-result selection matched more than one name.
    Ambiguous {
        /// The names that were requested.
        names: Vec<String>,
    },
    /// A multi-name selection with no names.
    EmptySelection,
    /// The spatial slice could not be applied.
    Slice(SliceError),
    /// Per-timestep arrays could not be joined along a time axis.
    Stack {
        /// Description of the shape disagreement.
        reason: String,
    },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownName { name, time } => {
                write!(f, "unknown name '{name}' at time {time}")
            }
            Self::Ambiguous { names } => {
                write!(f, "ambiguous single selection of {} names: {names:?}", names.len())
            }
            Self::EmptySelection => write!(f, "selection names no entries"),
            Self::Slice(e) => write!(f, "spatial slice: {e}"),
            Self::Stack { reason } => write!(f, "cannot stack along time: {reason}"),
        }
    }
}

impl Error for SelectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Slice(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SliceError> for SelectError {
    fn from(e: SliceError) -> Self {
        Self::Slice(e)
    }
}
