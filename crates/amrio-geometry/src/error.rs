//! Error types for geometry construction and block queries.

use amrio_core::BlockId;
use std::fmt;

/// Errors arising while building a [`GeometryData`](crate::GeometryData)
/// or querying it.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// A block's bounding box has `min > max` (or a NaN) on an active axis.
    MalformedBounds {
        /// The offending block.
        block: BlockId,
        /// Spatial axis (0 = x).
        axis: usize,
        /// Lower bound on that axis.
        min: f64,
        /// Upper bound on that axis.
        max: f64,
    },
    /// Two records carry the same id.
    DuplicateBlockId {
        /// The repeated id.
        id: BlockId,
    },
    /// Ids are not the dense range `0..n` after sorting.
    NonContiguousIds {
        /// The id expected at this position.
        expected: BlockId,
        /// The id found instead.
        found: BlockId,
    },
    /// A parent or child link names a block that does not exist.
    DanglingReference {
        /// The block holding the link.
        block: BlockId,
        /// The missing target.
        reference: BlockId,
    },
    /// A query named a spatial axis the geometry does not have.
    DimensionMismatch {
        /// The requested axis.
        axis: usize,
        /// Active dimensions of the geometry.
        ndim: usize,
    },
    /// The block shape cannot describe a valid padded array.
    InvalidShape {
        /// What went wrong.
        reason: String,
    },
    /// The face tolerance is not a usable fraction.
    InvalidTolerance {
        /// The rejected value.
        value: f64,
    },
    /// A geometry was built from zero records.
    EmptyGeometry,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedBounds {
                block,
                axis,
                min,
                max,
            } => write!(
                f,
                "block {block} has malformed bounds on axis {axis}: min {min} > max {max}"
            ),
            Self::DuplicateBlockId { id } => write!(f, "duplicate block id {id}"),
            Self::NonContiguousIds { expected, found } => {
                write!(f, "block ids must be dense: expected {expected}, found {found}")
            }
            Self::DanglingReference { block, reference } => {
                write!(f, "block {block} references missing block {reference}")
            }
            Self::DimensionMismatch { axis, ndim } => {
                write!(f, "axis {axis} out of range for {ndim}-dimensional geometry")
            }
            Self::InvalidShape { reason } => write!(f, "invalid block shape: {reason}"),
            Self::InvalidTolerance { value } => {
                write!(f, "face tolerance {value} must be finite and in (0, 0.5)")
            }
            Self::EmptyGeometry => write!(f, "geometry must contain at least one block"),
        }
    }
}

impl std::error::Error for GeometryError {}
