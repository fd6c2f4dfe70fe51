//! Error types for field construction and guard fill.

use std::fmt;

/// Errors arising when a field array does not fit its geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// The array is neither interior-shaped nor padded for its blocks.
    ShapeMismatch {
        /// Field name.
        field: String,
        /// Padded shape `(block, z, y, x)` the geometry expects.
        expected: [usize; 4],
        /// Shape supplied.
        found: [usize; 4],
    },
    /// The array's block axis disagrees with the geometry's block count.
    BlockCountMismatch {
        /// Field name.
        field: String,
        /// Blocks in the geometry.
        expected: usize,
        /// Rows in the array.
        found: usize,
    },
    /// A guard plan was applied to an array of a different layout.
    PlanMismatch {
        /// Shape the plan indexes.
        expected: [usize; 4],
        /// Shape of the array.
        found: [usize; 4],
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field '{field}' has shape {found:?}, expected {expected:?} or its interior"
            ),
            Self::BlockCountMismatch {
                field,
                expected,
                found,
            } => write!(f, "field '{field}' has {found} blocks, geometry has {expected}"),
            Self::PlanMismatch { expected, found } => {
                write!(f, "guard plan expects shape {expected:?}, array is {found:?}")
            }
        }
    }
}

impl std::error::Error for FieldError {}
