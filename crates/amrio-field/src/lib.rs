//! Field arrays for block-structured AMR snapshots.
//!
//! A [`FieldArray`] holds one named quantity for every block of a
//! timestep, laid out `(block, z, y, x)` with guard padding on every
//! active axis. [`FieldData`] is a timestep's name → array map; it fills
//! guard cells by applying the geometry's
//! [`GuardPlan`](amrio_geometry::GuardPlan).
//!
//! [`SpatialSlice`] is the third indexing axis: after a time selection and
//! a name selection, [`SliceFields`] applies it to every selected array
//! without copying.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod error;
pub mod field;
pub mod guard;
pub mod slice;

pub use array::FieldArray;
pub use error::FieldError;
pub use field::FieldData;
pub use guard::apply_guard_plan;
pub use slice::{AxisSlice, SliceFields, SpatialSlice};
