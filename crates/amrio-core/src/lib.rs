//! Core types and traits for amrio.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! time-ordered container every simulation payload lives in
//! ([`SortedSeries`]), the composite two-axis indexing built on top of it
//! ([`CompositeSeries`]), strongly-typed ids, scalar values, and the query
//! error types.
//!
//! # Indexing model
//!
//! ```text
//! fields.at(TimeSelection)        -> CompositeSeries   (time axis)
//!       .select(NameSelection)    -> Selected          (name axis)
//!       .slice_cells(&SpatialSlice) -> arrays         (spatial axis, amrio-field)
//! ```
//!
//! Every axis is a pure projection: nothing in the underlying container is
//! copied or mutated.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod composite;
pub mod error;
pub mod id;
pub mod selection;
pub mod series;
pub mod traits;
pub mod value;

pub use composite::{CompositeSeries, Projection, Selected, Transposed};
pub use error::{SelectError, SeriesError, SliceError};
pub use id::{BlockId, Time};
pub use selection::{NameSelection, ShapePolicy, TimeSelection};
pub use series::{KeyRange, OnDuplicate, SortedSeries};
pub use traits::{Composite, Named, Ordered, Sliceable};
pub use value::ScalarValue;
