//! amrio: time-ordered, multiply-indexable access to block-structured AMR
//! simulation output.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! amrio sub-crates. For most users, adding `amrio` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use amrio::prelude::*;
//! use amrio::geometry::{BlockRecord, BoundingBox};
//! use indexmap::IndexMap;
//! use ndarray::Array4;
//!
//! // Two 4x4 blocks side by side with one guard layer.
//! let shape = BlockShape::new(2, [4, 4, 1], 1).unwrap();
//! let snapshot = |t: f64| {
//!     let blocks = vec![
//!         BlockRecord::leaf(BlockId(0), BoundingBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]), 1),
//!         BlockRecord::leaf(BlockId(1), BoundingBox::new([1.0, 0.0, 0.0], [2.0, 1.0, 1.0]), 1),
//!     ];
//!     let dens = Array4::from_shape_fn((2, 1, 4, 4), |(b, _, _, _)| b as f64 + t);
//!     DecodedSnapshot::single(
//!         Time(t),
//!         shape,
//!         SnapshotPart { blocks, fields: IndexMap::from([("dens".to_string(), dens)]) },
//!         ScalarData::new().with(ScalarData::TIME, t),
//!         StaticData::new(),
//!     )
//! };
//!
//! let data = SimulationData::from_snapshots(
//!     [1.0, 2.0, 3.0].map(snapshot),
//!     SimulationConfig::default(),
//! )
//! .unwrap();
//!
//! // time axis, name axis, spatial axis
//! let window = data.fields().at(&TimeSelection::from(1.0..3.0));
//! let dens = window.select_one("dens").unwrap();
//! let guards = dens
//!     .slice_cells(&SpatialSlice::from([AxisSlice::Index(0), AxisSlice::Ellipsis, AxisSlice::Index(-1)]))
//!     .unwrap();
//! // block 0's +x guard column holds block 1's values
//! assert_eq!(guards.get(&Time(2.0)).unwrap()[ndarray::IxDyn(&[0, 2])], 3.0);
//! assert_eq!(guards.len(), 2);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `amrio-core` | Ids, sorted series, composite selection, scalar values |
//! | [`geometry`] | `amrio-geometry` | Blocks, neighbor resolution, mesh coordinates, guard plans |
//! | [`field`] | `amrio-field` | Field arrays, guard fill, spatial slicing |
//! | [`sim`] | `amrio-sim` | Snapshot assembly, the simulation aggregate, decoding seam |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, containers, and selection (`amrio-core`).
///
/// Contains [`types::SortedSeries`], [`types::CompositeSeries`], the
/// selection enums, and the query error types.
pub use amrio_core as types;

/// Block geometry (`amrio-geometry`).
///
/// [`geometry::GeometryData`] resolves face neighbors and derives mesh
/// coordinates and the [`geometry::GuardPlan`].
pub use amrio_geometry as geometry;

/// Field arrays and spatial slicing (`amrio-field`).
pub use amrio_field as field;

/// The simulation aggregate (`amrio-sim`).
///
/// Build a [`sim::SimulationData`] from decoded snapshots or from a
/// [`sim::SnapshotDecoder`] over a [`sim::SnapshotNames`] listing.
pub use amrio_sim as sim;

/// Common imports for typical amrio usage.
///
/// ```rust
/// use amrio::prelude::*;
/// ```
///
/// This imports the aggregate and its configuration, the selection types
/// for all three indexing axes, and the error types.
pub mod prelude {
    // Core types and selection
    pub use amrio_core::{
        BlockId, CompositeSeries, KeyRange, NameSelection, Named, OnDuplicate, ScalarValue,
        Selected, ShapePolicy, SortedSeries, Time, TimeSelection,
    };

    // Errors
    pub use amrio_core::{SelectError, SeriesError, SliceError};
    pub use amrio_field::FieldError;
    pub use amrio_geometry::GeometryError;
    pub use amrio_sim::{ConfigError, DataError, DecodeError};

    // Geometry
    pub use amrio_geometry::{BlockShape, Face, GeometryData, Neighbor, Staggering};

    // Fields
    pub use amrio_field::{AxisSlice, FieldArray, FieldData, SliceFields, SpatialSlice};

    // Simulation
    pub use amrio_sim::{
        DecodedSnapshot, ScalarData, SimulationConfig, SimulationData, SnapshotDecoder,
        SnapshotNames, SnapshotPart, StaticData, TimeLookup,
    };
}
