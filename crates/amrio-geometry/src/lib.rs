//! Block geometry for block-structured AMR snapshots.
//!
//! One [`GeometryData`] describes every block of a single timestep: its
//! bounding box, refinement level, tree ancestry, and the face neighbors
//! resolved from those boxes. Construction also derives per-block mesh
//! coordinates and a [`GuardPlan`], the list of guard-cell stencils that
//! `amrio-field` applies to every field array of the same timestep.
//!
//! # Neighbor resolution
//!
//! For each block and each face, the search runs at the block's own level,
//! then one level coarser, then one level finer. The first level with a
//! candidate wins; among several candidates the one sharing the largest
//! face area is recorded, ties going to the lowest id. A face with no
//! candidate is a [`Neighbor::Boundary`].
//!
//! Blocks live in a flat arena indexed by [`BlockId`](amrio_core::BlockId);
//! neighbor, parent and child links are plain ids.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod bounds;
pub mod config;
pub mod error;
pub mod geometry;
pub mod guard;
pub mod mesh;
pub mod query;
pub(crate) mod resolve;
pub mod shift;

pub use block::{Block, BlockRecord, BlockShape, Neighbor, TreePath};
pub use bounds::{BoundingBox, Face};
pub use config::ResolveConfig;
pub use error::GeometryError;
pub use geometry::GeometryData;
pub use guard::{GuardPlan, Stencil};
pub use mesh::{MeshCoordinates, Staggering};
pub use resolve::ResolveStats;
pub use shift::{concat_sources, shift_records};
