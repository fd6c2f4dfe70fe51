//! Time-ordered simulation data for block-structured AMR runs.
//!
//! [`SimulationData`] merges decoded snapshots into four parallel
//! containers keyed by simulation time: geometry, fields, scalars, and
//! statics. Every timestep is assembled completely before it is admitted:
//! block ids are shifted across source parts, neighbors are resolved, the
//! guard plan is built, field arrays are padded and guard-filled. A
//! timestep that fails any of these steps leaves the aggregate unchanged.
//!
//! Reading snapshot files is delegated to a [`SnapshotDecoder`]; this crate
//! only names the files ([`SnapshotNames`]) and consumes
//! [`DecodedSnapshot`] payloads.
//!
//! # Example
//!
//! ```ignore
//! let names = SnapshotNames::from_numbers(0..=20).directory("out").header("plt_");
//! let data = SimulationData::from_sequence(&names, &decoder, SimulationConfig::default())?;
//!
//! let window = data.fields().at(&TimeSelection::from(10.0..20.0));
//! let pressure = window.select_one("pres")?;
//! let first_block = pressure.slice_interior(&SpatialSlice::all().then(0isize))?;
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod data;
pub mod decode;
pub mod error;
pub mod scalars;
pub mod snapshot;
pub mod statics;
pub mod utility;

pub use config::{ConfigError, SimulationConfig};
pub use data::SimulationData;
pub use decode::{DecodeError, SnapshotDecoder, SnapshotNames};
pub use error::DataError;
pub use scalars::ScalarData;
pub use snapshot::{DecodedSnapshot, SnapshotPart, Timestep};
pub use statics::{reduce_label, ParameterGroup, StaticData};
pub use utility::TimeLookup;
