//! Decoded snapshot payloads and their assembly into a timestep.

use std::sync::Arc;

use amrio_core::Time;
use amrio_field::{FieldArray, FieldData};
use amrio_geometry::{concat_sources, BlockRecord, BlockShape, GeometryData};
use indexmap::IndexMap;
use ndarray::{Array4, Axis, Slice};
use tracing::trace;

use crate::config::SimulationConfig;
use crate::error::DataError;
use crate::scalars::ScalarData;
use crate::statics::StaticData;

/// Blocks and fields from one independently enumerated source.
///
/// Ids in `blocks` start at zero within the part; field arrays have one
/// row per block of the part.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapshotPart {
    /// Block records, ids local to this part.
    pub blocks: Vec<BlockRecord>,
    /// Field name → `(block, z, y, x)` array, interior-shaped or padded.
    pub fields: IndexMap<String, Array4<f64>>,
}

/// Everything a decoder produced for one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedSnapshot {
    /// Time key shared by all payloads.
    pub time: Time,
    /// Cells and guards per block.
    pub shape: BlockShape,
    /// Geometry and field payloads, one entry per source.
    pub parts: Vec<SnapshotPart>,
    /// Scalar payload.
    pub scalars: ScalarData,
    /// Static payload.
    pub statics: StaticData,
}

/// One fully assembled timestep.
///
/// Payloads are shared with the containers they were merged into.
#[derive(Clone, Debug, PartialEq)]
pub struct Timestep {
    /// Time key.
    pub time: Time,
    /// Resolved geometry.
    pub geometry: Arc<GeometryData>,
    /// Fields, guards filled when configured.
    pub fields: Arc<FieldData>,
    /// Scalars.
    pub scalars: Arc<ScalarData>,
    /// Statics.
    pub statics: Arc<StaticData>,
}

impl DecodedSnapshot {
    /// A snapshot with a single source part.
    pub fn single(
        time: Time,
        shape: BlockShape,
        part: SnapshotPart,
        scalars: ScalarData,
        statics: StaticData,
    ) -> Self {
        Self {
            time,
            shape,
            parts: vec![part],
            scalars,
            statics,
        }
    }

    /// Build the timestep: geometry, neighbors, guard plan, fields, guard
    /// fill. Either everything succeeds or nothing is returned.
    pub fn assemble(self, config: &SimulationConfig) -> Result<Timestep, DataError> {
        config.validate()?;
        if let Some(found) = self.scalars.time() {
            if found != self.time {
                return Err(DataError::InconsistentTimestep {
                    expected: self.time,
                    found,
                });
            }
        }

        let counts: Vec<usize> = self.parts.iter().map(|p| p.blocks.len()).collect();
        let (blocks, fields): (Vec<_>, Vec<_>) = self
            .parts
            .into_iter()
            .map(|p| (p.blocks, p.fields))
            .unzip();
        let (records, _) = concat_sources(blocks);
        let geometry = GeometryData::new(self.shape, records, &config.resolve_config())?;

        let mut fields = join_parts(fields, &self.shape, &counts)?;
        if config.fill_guards {
            fields.fill_guards(geometry.guard_plan())?;
        }
        trace!(
            time = %self.time,
            blocks = geometry.len(),
            fields = fields.len(),
            "assembled timestep"
        );

        Ok(Timestep {
            time: self.time,
            geometry: Arc::new(geometry),
            fields: Arc::new(fields),
            scalars: Arc::new(self.scalars),
            statics: Arc::new(self.statics),
        })
    }
}

/// Stack per-part arrays along the block axis, in part order.
fn join_parts(
    mut parts: Vec<IndexMap<String, Array4<f64>>>,
    shape: &BlockShape,
    counts: &[usize],
) -> Result<FieldData, DataError> {
    let total: usize = counts.iter().sum();
    if parts.len() == 1 {
        let only = parts.pop().unwrap_or_default();
        return Ok(FieldData::from_payloads(only, shape, total)?);
    }

    let mut names: Vec<String> = Vec::new();
    for part in &parts {
        for name in part.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }

    let [_, pz, py, px] = shape.padded_shape(total);
    let mut data = FieldData::new();
    for name in names {
        let mut joined = Array4::zeros((total, pz, py, px));
        let mut offset = 0;
        for (index, (part, &count)) in parts.iter_mut().zip(counts).enumerate() {
            let array = part.swap_remove(&name).ok_or_else(|| DataError::MissingField {
                name: name.clone(),
                part: index,
            })?;
            let field = FieldArray::from_payload(&name, array, shape, count)?;
            joined
                .slice_axis_mut(Axis(0), Slice::from(offset..offset + count))
                .assign(&field.padded());
            offset += count;
        }
        let field = FieldArray::from_payload(&name, joined, shape, total)?;
        data.insert(name, field);
    }
    Ok(data)
}
