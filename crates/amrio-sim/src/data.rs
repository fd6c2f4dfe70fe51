//! The process-wide simulation aggregate.

use std::sync::Arc;

use amrio_core::{CompositeSeries, OnDuplicate, ShapePolicy, SortedSeries, Time};
use amrio_field::FieldData;
use amrio_geometry::GeometryData;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::decode::{SnapshotDecoder, SnapshotNames};
use crate::error::DataError;
use crate::scalars::ScalarData;
use crate::snapshot::{DecodedSnapshot, Timestep};
use crate::statics::StaticData;
use crate::utility::{self, TimeLookup};

/// Every timestep of a run, keyed by simulation time.
///
/// The four containers always hold the same set of times. Mutation goes
/// through [`append`](Self::append), [`insert`](Self::insert),
/// [`extend`](Self::extend), and the pops, which either change all four or
/// none.
///
/// | Container | Name axis | Multi-name result |
/// |-----------|-----------|-------------------|
/// | [`geometry`](Self::geometry) | none | |
/// | [`fields`](Self::fields) | field name | [`ShapePolicy::AsArray`] |
/// | [`scalars`](Self::scalars) | scalar name | [`ShapePolicy::AsArray`] |
/// | [`statics`](Self::statics) | group name | [`ShapePolicy::AsSingle`] |
#[derive(Clone, Debug)]
pub struct SimulationData {
    config: SimulationConfig,
    geometry: SortedSeries<Time, Arc<GeometryData>>,
    fields: CompositeSeries<FieldData>,
    scalars: CompositeSeries<ScalarData>,
    statics: CompositeSeries<StaticData>,
}

impl SimulationData {
    /// An empty aggregate.
    pub fn new(config: SimulationConfig) -> Result<Self, DataError> {
        config.validate()?;
        Ok(Self {
            config,
            geometry: SortedSeries::new(),
            fields: CompositeSeries::new(ShapePolicy::AsArray),
            scalars: CompositeSeries::new(ShapePolicy::AsArray),
            statics: CompositeSeries::new(ShapePolicy::AsSingle),
        })
    }

    /// Merge already decoded snapshots in order, with the configured
    /// duplicate policy.
    pub fn from_snapshots<I>(snapshots: I, config: SimulationConfig) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = DecodedSnapshot>,
    {
        let mut data = Self::new(config)?;
        let policy = data.config.on_duplicate;
        for snapshot in snapshots {
            data.append(snapshot, policy)?;
        }
        Ok(data)
    }

    /// Decode and merge every file `names` lists, in order.
    pub fn from_sequence<D>(
        names: &SnapshotNames,
        decoder: &D,
        config: SimulationConfig,
    ) -> Result<Self, DataError>
    where
        D: SnapshotDecoder + ?Sized,
    {
        let mut data = Self::new(config)?;
        let policy = data.config.on_duplicate;
        info!(files = names.len(), "building simulation data");
        for path in names.paths() {
            info!(file = %path.display(), "processing file");
            let snapshot = decoder.decode(&path)?;
            data.append(snapshot, policy)?;
        }
        info!(timesteps = data.len(), "simulation data built");
        Ok(data)
    }

    /// Assemble `snapshot` and merge it at its sorted position.
    ///
    /// With [`OnDuplicate::Overwrite`] an existing timestep at the same
    /// time is replaced as a whole.
    pub fn append(&mut self, snapshot: DecodedSnapshot, policy: OnDuplicate) -> Result<(), DataError> {
        let ts = snapshot.assemble(&self.config)?;
        self.push(ts, policy)
    }

    /// Assemble `snapshot` and merge it at `position`, which must keep
    /// times ascending.
    pub fn insert(&mut self, position: usize, snapshot: DecodedSnapshot) -> Result<(), DataError> {
        let ts = snapshot.assemble(&self.config)?;
        let time = ts.time;
        self.geometry.insert(position, time, ts.geometry)?;
        self.fields.insert(position, time, ts.fields)?;
        self.scalars.insert(position, time, ts.scalars)?;
        self.statics.insert(position, time, ts.statics)?;
        log_merged(time, &self.geometry, &self.fields);
        Ok(())
    }

    /// Merge an already assembled timestep.
    pub fn push(&mut self, timestep: Timestep, policy: OnDuplicate) -> Result<(), DataError> {
        let time = timestep.time;
        self.geometry.append(time, timestep.geometry, policy)?;
        self.fields.append(time, timestep.fields, policy)?;
        self.scalars.append(time, timestep.scalars, policy)?;
        self.statics.append(time, timestep.statics, policy)?;
        log_merged(time, &self.geometry, &self.fields);
        Ok(())
    }

    /// Merge every timestep of `other`.
    ///
    /// With [`OnDuplicate::Reject`] a shared time fails the call before
    /// anything changes; with `Overwrite` `other`'s timestep wins.
    pub fn extend(&mut self, other: SimulationData, policy: OnDuplicate) -> Result<(), DataError> {
        let added = other.len();
        self.geometry.extend(other.geometry, policy)?;
        self.fields.extend(other.fields, policy)?;
        self.scalars.extend(other.scalars, policy)?;
        self.statics.extend(other.statics, policy)?;
        debug!(added, timesteps = self.len(), "extended simulation data");
        Ok(())
    }

    /// Remove the timestep at `time`.
    pub fn pop(&mut self, time: Time) -> Option<Timestep> {
        Some(Timestep {
            time,
            geometry: self.geometry.pop(&time)?,
            fields: self.fields.pop(time)?,
            scalars: self.scalars.pop(time)?,
            statics: self.statics.pop(time)?,
        })
    }

    /// Remove the latest timestep.
    pub fn pop_last(&mut self) -> Option<Timestep> {
        let (time, geometry) = self.geometry.pop_last()?;
        Some(Timestep {
            time,
            geometry,
            fields: self.fields.pop_last()?.1,
            scalars: self.scalars.pop_last()?.1,
            statics: self.statics.pop_last()?.1,
        })
    }

    /// The timestep at `time`, sharing its payloads.
    pub fn timestep(&self, time: Time) -> Option<Timestep> {
        Some(Timestep {
            time,
            geometry: Arc::clone(self.geometry.get(&time)?),
            fields: Arc::clone(self.fields.series().get(&time)?),
            scalars: Arc::clone(self.scalars.series().get(&time)?),
            statics: Arc::clone(self.statics.series().get(&time)?),
        })
    }

    /// Stored times, ascending.
    pub fn times(&self) -> impl DoubleEndedIterator<Item = Time> + ExactSizeIterator + '_ {
        self.geometry.keys()
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    /// Returns `true` if no timestep has been merged.
    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// The configuration used for merging.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Per-timestep geometry.
    pub fn geometry(&self) -> &SortedSeries<Time, Arc<GeometryData>> {
        &self.geometry
    }

    /// Geometry of the timestep at `time`.
    pub fn geometry_at(&self, time: Time) -> Option<&GeometryData> {
        self.geometry.get(&time).map(Arc::as_ref)
    }

    /// Per-timestep fields.
    pub fn fields(&self) -> &CompositeSeries<FieldData> {
        &self.fields
    }

    /// Per-timestep scalars.
    pub fn scalars(&self) -> &CompositeSeries<ScalarData> {
        &self.scalars
    }

    /// Per-timestep statics.
    pub fn statics(&self) -> &CompositeSeries<StaticData> {
        &self.statics
    }

    /// Positions matching an approximate lookup.
    pub fn lookup_indices(&self, lookup: &TimeLookup) -> Vec<usize> {
        let keys: Vec<Time> = self.times().collect();
        utility::indices(&keys, lookup)
    }

    /// Stored times matching an approximate lookup.
    pub fn lookup_times(&self, lookup: &TimeLookup) -> Vec<Time> {
        let keys: Vec<Time> = self.times().collect();
        utility::times(&keys, lookup)
    }
}

impl PartialEq for SimulationData {
    fn eq(&self, other: &Self) -> bool {
        self.geometry == other.geometry
            && self.fields == other.fields
            && self.scalars == other.scalars
            && self.statics == other.statics
    }
}

fn log_merged(time: Time, geometry: &SortedSeries<Time, Arc<GeometryData>>, fields: &CompositeSeries<FieldData>) {
    debug!(
        %time,
        blocks = geometry.get(&time).map_or(0, |g| g.len()),
        fields = fields.get(time).map_or(0, FieldData::len),
        "merged timestep"
    );
}
