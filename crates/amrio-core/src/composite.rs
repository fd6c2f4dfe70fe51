//! Two-axis indexing over time-ordered payloads.
//!
//! A [`CompositeSeries`] holds one shared payload per timestep. Selecting on
//! the time axis yields another `CompositeSeries`; selecting on the name
//! axis yields borrowed [`Projection`]s, one time-ordered series per name.
//! Neither step copies a payload.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{SelectError, SeriesError};
use crate::id::Time;
use crate::selection::{NameSelection, ShapePolicy, TimeSelection};
use crate::series::{KeyRange, OnDuplicate, SortedSeries};
use crate::traits::{Composite, Named, Ordered, Sliceable};

/// One name's values across the selected timesteps, borrowed from the
/// owning container.
pub type Projection<'a, T> = SortedSeries<Time, &'a T>;

// ── Transposed ──────────────────────────────────────────────────

/// Name-major view of a multi-name selection.
///
/// Names keep the order in which they were requested; each maps to its
/// own time-ordered [`Projection`].
#[derive(Clone, Debug, PartialEq)]
pub struct Transposed<'a, T> {
    entries: IndexMap<String, Projection<'a, T>>,
}

impl<'a, T> Transposed<'a, T> {
    /// The projection for `name`.
    pub fn get(&self, name: &str) -> Option<&Projection<'a, T>> {
        self.entries.get(name)
    }

    /// Selected names in requested order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Number of selected names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no names were selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(name, projection)` pairs in requested order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Projection<'a, T>)> + '_ {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// Collapse to the single projection, failing unless exactly one name
    /// was selected.
    pub fn into_single(self) -> Result<Projection<'a, T>, SelectError> {
        if self.entries.len() != 1 {
            return Err(SelectError::Ambiguous {
                names: self.entries.into_keys().collect(),
            });
        }
        self.entries
            .into_values()
            .next()
            .ok_or(SelectError::EmptySelection)
    }

    /// The underlying name → projection map.
    pub fn into_inner(self) -> IndexMap<String, Projection<'a, T>> {
        self.entries
    }
}

impl<'a, T> IntoIterator for Transposed<'a, T> {
    type Item = (String, Projection<'a, T>);
    type IntoIter = indexmap::map::IntoIter<String, Projection<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ── Selected ────────────────────────────────────────────────────

/// The result of a name selection, shaped by the request and the
/// container's [`ShapePolicy`].
#[derive(Clone, Debug, PartialEq)]
pub enum Selected<'a, T> {
    /// Exactly one name, unwrapped.
    Single {
        /// The selected name.
        name: String,
        /// Its values over time.
        values: Projection<'a, T>,
    },
    /// One projection per requested name.
    Array(Transposed<'a, T>),
}

impl<'a, T> Selected<'a, T> {
    /// The single projection, or `Ambiguous` if several names were selected.
    pub fn into_single(self) -> Result<Projection<'a, T>, SelectError> {
        match self {
            Self::Single { values, .. } => Ok(values),
            Self::Array(t) => t.into_single(),
        }
    }

    /// The name-major view, wrapping a single result as a one-entry map.
    pub fn into_array(self) -> Transposed<'a, T> {
        match self {
            Self::Single { name, values } => {
                let mut entries = IndexMap::with_capacity(1);
                entries.insert(name, values);
                Transposed { entries }
            }
            Self::Array(t) => t,
        }
    }
}

// ── CompositeSeries ─────────────────────────────────────────────

/// A time-ordered series of shared payloads with a name axis.
///
/// Payloads are held behind [`Arc`], so time projections and clones share
/// them with the original container.
#[derive(Debug, PartialEq)]
pub struct CompositeSeries<V> {
    series: SortedSeries<Time, Arc<V>>,
    policy: ShapePolicy,
}

impl<V> Clone for CompositeSeries<V> {
    fn clone(&self) -> Self {
        Self {
            series: self.series.clone(),
            policy: self.policy,
        }
    }
}

impl<V> CompositeSeries<V> {
    /// An empty container with the given result-shape policy.
    pub fn new(policy: ShapePolicy) -> Self {
        Self {
            series: SortedSeries::new(),
            policy,
        }
    }

    /// Wrap an existing series.
    pub fn from_series(series: SortedSeries<Time, Arc<V>>, policy: ShapePolicy) -> Self {
        Self { series, policy }
    }

    /// The result-shape policy.
    pub fn policy(&self) -> ShapePolicy {
        self.policy
    }

    /// The underlying time-ordered series.
    pub fn series(&self) -> &SortedSeries<Time, Arc<V>> {
        &self.series
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns `true` if no timesteps are held.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Held times in ascending order.
    pub fn times(&self) -> impl DoubleEndedIterator<Item = Time> + ExactSizeIterator + '_ {
        self.series.keys()
    }

    /// The payload stored at exactly `time`.
    pub fn get(&self, time: Time) -> Option<&V> {
        self.series.get(&time).map(Arc::as_ref)
    }

    /// `(time, payload)` pairs in ascending time order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Time, &V)> + ExactSizeIterator + '_ {
        self.series.iter().map(|(t, v)| (t, v.as_ref()))
    }

    /// Project onto a subset of timesteps.
    ///
    /// An exact time that is not held, or a range covering no held time,
    /// yields an empty container rather than an error.
    pub fn at(&self, selection: &TimeSelection) -> Self {
        let series = match selection {
            TimeSelection::All => self.series.clone(),
            TimeSelection::At(t) => SortedSeries::from_sorted(
                self.series.get(t).map(|v| (*t, Arc::clone(v))),
            ),
            TimeSelection::Range(r) => self.series.slice(r),
        };
        Self {
            series,
            policy: self.policy,
        }
    }

    /// Add a timestep's payload.
    pub fn append(&mut self, time: Time, value: Arc<V>, policy: OnDuplicate) -> Result<(), SeriesError> {
        self.series.append(time, value, policy)
    }

    /// Insert a timestep's payload at `position`.
    pub fn insert(&mut self, position: usize, time: Time, value: Arc<V>) -> Result<(), SeriesError> {
        self.series.insert(position, time, value)
    }

    /// Merge another container's timesteps into this one.
    pub fn extend(&mut self, other: CompositeSeries<V>, policy: OnDuplicate) -> Result<(), SeriesError> {
        self.series.extend(other.series, policy)
    }

    /// Remove the timestep at `time`.
    pub fn pop(&mut self, time: Time) -> Option<Arc<V>> {
        self.series.pop(&time)
    }

    /// Remove the latest timestep.
    pub fn pop_last(&mut self) -> Option<(Time, Arc<V>)> {
        self.series.pop_last()
    }
}

impl<V: Named> CompositeSeries<V> {
    /// One name's values across every held timestep.
    ///
    /// Fails with `UnknownName` at the first timestep lacking `name`.
    pub fn select_one(&self, name: &str) -> Result<Projection<'_, V::Item>, SelectError> {
        self.series.try_map_values(|time, payload| {
            payload.lookup(name).ok_or_else(|| SelectError::UnknownName {
                name: name.to_owned(),
                time,
            })
        })
    }

    /// Several names' values across every held timestep, in requested order.
    ///
    /// A name requested twice appears once.
    pub fn select_many<S: AsRef<str>>(&self, names: &[S]) -> Result<Transposed<'_, V::Item>, SelectError> {
        if names.is_empty() {
            return Err(SelectError::EmptySelection);
        }
        let mut entries = IndexMap::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if entries.contains_key(name) {
                continue;
            }
            entries.insert(name.to_owned(), self.select_one(name)?);
        }
        Ok(Transposed { entries })
    }

    /// Select on the name axis, dispatching on the request and the policy.
    pub fn select(&self, selection: &NameSelection) -> Result<Selected<'_, V::Item>, SelectError> {
        match (selection, self.policy) {
            (NameSelection::One(name), _) => Ok(Selected::Single {
                name: name.clone(),
                values: self.select_one(name)?,
            }),
            (NameSelection::Many(names), ShapePolicy::AsArray) => {
                Ok(Selected::Array(self.select_many(names)?))
            }
            (NameSelection::Many(names), ShapePolicy::AsSingle) => match names.as_slice() {
                [name] => Ok(Selected::Single {
                    name: name.clone(),
                    values: self.select_one(name)?,
                }),
                [] => Err(SelectError::EmptySelection),
                _ => Err(SelectError::Ambiguous {
                    names: names.clone(),
                }),
            },
        }
    }
}

impl<V> Ordered for CompositeSeries<V> {
    type Key = Time;

    fn keys_vec(&self) -> Vec<Time> {
        self.series.keys().collect()
    }

    fn len(&self) -> usize {
        self.series.len()
    }
}

impl<V> Sliceable for CompositeSeries<V> {
    fn slice_keys(&self, range: &KeyRange<Time>) -> Self {
        self.at(&TimeSelection::Range(*range))
    }
}

impl<V: Named> Composite for CompositeSeries<V> {
    type Payload = V;
    type Selection<'a>
        = Selected<'a, V::Item>
    where
        Self: 'a;

    fn at(&self, selection: &TimeSelection) -> Self {
        CompositeSeries::at(self, selection)
    }

    fn select(&self, selection: &NameSelection) -> Result<Selected<'_, V::Item>, SelectError> {
        CompositeSeries::select(self, selection)
    }
}
