//! Per-timestep scalars: time, step size, counters.

use amrio_core::{Named, ScalarValue, Time};
use indexmap::IndexMap;

/// Name → scalar for one timestep, in decoded order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScalarData {
    values: IndexMap<String, ScalarValue>,
}

impl ScalarData {
    /// Conventional name of the simulation time.
    pub const TIME: &'static str = "time";
    /// Conventional name of the time step size.
    pub const DT: &'static str = "dt";
    /// Conventional name of the step counter.
    pub const STEP: &'static str = "nstep";

    /// No scalars.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a scalar, returning the old value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Option<ScalarValue> {
        self.values.insert(name.into(), value.into())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// The scalar named `name`.
    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.values.get(name)
    }

    /// Simulation time, if recorded.
    pub fn time(&self) -> Option<Time> {
        self.get(Self::TIME).and_then(ScalarValue::as_f64).map(Time)
    }

    /// Time step size, if recorded.
    pub fn dt(&self) -> Option<f64> {
        self.get(Self::DT).and_then(ScalarValue::as_f64)
    }

    /// Step counter, if recorded.
    pub fn step(&self) -> Option<i64> {
        self.get(Self::STEP).and_then(ScalarValue::as_i64)
    }

    /// Number of scalars.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no scalars.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(name, value)` pairs in decoded order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalarValue)> + '_ {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<S: Into<String>> FromIterator<(S, ScalarValue)> for ScalarData {
    fn from_iter<I: IntoIterator<Item = (S, ScalarValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }
}

impl Named for ScalarData {
    type Item = ScalarValue;

    fn lookup(&self, name: &str) -> Option<&ScalarValue> {
        self.values.get(name)
    }

    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.values.keys().map(String::as_str))
    }
}
