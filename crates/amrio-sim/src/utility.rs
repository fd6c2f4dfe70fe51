//! Approximate lookup of stored positions and times.
//!
//! Callers rarely know exact simulation times (`30.0` rather than
//! `30.003594`). A [`TimeLookup`] names timesteps by approximate time, by
//! position, or by ranges of either, and [`indices`] resolves it against
//! the stored keys:
//!
//! - `Time(t)`: the first stored time `>= t`.
//! - `Index(i)`: position `i` if it exists.
//! - `TimeRange`: from the first time `>= start` through the last time
//!   `<= stop`, both ends inclusive, every `step`-th.
//! - `IndexRange`: positions `[start, stop)` clamped to the stored length,
//!   every `step`-th.
//! - `Many`: the first match of each entry, in the given order.
//!
//! Lookups that match nothing produce an empty list. A step of zero is
//! treated as one.

use amrio_core::Time;

/// A request for stored timesteps by approximate time or by position.
#[derive(Clone, Debug, PartialEq)]
pub enum TimeLookup {
    /// The first timestep at or after this time.
    Time(f64),
    /// The timestep at this position.
    Index(usize),
    /// Timesteps between two approximate times, inclusive.
    ///
    /// A `stop` below every stored time selects nothing; it never widens
    /// to the end of the run.
    TimeRange {
        /// Lower bound, `None` for the first timestep.
        start: Option<f64>,
        /// Upper bound, `None` for the last timestep.
        stop: Option<f64>,
        /// Keep every `step`-th match.
        step: usize,
    },
    /// Timesteps in a half-open position range.
    IndexRange {
        /// First position, `None` for zero.
        start: Option<usize>,
        /// One past the last position, `None` for the end.
        stop: Option<usize>,
        /// Keep every `step`-th match.
        step: usize,
    },
    /// Several lookups, one result each.
    Many(Vec<TimeLookup>),
}

impl TimeLookup {
    /// Every stored timestep.
    pub fn all() -> Self {
        Self::IndexRange {
            start: None,
            stop: None,
            step: 1,
        }
    }

    /// Approximate times `start..=stop`.
    pub fn between(start: f64, stop: f64) -> Self {
        Self::TimeRange {
            start: Some(start),
            stop: Some(stop),
            step: 1,
        }
    }
}

impl Default for TimeLookup {
    fn default() -> Self {
        Self::all()
    }
}

impl From<f64> for TimeLookup {
    fn from(t: f64) -> Self {
        Self::Time(t)
    }
}

impl From<usize> for TimeLookup {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

/// Positions in `keys` matching `lookup`.
///
/// `keys` must be in ascending order.
pub fn indices(keys: &[Time], lookup: &TimeLookup) -> Vec<usize> {
    let len = keys.len();
    match *lookup {
        TimeLookup::Time(t) => first_at_or_after(keys, t).into_iter().collect(),
        TimeLookup::Index(i) => {
            if i < len {
                vec![i]
            } else {
                Vec::new()
            }
        }
        TimeLookup::TimeRange { start, stop, step } => {
            let lo = match start {
                None => 0,
                Some(t) => match first_at_or_after(keys, t) {
                    Some(i) => i,
                    None => return Vec::new(),
                },
            };
            let hi = match stop {
                None => len,
                Some(t) => keys.partition_point(|k| k.0 <= t),
            };
            (lo..hi.max(lo)).step_by(step.max(1)).collect()
        }
        TimeLookup::IndexRange { start, stop, step } => {
            let lo = start.unwrap_or(0);
            if lo >= len {
                return Vec::new();
            }
            let hi = stop.map_or(len, |s| s.min(len));
            (lo..hi.max(lo)).step_by(step.max(1)).collect()
        }
        TimeLookup::Many(ref lookups) => lookups
            .iter()
            .filter_map(|l| indices(keys, l).first().copied())
            .collect(),
    }
}

/// Stored times matching `lookup`.
pub fn times(keys: &[Time], lookup: &TimeLookup) -> Vec<Time> {
    indices(keys, lookup).into_iter().map(|i| keys[i]).collect()
}

fn first_at_or_after(keys: &[Time], t: f64) -> Option<usize> {
    let i = keys.partition_point(|k| k.0 < t);
    (i < keys.len()).then_some(i)
}
