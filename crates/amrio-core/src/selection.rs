//! Typed selection requests for the time and name axes.
//!
//! A query names its intent explicitly instead of being inferred from the
//! argument's runtime shape: one name or many, one time or a range.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::id::Time;
use crate::series::KeyRange;

/// Selection along the time axis.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum TimeSelection {
    /// Every held timestep.
    #[default]
    All,
    /// The timestep stored under exactly this time, if any.
    At(Time),
    /// Timesteps in a half-open time range.
    Range(KeyRange<Time>),
}

impl From<Time> for TimeSelection {
    fn from(t: Time) -> Self {
        Self::At(t)
    }
}

impl From<f64> for TimeSelection {
    fn from(t: f64) -> Self {
        Self::At(Time(t))
    }
}

impl From<KeyRange<Time>> for TimeSelection {
    fn from(r: KeyRange<Time>) -> Self {
        Self::Range(r)
    }
}

impl From<Range<f64>> for TimeSelection {
    fn from(r: Range<f64>) -> Self {
        Self::Range(KeyRange::from(Time(r.start)..Time(r.end)))
    }
}

impl From<RangeFrom<f64>> for TimeSelection {
    fn from(r: RangeFrom<f64>) -> Self {
        Self::Range(KeyRange::from(Time(r.start)..))
    }
}

impl From<RangeTo<f64>> for TimeSelection {
    fn from(r: RangeTo<f64>) -> Self {
        Self::Range(KeyRange::from(..Time(r.end)))
    }
}

impl From<RangeFull> for TimeSelection {
    fn from(_: RangeFull) -> Self {
        Self::All
    }
}

/// Selection along the name axis.
///
/// `One` always collapses to a single result. `Many` keeps one result per
/// name unless the container's [`ShapePolicy`] is [`ShapePolicy::AsSingle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameSelection {
    /// Exactly one name.
    One(String),
    /// A list of names, in requested order.
    Many(Vec<String>),
}

impl NameSelection {
    /// The requested names in order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::One(n) => vec![n.as_str()],
            Self::Many(ns) => ns.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for NameSelection {
    fn from(name: &str) -> Self {
        Self::One(name.to_owned())
    }
}

impl From<String> for NameSelection {
    fn from(name: String) -> Self {
        Self::One(name)
    }
}

impl<const N: usize> From<[&str; N]> for NameSelection {
    fn from(names: [&str; N]) -> Self {
        Self::Many(names.iter().map(|n| (*n).to_owned()).collect())
    }
}

impl From<&[&str]> for NameSelection {
    fn from(names: &[&str]) -> Self {
        Self::Many(names.iter().map(|n| (*n).to_owned()).collect())
    }
}

impl From<Vec<String>> for NameSelection {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

impl From<Vec<&str>> for NameSelection {
    fn from(names: Vec<&str>) -> Self {
        Self::Many(names.into_iter().map(str::to_owned).collect())
    }
}

/// Result-shape strategy held by a [`CompositeSeries`](crate::CompositeSeries).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShapePolicy {
    /// Multi-name selections return one projection per name.
    #[default]
    AsArray,
    /// Every selection must resolve to exactly one name.
    AsSingle,
}
