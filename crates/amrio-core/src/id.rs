//! Strongly-typed identifiers: simulation [`Time`] keys and [`BlockId`]s.

use std::cmp::Ordering;
use std::fmt;

/// Simulation time, the sort key of every time-ordered container.
///
/// Wraps an `f64` and orders it with [`f64::total_cmp`], so `Time` is a
/// total order usable as a container key. Two times are equal only when
/// their bit patterns compare equal under that order (`0.0` and `-0.0`
/// are distinct keys).
#[derive(Clone, Copy, Debug)]
pub struct Time(pub f64);

impl Time {
    /// The raw floating-point value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Time {}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for Time {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

/// Identifies an AMR block within one timestep.
///
/// Ids are dense (`0..block_count`) once a geometry is constructed, so a
/// `BlockId` doubles as the block's row in every field array of the same
/// timestep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// The id as a `usize` index into per-block storage.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The id moved by `offset`, used when concatenating independently
    /// enumerated sources into one timestep.
    pub fn shifted(self, offset: u32) -> Self {
        Self(self.0 + offset)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BlockId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_orders_totally() {
        let mut times = vec![Time(3.0), Time(-1.0), Time(2.5), Time(0.0)];
        times.sort();
        let raw: Vec<f64> = times.iter().map(|t| t.value()).collect();
        assert_eq!(raw, vec![-1.0, 0.0, 2.5, 3.0]);
    }

    #[test]
    fn nan_time_sorts_after_finite_values() {
        let mut times = vec![Time(f64::NAN), Time(1.0)];
        times.sort();
        assert_eq!(times[0], Time(1.0));
        assert_eq!(times[1], Time(f64::NAN));
    }

    #[test]
    fn block_id_shift_and_index() {
        let id = BlockId(3);
        assert_eq!(id.shifted(10), BlockId(13));
        assert_eq!(id.index(), 3);
        assert_eq!(format!("{id}"), "3");
    }
}
