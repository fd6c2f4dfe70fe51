//! Capability traits for keyed containers and per-timestep payloads.
//!
//! Containers opt into each capability explicitly: [`Ordered`] and
//! [`Sliceable`] describe the time axis, [`Named`] the name axis of a single
//! timestep's payload, and [`Composite`] the two axes together.

use crate::error::SelectError;
use crate::selection::{NameSelection, TimeSelection};
use crate::series::KeyRange;

/// A container whose entries are kept in ascending key order.
pub trait Ordered {
    /// The sort key.
    type Key: Ord + Copy;

    /// All keys in ascending order.
    fn keys_vec(&self) -> Vec<Self::Key>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the container holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A container that can be narrowed to a half-open key range.
pub trait Sliceable: Ordered + Sized {
    /// A new container holding only the keys in `range`.
    fn slice_keys(&self, range: &KeyRange<Self::Key>) -> Self;
}

/// A per-timestep payload addressable by name.
///
/// Implemented by field, scalar and static payloads so a
/// [`CompositeSeries`](crate::CompositeSeries) can select across them.
pub trait Named {
    /// The value stored under each name.
    type Item;

    /// The value stored under `name`.
    fn lookup(&self, name: &str) -> Option<&Self::Item>;

    /// Every name, in the payload's own order.
    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Whether `name` is present.
    fn contains_name(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

/// A time-keyed container with a second, name-keyed selection axis.
pub trait Composite: Sized {
    /// Per-timestep payload type.
    type Payload: Named;

    /// The result of a name selection, borrowing from `self`.
    type Selection<'a>
    where
        Self: 'a;

    /// Project onto a subset of timesteps. Never copies payloads.
    fn at(&self, selection: &TimeSelection) -> Self;

    /// Project onto one or more names across every held timestep.
    fn select(&self, selection: &NameSelection) -> Result<Self::Selection<'_>, SelectError>;
}
