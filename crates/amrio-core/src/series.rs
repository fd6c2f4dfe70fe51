//! The time-ordered keyed container, [`SortedSeries`].
//!
//! A `SortedSeries` behaves like a map (lookup by key) and like a list
//! (positional access, insert, pop) at once, and is always materialized
//! in ascending key order. Range queries are expressed as a [`KeyRange`]
//! over keys, never as index strides.

use std::num::NonZeroUsize;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::SeriesError;
use crate::traits::{Ordered, Sliceable};

/// What to do when a merge or append meets a key that is already present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OnDuplicate {
    /// Fail with [`SeriesError::DuplicateKey`] and leave the container untouched.
    #[default]
    Reject,
    /// Replace the stored value with the incoming one.
    Overwrite,
}

/// A half-open key interval `[start, stop)` with a key-count step.
///
/// `None` on either end means unbounded. `step` keeps every n-th key that
/// falls inside the interval, counted from the first key in range.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
/// use amrio_core::{KeyRange, SortedSeries};
///
/// let series = SortedSeries::from_sorted((0..10).map(|k| (k, k * 10)));
/// let range = KeyRange::from(2..8).every(NonZeroUsize::new(2).unwrap());
/// let sliced = series.slice(&range);
/// assert_eq!(sliced.keys().collect::<Vec<_>>(), vec![2, 4, 6]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyRange<K> {
    /// Inclusive lower bound, or unbounded.
    pub start: Option<K>,
    /// Exclusive upper bound, or unbounded.
    pub stop: Option<K>,
    /// Keep every `step`-th key in range.
    pub step: NonZeroUsize,
}

impl<K> KeyRange<K> {
    /// A range with the given bounds and a step of one.
    pub fn new(start: Option<K>, stop: Option<K>) -> Self {
        Self {
            start,
            stop,
            step: NonZeroUsize::MIN,
        }
    }

    /// The unbounded range.
    pub fn full() -> Self {
        Self::new(None, None)
    }

    /// Replace the step.
    pub fn every(mut self, step: NonZeroUsize) -> Self {
        self.step = step;
        self
    }
}

impl<K: Ord> KeyRange<K> {
    /// Whether `key` falls inside `[start, stop)`, ignoring the step.
    pub fn contains(&self, key: &K) -> bool {
        self.start.as_ref().is_none_or(|s| key >= s) && self.stop.as_ref().is_none_or(|s| key < s)
    }
}

impl<K> From<Range<K>> for KeyRange<K> {
    fn from(r: Range<K>) -> Self {
        Self::new(Some(r.start), Some(r.end))
    }
}

impl<K> From<RangeFrom<K>> for KeyRange<K> {
    fn from(r: RangeFrom<K>) -> Self {
        Self::new(Some(r.start), None)
    }
}

impl<K> From<RangeTo<K>> for KeyRange<K> {
    fn from(r: RangeTo<K>) -> Self {
        Self::new(None, Some(r.end))
    }
}

impl<K> From<RangeFull> for KeyRange<K> {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}

/// An ordered associative container keyed by a sortable scalar.
///
/// Entries are stored as `(key, value)` pairs in strictly ascending key
/// order; lookups are binary searches. Cloning is as deep as cloning `V`:
/// simulation containers store shared handles (`Arc<_>`) or borrowed
/// references, so their clones and slices never duplicate payloads.
///
/// Views returned by [`keys`](Self::keys), [`values`](Self::values) and
/// [`iter`](Self::iter) borrow the container, so a mutation cannot happen
/// while one of them is alive.
#[derive(Clone, Debug, PartialEq)]
pub struct SortedSeries<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for SortedSeries<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Ord + Copy, V> SortedSeries<K, V> {
    /// An empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty series with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Build from entries the caller attests are already in strictly
    /// ascending key order.
    ///
    /// The order is not checked. Feeding unsorted or duplicated keys
    /// produces a series whose lookups and merges are unspecified.
    pub fn from_sorted<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }

    /// Build from entries in any order, sorting by key.
    ///
    /// Fails with [`SeriesError::DuplicateKey`] if two entries share a key.
    pub fn try_from_unsorted<I: IntoIterator<Item = (K, V)>>(
        iter: I,
    ) -> Result<Self, SeriesError<K>> {
        let mut entries: Vec<(K, V)> = iter.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(pair) = entries.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(SeriesError::DuplicateKey { key: pair[0].0 });
        }
        Ok(Self { entries })
    }

    fn search(&self, key: &K) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.cmp(key))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the series holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Position of `key`, if present.
    pub fn position(&self, key: &K) -> Option<usize> {
        self.search(key).ok()
    }

    /// Position of the first key `>= key`, or `None` if every key is smaller.
    pub fn position_at_or_after(&self, key: &K) -> Option<usize> {
        let i = self.entries.partition_point(|(k, _)| k < key);
        (i < self.entries.len()).then_some(i)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.search(key).ok().map(|i| &self.entries[i].1)
    }

    /// The value stored under `key`, or `default` if absent.
    pub fn get_or<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// The entry at `index` in key order.
    pub fn get_index(&self, index: usize) -> Option<(K, &V)> {
        self.entries.get(index).map(|(k, v)| (*k, v))
    }

    /// The entry with the smallest key.
    pub fn first(&self) -> Option<(K, &V)> {
        self.get_index(0)
    }

    /// The entry with the largest key.
    pub fn last(&self) -> Option<(K, &V)> {
        self.entries.last().map(|(k, v)| (*k, v))
    }

    /// Add an entry, keeping key order.
    ///
    /// Appending past the current last key is O(1); a smaller key lands at
    /// its sorted position. An existing key is replaced under
    /// [`OnDuplicate::Overwrite`] and rejected otherwise.
    pub fn append(&mut self, key: K, value: V, policy: OnDuplicate) -> Result<(), SeriesError<K>> {
        if self.entries.last().is_none_or(|(last, _)| *last < key) {
            self.entries.push((key, value));
            return Ok(());
        }
        match self.search(&key) {
            Ok(i) => match policy {
                OnDuplicate::Reject => Err(SeriesError::DuplicateKey { key }),
                OnDuplicate::Overwrite => {
                    self.entries[i].1 = value;
                    Ok(())
                }
            },
            Err(i) => {
                self.entries.insert(i, (key, value));
                Ok(())
            }
        }
    }

    /// Insert an entry at `position`, list style.
    ///
    /// The key must be new and must sit strictly between the keys around
    /// `position`, so the series stays sorted.
    pub fn insert(&mut self, position: usize, key: K, value: V) -> Result<(), SeriesError<K>> {
        let len = self.entries.len();
        if position > len {
            return Err(SeriesError::PositionOutOfRange { position, len });
        }
        if self.contains_key(&key) {
            return Err(SeriesError::DuplicateKey { key });
        }
        let after_prev = position == 0 || self.entries[position - 1].0 < key;
        let before_next = position == len || key < self.entries[position].0;
        if !(after_prev && before_next) {
            return Err(SeriesError::Misplaced { position, key });
        }
        self.entries.insert(position, (key, value));
        Ok(())
    }

    /// Merge every entry of `other` into this series.
    ///
    /// Under [`OnDuplicate::Reject`] the first colliding key fails the whole
    /// merge before anything is moved. Under `Overwrite` entries from
    /// `other` win.
    pub fn extend(&mut self, other: SortedSeries<K, V>, policy: OnDuplicate) -> Result<(), SeriesError<K>> {
        if policy == OnDuplicate::Reject {
            if let Some((key, _)) = other.entries.iter().find(|(k, _)| self.contains_key(k)) {
                return Err(SeriesError::DuplicateKey { key: *key });
            }
        }
        let mut merged = Vec::with_capacity(self.entries.len() + other.entries.len());
        let mut left = std::mem::take(&mut self.entries).into_iter().peekable();
        let mut right = other.entries.into_iter().peekable();
        loop {
            let take_left = match (left.peek(), right.peek()) {
                (Some(l), Some(r)) => {
                    if l.0 == r.0 {
                        // Overwrite: drop ours, keep theirs.
                        left.next();
                        continue;
                    }
                    l.0 < r.0
                }
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_left { left.next() } else { right.next() };
            merged.extend(next);
        }
        self.entries = merged;
        Ok(())
    }

    /// Remove and return the value stored under `key`.
    pub fn pop(&mut self, key: &K) -> Option<V> {
        let i = self.search(key).ok()?;
        Some(self.entries.remove(i).1)
    }

    /// Remove and return the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.entries.pop()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = K> + ExactSizeIterator + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Values in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    /// `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (K, &V)> + ExactSizeIterator + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Project every value through `f`, keeping keys and order.
    pub fn map_values<'s, W, F>(&'s self, mut f: F) -> SortedSeries<K, W>
    where
        F: FnMut(K, &'s V) -> W,
    {
        SortedSeries::from_sorted(self.entries.iter().map(|(k, v)| (*k, f(*k, v))))
    }

    /// Fallible [`map_values`](Self::map_values); stops at the first error.
    ///
    /// `f` may return borrows of the series' values.
    pub fn try_map_values<'s, W, E, F>(&'s self, mut f: F) -> Result<SortedSeries<K, W>, E>
    where
        F: FnMut(K, &'s V) -> Result<W, E>,
    {
        let mut entries = Vec::with_capacity(self.entries.len());
        for (k, v) in &self.entries {
            entries.push((*k, f(*k, v)?));
        }
        Ok(SortedSeries { entries })
    }
}

impl<K: Ord + Copy, V: Clone> SortedSeries<K, V> {
    /// A new series holding the entries whose keys fall in `range`.
    ///
    /// The interval is half-open: a key equal to `range.stop` is excluded.
    pub fn slice(&self, range: &KeyRange<K>) -> Self {
        let lo = range
            .start
            .map_or(0, |s| self.entries.partition_point(|(k, _)| *k < s));
        let hi = range
            .stop
            .map_or(self.entries.len(), |s| self.entries.partition_point(|(k, _)| *k < s));
        if lo >= hi {
            return Self::default();
        }
        Self {
            entries: self.entries[lo..hi]
                .iter()
                .step_by(range.step.get())
                .cloned()
                .collect(),
        }
    }
}

impl<K, V> IntoIterator for SortedSeries<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K: Copy, V> IntoIterator for &'a SortedSeries<K, V> {
    type Item = (K, &'a V);
    type IntoIter = std::iter::Map<std::slice::Iter<'a, (K, V)>, fn(&'a (K, V)) -> (K, &'a V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

impl<K: Ord + Copy, V> Ordered for SortedSeries<K, V> {
    type Key = K;

    fn keys_vec(&self) -> Vec<K> {
        self.keys().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: Ord + Copy, V: Clone> Sliceable for SortedSeries<K, V> {
    fn slice_keys(&self, range: &KeyRange<K>) -> Self {
        self.slice(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Time;
    use proptest::prelude::*;

    fn series(keys: &[f64]) -> SortedSeries<Time, String> {
        SortedSeries::try_from_unsorted(keys.iter().map(|&k| (Time(k), format!("v{k}")))).unwrap()
    }

    fn key_vec(s: &SortedSeries<Time, String>) -> Vec<f64> {
        s.keys().map(|k| k.value()).collect()
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let s = series(&[3.0, 1.0, 2.0]);
        assert_eq!(key_vec(&s), vec![1.0, 2.0, 3.0]);
        assert_eq!(s.get(&Time(2.0)).map(String::as_str), Some("v2"));
    }

    #[test]
    fn unsorted_input_with_duplicates_is_rejected() {
        let err = SortedSeries::try_from_unsorted(vec![(Time(1.0), 'a'), (Time(1.0), 'b')]).unwrap_err();
        assert_eq!(err, SeriesError::DuplicateKey { key: Time(1.0) });
    }

    #[test]
    fn append_rejects_duplicate_by_default() {
        let mut s = series(&[1.0, 2.0]);
        let err = s.append(Time(2.0), "x".into(), OnDuplicate::Reject).unwrap_err();
        assert_eq!(err, SeriesError::DuplicateKey { key: Time(2.0) });
        assert_eq!(s.get(&Time(2.0)).map(String::as_str), Some("v2"));
    }

    #[test]
    fn append_overwrite_replaces_in_place() {
        let mut s = series(&[1.0, 2.0]);
        s.append(Time(1.0), "x".into(), OnDuplicate::Overwrite).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.get(&Time(1.0)).map(String::as_str), Some("x"));
    }

    #[test]
    fn append_out_of_order_lands_sorted() {
        let mut s = series(&[1.0, 3.0]);
        s.append(Time(2.0), "v2".into(), OnDuplicate::Reject).unwrap();
        assert_eq!(key_vec(&s), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn insert_checks_position_and_order() {
        let mut s = series(&[1.0, 3.0]);
        s.insert(1, Time(2.0), "v2".into()).unwrap();
        assert_eq!(key_vec(&s), vec![1.0, 2.0, 3.0]);

        let err = s.insert(0, Time(5.0), "v5".into()).unwrap_err();
        assert_eq!(err, SeriesError::Misplaced { position: 0, key: Time(5.0) });

        let err = s.insert(9, Time(5.0), "v5".into()).unwrap_err();
        assert_eq!(err, SeriesError::PositionOutOfRange { position: 9, len: 3 });

        let err = s.insert(3, Time(3.0), "again".into()).unwrap_err();
        assert_eq!(err, SeriesError::DuplicateKey { key: Time(3.0) });

        s.insert(3, Time(4.0), "v4".into()).unwrap();
        assert_eq!(key_vec(&s), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn extend_rejects_collision_without_mutating() {
        let mut s = series(&[1.0, 2.0]);
        let err = s.extend(series(&[0.5, 2.0]), OnDuplicate::Reject).unwrap_err();
        assert_eq!(err, SeriesError::DuplicateKey { key: Time(2.0) });
        assert_eq!(key_vec(&s), vec![1.0, 2.0]);
    }

    #[test]
    fn extend_merges_in_order_and_overwrites() {
        let mut s = series(&[1.0, 3.0]);
        let mut other = series(&[0.0, 2.0, 3.0]);
        other.append(Time(3.0), "new".into(), OnDuplicate::Overwrite).unwrap();
        s.extend(other, OnDuplicate::Overwrite).unwrap();
        assert_eq!(key_vec(&s), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(s.get(&Time(3.0)).map(String::as_str), Some("new"));
    }

    #[test]
    fn pop_and_pop_last() {
        let mut s = series(&[1.0, 2.0, 3.0]);
        assert_eq!(s.pop(&Time(2.0)).as_deref(), Some("v2"));
        assert_eq!(s.pop(&Time(2.0)), None);
        assert_eq!(s.pop_last().map(|(k, _)| k), Some(Time(3.0)));
        assert_eq!(key_vec(&s), vec![1.0]);
    }

    #[test]
    fn get_or_falls_back() {
        let s = series(&[1.0]);
        let fallback = "none".to_string();
        assert_eq!(s.get_or(&Time(9.0), &fallback), "none");
        assert_eq!(s.get_or(&Time(1.0), &fallback), "v1");
    }

    #[test]
    fn slice_is_half_open() {
        let s = series(&[1.0, 2.0, 3.0]);
        let sliced = s.slice(&KeyRange::from(Time(2.0)..Time(3.0)));
        assert_eq!(key_vec(&sliced), vec![2.0]);
    }

    #[test]
    fn slice_between_keys_and_outside_range() {
        let s = series(&[1.0, 2.0, 3.0]);
        assert_eq!(key_vec(&s.slice(&KeyRange::from(Time(1.5)..Time(2.5)))), vec![2.0]);
        assert!(s.slice(&KeyRange::from(Time(10.0)..Time(20.0))).is_empty());
        assert!(s.slice(&KeyRange::from(Time(3.0)..Time(1.0))).is_empty());
        assert_eq!(key_vec(&s.slice(&KeyRange::from(..Time(2.0)))), vec![1.0]);
        assert_eq!(key_vec(&s.slice(&KeyRange::from(Time(2.0)..))), vec![2.0, 3.0]);
        assert_eq!(s.slice(&KeyRange::from(..)), s);
    }

    #[test]
    fn slice_step_counts_keys_not_values() {
        let s = series(&[1.0, 1.5, 2.0, 7.0, 9.0]);
        let range = KeyRange::from(Time(1.5)..).every(NonZeroUsize::new(2).unwrap());
        assert_eq!(key_vec(&s.slice(&range)), vec![1.5, 7.0]);
    }

    #[test]
    fn position_at_or_after_finds_next_key() {
        let s = series(&[1.0, 2.0, 3.0]);
        assert_eq!(s.position_at_or_after(&Time(1.5)), Some(1));
        assert_eq!(s.position_at_or_after(&Time(2.0)), Some(1));
        assert_eq!(s.position_at_or_after(&Time(3.5)), None);
    }

    #[test]
    fn from_sorted_keeps_given_order() {
        let s = SortedSeries::from_sorted(vec![(1, 'a'), (2, 'b')]);
        assert_eq!(s.first(), Some((1, &'a')));
        assert_eq!(s.last(), Some((2, &'b')));
    }

    #[test]
    fn try_map_values_can_borrow_from_the_series() {
        let s = series(&[1.0, 2.0]);
        let borrowed: SortedSeries<Time, &str> = s
            .try_map_values(|_, v| Ok::<_, ()>(v.as_str()))
            .unwrap();
        assert_eq!(borrowed.get(&Time(2.0)), Some(&"v2"));

        let lengths = s.map_values(|_, v| v.len());
        assert_eq!(lengths.values().copied().collect::<Vec<_>>(), vec![2, 2]);

        let err = s
            .try_map_values(|k, v| if k == Time(2.0) { Err(k) } else { Ok(v) })
            .unwrap_err();
        assert_eq!(err, Time(2.0));
    }

    proptest! {
        #[test]
        fn appended_keys_stay_sorted_and_unique(keys in prop::collection::vec(-50i64..50, 0..64)) {
            let mut s = SortedSeries::new();
            for k in &keys {
                let _ = s.append(*k, *k * 2, OnDuplicate::Reject);
            }
            let got: Vec<i64> = s.keys().collect();
            let mut expected = keys.clone();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn merging_halves_matches_whole(keys in prop::collection::btree_set(-100i64..100, 0..64), split in 0usize..64) {
            let keys: Vec<i64> = keys.into_iter().collect();
            let split = split.min(keys.len());
            let whole = SortedSeries::from_sorted(keys.iter().map(|&k| (k, k)));
            let mut first = SortedSeries::from_sorted(keys[..split].iter().map(|&k| (k, k)));
            let second = SortedSeries::from_sorted(keys[split..].iter().map(|&k| (k, k)));
            first.extend(second, OnDuplicate::Reject).unwrap();
            prop_assert_eq!(first, whole);
        }

        #[test]
        fn slice_matches_filter(
            keys in prop::collection::btree_set(-100i64..100, 0..64),
            lo in -120i64..120,
            hi in -120i64..120,
        ) {
            let s = SortedSeries::from_sorted(keys.iter().map(|&k| (k, ())));
            let got: Vec<i64> = s.slice(&KeyRange::from(lo..hi)).keys().collect();
            let expected: Vec<i64> = keys.iter().copied().filter(|k| *k >= lo && *k < hi).collect();
            prop_assert_eq!(got, expected);
        }
    }
}
