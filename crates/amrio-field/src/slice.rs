//! The spatial indexing axis.
//!
//! A [`SpatialSlice`] is a list of per-axis selections applied to an array
//! view, left to right:
//!
//! - `Index(i)` picks one position and drops the axis; negative `i` counts
//!   from the end.
//! - `Range { start, stop, step }` keeps `[start, stop)` with out-of-range
//!   bounds clamped to the axis. Negative bounds count from the end. With a
//!   negative step `start` is the high end and `stop` the exclusive low
//!   end, so `4..1` by `-1` yields positions 4, 3, 2.
//! - `Full` keeps the axis.
//! - `Ellipsis` stands for as many `Full` axes as needed; at most one.
//!
//! Axes not covered by the slice are kept whole.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use amrio_core::{Projection, SelectError, SliceError, SortedSeries, Time, Transposed};
use indexmap::IndexMap;
use ndarray::{ArrayD, ArrayViewD, Axis, Slice};
use smallvec::SmallVec;

use crate::array::FieldArray;

/// Selection along one array axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisSlice {
    /// One position; the axis is removed.
    Index(isize),
    /// A half-open range with a non-zero step.
    Range {
        /// First position, `None` for the start.
        start: Option<isize>,
        /// One past the last position, `None` for the end.
        stop: Option<isize>,
        /// Stride; negative walks backwards.
        step: isize,
    },
    /// The whole axis.
    Full,
    /// Whole axes until the remaining entries line up with the last axes.
    Ellipsis,
}

impl AxisSlice {
    /// `[start, stop)` with step one.
    pub fn range(start: isize, stop: isize) -> Self {
        Self::Range {
            start: Some(start),
            stop: Some(stop),
            step: 1,
        }
    }

    /// Every `step`-th position of the whole axis.
    pub fn every(step: isize) -> Self {
        Self::Range {
            start: None,
            stop: None,
            step,
        }
    }
}

impl From<isize> for AxisSlice {
    fn from(i: isize) -> Self {
        Self::Index(i)
    }
}

impl From<Range<isize>> for AxisSlice {
    fn from(r: Range<isize>) -> Self {
        Self::range(r.start, r.end)
    }
}

impl From<RangeFrom<isize>> for AxisSlice {
    fn from(r: RangeFrom<isize>) -> Self {
        Self::Range {
            start: Some(r.start),
            stop: None,
            step: 1,
        }
    }
}

impl From<RangeTo<isize>> for AxisSlice {
    fn from(r: RangeTo<isize>) -> Self {
        Self::Range {
            start: None,
            stop: Some(r.end),
            step: 1,
        }
    }
}

impl From<RangeFull> for AxisSlice {
    fn from(_: RangeFull) -> Self {
        Self::Full
    }
}

/// A multi-axis selection applied to `(block, z, y, x)` arrays.
///
/// The empty slice selects everything.
///
/// # Examples
///
/// ```
/// use amrio_field::{AxisSlice, SpatialSlice};
/// use ndarray::Array4;
///
/// let a = Array4::<f64>::zeros((3, 1, 6, 6));
/// // block 2, every z, interior rows, last column
/// let s = SpatialSlice::from([AxisSlice::Index(2), AxisSlice::Full, AxisSlice::range(1, 5), AxisSlice::Index(-1)]);
/// let v = s.apply(a.view().into_dyn()).unwrap();
/// assert_eq!(v.shape(), &[1, 4]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpatialSlice {
    axes: SmallVec<[AxisSlice; 4]>,
}

impl SpatialSlice {
    /// Select everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Append one axis selection.
    pub fn then(mut self, axis: impl Into<AxisSlice>) -> Self {
        self.axes.push(axis.into());
        self
    }

    /// The per-axis selections.
    pub fn axes(&self) -> &[AxisSlice] {
        &self.axes
    }

    /// Apply to a view, returning a narrower view of the same data.
    pub fn apply<'a>(&self, view: ArrayViewD<'a, f64>) -> Result<ArrayViewD<'a, f64>, SliceError> {
        let ndim = view.ndim();
        let ellipses = self.axes.iter().filter(|a| **a == AxisSlice::Ellipsis).count();
        if ellipses > 1 {
            return Err(SliceError::MultipleEllipsis);
        }
        let explicit = self.axes.len() - ellipses;
        if explicit > ndim {
            return Err(SliceError::TooManyAxes {
                requested: explicit,
                ndim,
            });
        }

        let mut view = view;
        // position in the current (shrinking) view, and in the source array
        let mut current = 0;
        let mut source = 0;
        for item in &self.axes {
            match *item {
                AxisSlice::Ellipsis => {
                    let skip = ndim - explicit;
                    current += skip;
                    source += skip;
                }
                AxisSlice::Full => {
                    current += 1;
                    source += 1;
                }
                AxisSlice::Index(index) => {
                    let len = view.len_of(Axis(current));
                    let resolved = if index < 0 { index + len as isize } else { index };
                    if resolved < 0 || resolved >= len as isize {
                        return Err(SliceError::IndexOutOfBounds {
                            axis: source,
                            index,
                            len,
                        });
                    }
                    view = view.index_axis_move(Axis(current), resolved as usize);
                    source += 1;
                }
                AxisSlice::Range { start, stop, step } => {
                    if step == 0 {
                        return Err(SliceError::ZeroStep { axis: source });
                    }
                    let len = view.len_of(Axis(current)) as isize;
                    view.slice_axis_inplace(Axis(current), range_slice(start, stop, step, len));
                    current += 1;
                    source += 1;
                }
            }
        }
        Ok(view)
    }
}

/// Resolve `start:stop:step` on an axis of `len` into an ndarray [`Slice`].
///
/// A positive step keeps `[start, stop)`. A negative step starts at `start`
/// (default: the last position) and walks down to just above `stop`
/// (default: past the first position). ndarray walks a negative-step slice
/// from the top of its range, so the descending walk becomes
/// `[stop + 1, start + 1)`.
fn range_slice(start: Option<isize>, stop: Option<isize>, step: isize, len: isize) -> Slice {
    let resolve = |i: isize| if i < 0 { i + len } else { i };
    if step > 0 {
        let lo = start.map_or(0, |i| resolve(i).clamp(0, len));
        let hi = stop.map_or(len, |i| resolve(i).clamp(0, len)).max(lo);
        Slice::new(lo, Some(hi), step)
    } else {
        let top = start.map_or(len - 1, |i| resolve(i).clamp(-1, len - 1));
        let bottom = stop.map_or(-1, |i| resolve(i).clamp(-1, len - 1));
        let lo = bottom + 1;
        let hi = (top + 1).max(lo);
        Slice::new(lo, Some(hi), step)
    }
}

impl<const N: usize> From<[AxisSlice; N]> for SpatialSlice {
    fn from(axes: [AxisSlice; N]) -> Self {
        Self {
            axes: axes.into_iter().collect(),
        }
    }
}

impl From<Vec<AxisSlice>> for SpatialSlice {
    fn from(axes: Vec<AxisSlice>) -> Self {
        Self {
            axes: SmallVec::from_vec(axes),
        }
    }
}

fn stack_views(views: &SortedSeries<Time, ArrayViewD<'_, f64>>) -> Result<ArrayD<f64>, SelectError> {
    let parts: Vec<ArrayViewD<'_, f64>> = views.values().map(|v| v.view()).collect();
    if parts.is_empty() {
        return Err(SelectError::Stack {
            reason: "no timesteps selected".to_owned(),
        });
    }
    ndarray::stack(Axis(0), &parts).map_err(|e| SelectError::Stack {
        reason: e.to_string(),
    })
}

/// The spatial axis over name-selected field projections.
pub trait SliceFields<'a> {
    /// Per-time views.
    type Views;
    /// Views joined along a new leading time axis.
    type Stacked;

    /// Slice the padded arrays, guard cells included.
    fn slice_cells(&self, slice: &SpatialSlice) -> Result<Self::Views, SelectError>;

    /// Slice the interior arrays, guard cells excluded.
    fn slice_interior(&self, slice: &SpatialSlice) -> Result<Self::Views, SelectError>;

    /// Slice the padded arrays and stack the results over time.
    ///
    /// Fails if the selection is empty or the per-time shapes differ.
    fn stack(&self, slice: &SpatialSlice) -> Result<Self::Stacked, SelectError>;
}

fn slice_projection<'a>(
    projection: &Projection<'a, FieldArray>,
    slice: &SpatialSlice,
    interior: bool,
) -> Result<SortedSeries<Time, ArrayViewD<'a, f64>>, SelectError> {
    projection.try_map_values(|_, field| {
        let field: &'a FieldArray = *field;
        let view = if interior {
            field.interior()
        } else {
            field.padded()
        };
        slice.apply(view.into_dyn()).map_err(SelectError::from)
    })
}

impl<'a> SliceFields<'a> for Projection<'a, FieldArray> {
    type Views = SortedSeries<Time, ArrayViewD<'a, f64>>;
    type Stacked = ArrayD<f64>;

    fn slice_cells(&self, slice: &SpatialSlice) -> Result<Self::Views, SelectError> {
        slice_projection(self, slice, false)
    }

    fn slice_interior(&self, slice: &SpatialSlice) -> Result<Self::Views, SelectError> {
        slice_projection(self, slice, true)
    }

    fn stack(&self, slice: &SpatialSlice) -> Result<ArrayD<f64>, SelectError> {
        stack_views(&self.slice_cells(slice)?)
    }
}

impl<'a> SliceFields<'a> for Transposed<'a, FieldArray> {
    type Views = IndexMap<String, SortedSeries<Time, ArrayViewD<'a, f64>>>;
    type Stacked = IndexMap<String, ArrayD<f64>>;

    fn slice_cells(&self, slice: &SpatialSlice) -> Result<Self::Views, SelectError> {
        self.iter()
            .map(|(name, p)| Ok((name.to_owned(), slice_projection(p, slice, false)?)))
            .collect()
    }

    fn slice_interior(&self, slice: &SpatialSlice) -> Result<Self::Views, SelectError> {
        self.iter()
            .map(|(name, p)| Ok((name.to_owned(), slice_projection(p, slice, true)?)))
            .collect()
    }

    fn stack(&self, slice: &SpatialSlice) -> Result<Self::Stacked, SelectError> {
        self.iter()
            .map(|(name, p)| Ok((name.to_owned(), p.stack(slice)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, Array4, IxDyn};

    fn array() -> Array4<f64> {
        Array::from_shape_fn((2, 1, 3, 4), |(b, _, y, x)| (b * 100 + y * 10 + x) as f64)
    }

    fn apply(s: SpatialSlice) -> Result<ArrayD<f64>, SliceError> {
        let a = array();
        s.apply(a.view().into_dyn()).map(|v| v.to_owned())
    }

    #[test]
    fn empty_slice_selects_everything() {
        assert_eq!(apply(SpatialSlice::all()).unwrap(), array().into_dyn());
    }

    #[test]
    fn index_drops_axis_and_supports_negatives() {
        let v = apply(SpatialSlice::from([AxisSlice::Index(-1)])).unwrap();
        assert_eq!(v.shape(), &[1, 3, 4]);
        assert_eq!(v[IxDyn(&[0, 2, 3])], 123.0);
    }

    #[test]
    fn ellipsis_expands_to_full_axes() {
        let v = apply(SpatialSlice::from([AxisSlice::Ellipsis, AxisSlice::Index(1)])).unwrap();
        assert_eq!(v.shape(), &[2, 1, 3]);
        assert_eq!(v[IxDyn(&[1, 0, 2])], 121.0);
        let w = apply(SpatialSlice::from([AxisSlice::Index(0), AxisSlice::Ellipsis, AxisSlice::Index(0)])).unwrap();
        assert_eq!(w.shape(), &[1, 3]);
    }

    #[test]
    fn ranges_clamp_and_step() {
        let s = SpatialSlice::all()
            .then(..)
            .then(..)
            .then(AxisSlice::range(-2, 99))
            .then(AxisSlice::every(2));
        let v = apply(s).unwrap();
        assert_eq!(v.shape(), &[2, 1, 2, 2]);
        assert_eq!(v[IxDyn(&[0, 0, 0, 1])], 12.0);

        let empty = apply(SpatialSlice::from([AxisSlice::range(5, 9)])).unwrap();
        assert_eq!(empty.shape(), &[0, 1, 3, 4]);
    }

    #[test]
    fn negative_step_reverses() {
        let s = SpatialSlice::from([AxisSlice::Ellipsis, AxisSlice::every(-1)]);
        let v = apply(s).unwrap();
        assert_eq!(v[IxDyn(&[0, 0, 0, 0])], 3.0);
        assert_eq!(v[IxDyn(&[0, 0, 0, 3])], 0.0);
    }

    fn row(s: AxisSlice) -> Vec<f64> {
        let a = ndarray::Array1::from_iter((0..6).map(f64::from)).into_dyn();
        SpatialSlice::from([s]).apply(a.view()).unwrap().iter().copied().collect()
    }

    fn stepped(start: Option<isize>, stop: Option<isize>, step: isize) -> AxisSlice {
        AxisSlice::Range { start, stop, step }
    }

    #[test]
    fn negative_step_starts_at_the_high_bound() {
        assert_eq!(row(stepped(Some(4), Some(1), -1)), vec![4.0, 3.0, 2.0]);
        assert_eq!(row(stepped(Some(1), Some(4), -1)), Vec::<f64>::new());
        assert_eq!(row(stepped(Some(5), Some(0), -2)), vec![5.0, 3.0, 1.0]);
        assert_eq!(row(stepped(None, Some(2), -1)), vec![5.0, 4.0, 3.0]);
        assert_eq!(row(stepped(Some(2), None, -1)), vec![2.0, 1.0, 0.0]);
        assert_eq!(row(stepped(Some(-2), Some(-5), -1)), vec![4.0, 3.0, 2.0]);
        assert_eq!(row(stepped(Some(99), Some(-99), -2)), vec![5.0, 3.0, 1.0]);
        assert_eq!(row(stepped(Some(-99), None, -1)), Vec::<f64>::new());
    }

    #[test]
    fn slice_errors() {
        assert_eq!(
            apply(SpatialSlice::from([AxisSlice::Ellipsis, AxisSlice::Ellipsis])).unwrap_err(),
            SliceError::MultipleEllipsis
        );
        assert_eq!(
            apply(SpatialSlice::from([AxisSlice::Full; 5])).unwrap_err(),
            SliceError::TooManyAxes { requested: 5, ndim: 4 }
        );
        assert_eq!(
            apply(SpatialSlice::from([AxisSlice::Full, AxisSlice::Full, AxisSlice::Index(3)])).unwrap_err(),
            SliceError::IndexOutOfBounds { axis: 2, index: 3, len: 3 }
        );
        assert_eq!(
            apply(SpatialSlice::from([AxisSlice::every(0)])).unwrap_err(),
            SliceError::ZeroStep { axis: 0 }
        );
    }

    #[test]
    fn projections_slice_and_stack_over_time() {
        use amrio_geometry::BlockShape;

        let shape = BlockShape::new(1, [4, 1, 1], 1).unwrap();
        let early = FieldArray::from_payload("u", Array4::from_elem((2, 1, 1, 4), 1.0), &shape, 2).unwrap();
        let late = FieldArray::from_payload("u", Array4::from_elem((2, 1, 1, 4), 2.0), &shape, 2).unwrap();
        let projection: Projection<'_, FieldArray> =
            SortedSeries::from_sorted(vec![(Time(1.0), &early), (Time(2.0), &late)]);

        let s = SpatialSlice::from([AxisSlice::Index(1)]);
        let padded = projection.slice_cells(&s).unwrap();
        assert_eq!(padded.get(&Time(1.0)).map(|v| v.shape().to_vec()), Some(vec![1, 1, 6]));
        let interior = projection.slice_interior(&s).unwrap();
        assert_eq!(interior.get(&Time(2.0)).map(|v| v.shape().to_vec()), Some(vec![1, 1, 4]));

        let stacked = projection.stack(&s).unwrap();
        assert_eq!(stacked.shape(), &[2, 1, 1, 6]);
        assert_eq!(stacked[IxDyn(&[1, 0, 0, 3])], 2.0);
        assert_eq!(stacked[IxDyn(&[0, 0, 0, 0])], 0.0);

        let bad = SpatialSlice::from([AxisSlice::Index(5)]);
        assert!(matches!(
            projection.slice_cells(&bad),
            Err(SelectError::Slice(SliceError::IndexOutOfBounds { .. }))
        ));
        let empty: Projection<'_, FieldArray> = SortedSeries::new();
        assert!(matches!(empty.stack(&s), Err(SelectError::Stack { .. })));
    }
}
