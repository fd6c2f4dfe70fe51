//! One named quantity over every block of a timestep.

use amrio_core::BlockId;
use amrio_geometry::BlockShape;
use ndarray::{Array4, ArrayView3, ArrayView4, ArrayViewMut4, AxisDescription, Slice};

use crate::error::FieldError;

fn dims(array: &Array4<f64>) -> [usize; 4] {
    let (b, z, y, x) = array.dim();
    [b, z, y, x]
}

/// The interior span of one `(block, z, y, x)` axis; blocks are kept whole.
fn interior_slice(shape: &BlockShape, desc: AxisDescription) -> Slice {
    match desc.axis.index() {
        0 => Slice::from(..),
        axis => Slice::from(shape.interior_range(BlockShape::array_axis(axis))),
    }
}

/// A guard-padded `(block, z, y, x)` array of `f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArray {
    data: Array4<f64>,
    shape: BlockShape,
}

impl FieldArray {
    /// An all-zero array for `blocks` blocks.
    pub fn zeros(shape: &BlockShape, blocks: usize) -> Self {
        let [b, z, y, x] = shape.padded_shape(blocks);
        Self {
            data: Array4::zeros((b, z, y, x)),
            shape: *shape,
        }
    }

    /// Adopt a decoded array.
    ///
    /// A padded array is kept as is, guard values included. An
    /// interior-shaped array is copied into the interior of a zeroed padded
    /// array. Any other shape is rejected.
    pub fn from_payload(
        name: &str,
        array: Array4<f64>,
        shape: &BlockShape,
        blocks: usize,
    ) -> Result<Self, FieldError> {
        let found = dims(&array);
        if found[0] != blocks {
            return Err(FieldError::BlockCountMismatch {
                field: name.to_owned(),
                expected: blocks,
                found: found[0],
            });
        }
        let padded = shape.padded_shape(blocks);
        if found == padded {
            return Ok(Self {
                data: array,
                shape: *shape,
            });
        }
        if found == shape.interior_shape(blocks) {
            let mut field = Self::zeros(shape, blocks);
            field.interior_mut().assign(&array);
            return Ok(field);
        }
        Err(FieldError::ShapeMismatch {
            field: name.to_owned(),
            expected: padded,
            found,
        })
    }

    /// Block layout.
    pub fn shape(&self) -> &BlockShape {
        &self.shape
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.data.dim().0
    }

    /// Array dimensions `(block, z, y, x)`.
    pub fn dim(&self) -> [usize; 4] {
        dims(&self.data)
    }

    /// The whole padded array.
    pub fn padded(&self) -> ArrayView4<'_, f64> {
        self.data.view()
    }

    pub(crate) fn padded_mut(&mut self) -> ArrayViewMut4<'_, f64> {
        self.data.view_mut()
    }

    /// Interior cells only.
    pub fn interior(&self) -> ArrayView4<'_, f64> {
        let shape = self.shape;
        self.data.slice_each_axis(|desc| interior_slice(&shape, desc))
    }

    fn interior_mut(&mut self) -> ArrayViewMut4<'_, f64> {
        let shape = self.shape;
        self.data.slice_each_axis_mut(|desc| interior_slice(&shape, desc))
    }

    /// One block's padded `(z, y, x)` cells.
    pub fn block(&self, id: BlockId) -> Option<ArrayView3<'_, f64>> {
        (id.index() < self.block_count()).then(|| self.data.index_axis(ndarray::Axis(0), id.index()))
    }

    /// Smallest interior value, `None` if empty.
    pub fn interior_min(&self) -> Option<f64> {
        fold(self.interior(), f64::min)
    }

    /// Largest interior value, `None` if empty.
    pub fn interior_max(&self) -> Option<f64> {
        fold(self.interior(), f64::max)
    }

    /// Smallest value including guards, `None` if empty.
    pub fn padded_min(&self) -> Option<f64> {
        fold(self.padded(), f64::min)
    }

    /// Largest value including guards, `None` if empty.
    pub fn padded_max(&self) -> Option<f64> {
        fold(self.padded(), f64::max)
    }

    /// The owned padded array.
    pub fn into_inner(self) -> Array4<f64> {
        self.data
    }
}

fn fold(view: ArrayView4<'_, f64>, f: fn(f64, f64) -> f64) -> Option<f64> {
    let mut iter = view.iter().copied();
    let first = iter.next()?;
    Some(iter.fold(first, f))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> BlockShape {
        BlockShape::new(2, [2, 3, 1], 1).unwrap()
    }

    #[test]
    fn interior_payload_is_padded_with_zeros() {
        let interior = Array4::from_shape_fn((2, 1, 3, 2), |(b, _, y, x)| (b * 100 + y * 10 + x) as f64 + 1.0);
        let field = FieldArray::from_payload("dens", interior.clone(), &shape(), 2).unwrap();
        assert_eq!(field.dim(), [2, 1, 5, 4]);
        assert_eq!(field.interior(), interior.view());
        assert_eq!(field.padded()[[0, 0, 0, 0]], 0.0);
        assert_eq!(field.padded()[[1, 0, 1, 1]], 101.0);
        assert_eq!(field.padded_min(), Some(0.0));
        assert_eq!(field.interior_min(), Some(1.0));
        assert_eq!(field.interior_max(), Some(122.0));
    }

    #[test]
    fn padded_payload_is_kept_verbatim() {
        let padded = Array4::from_elem((2, 1, 5, 4), 7.0);
        let field = FieldArray::from_payload("dens", padded.clone(), &shape(), 2).unwrap();
        assert_eq!(field.into_inner(), padded);
    }

    #[test]
    fn interior_view_trims_guards_on_every_active_axis() {
        let shape = BlockShape::new(3, [2, 3, 4], 1).unwrap();
        let padded = Array4::from_shape_fn((1, 6, 5, 4), |(_, z, y, x)| (z * 100 + y * 10 + x) as f64);
        let field = FieldArray::from_payload("dens", padded, &shape, 1).unwrap();
        let interior = field.interior();
        assert_eq!(interior.dim(), (1, 4, 3, 2));
        assert_eq!(interior[[0, 0, 0, 0]], 111.0);
        assert_eq!(interior[[0, 3, 2, 1]], 432.0);
    }

    #[test]
    fn wrong_shapes_are_rejected() {
        let bad = Array4::zeros((2, 1, 4, 4));
        match FieldArray::from_payload("dens", bad, &shape(), 2) {
            Err(FieldError::ShapeMismatch { field, expected, found }) => {
                assert_eq!(field, "dens");
                assert_eq!(expected, [2, 1, 5, 4]);
                assert_eq!(found, [2, 1, 4, 4]);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
        let rows = Array4::zeros((3, 1, 5, 4));
        assert_eq!(
            FieldArray::from_payload("dens", rows, &shape(), 2).unwrap_err(),
            FieldError::BlockCountMismatch {
                field: "dens".into(),
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn block_view() {
        let field = FieldArray::zeros(&shape(), 2);
        assert_eq!(field.block(BlockId(1)).map(|b| b.dim()), Some((1, 5, 4)));
        assert!(field.block(BlockId(2)).is_none());
    }
}
