//! Per-block mesh coordinates and cell spacing.

use ndarray::Array2;

use crate::block::{Block, BlockShape};

/// Where on a cell a coordinate is sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Staggering {
    /// Lower cell face.
    Left,
    /// Cell center.
    Center,
    /// Upper cell face.
    Right,
}

impl Staggering {
    /// All staggerings, in slot order.
    pub const ALL: [Staggering; 3] = [Staggering::Left, Staggering::Center, Staggering::Right];

    /// Offset from the lower face, in cell widths.
    pub fn offset(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Coordinates of every padded cell position, one `(block, cells)` array
/// per spatial axis.
///
/// Guard positions extend the interior spacing past the block faces.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshCoordinates {
    staggering: Staggering,
    axes: [Array2<f64>; 3],
}

impl MeshCoordinates {
    pub(crate) fn build(blocks: &[Block], shape: &BlockShape, staggering: Staggering) -> Self {
        let offset = staggering.offset();
        let axes = std::array::from_fn(|axis| {
            let g = shape.guard(axis) as f64;
            Array2::from_shape_fn((blocks.len(), shape.padded(axis)), |(b, j)| {
                let block = &blocks[b];
                block.bounds.min[axis] + (j as f64 - g + offset) * block.cell_size[axis]
            })
        });
        Self { staggering, axes }
    }

    /// Which cell position these coordinates sample.
    pub fn staggering(&self) -> Staggering {
        self.staggering
    }

    /// Coordinates along spatial `axis` (0 = x).
    ///
    /// # Panics
    ///
    /// Panics if `axis > 2`.
    pub fn axis(&self, axis: usize) -> &Array2<f64> {
        &self.axes[axis]
    }

    /// x coordinates.
    pub fn x(&self) -> &Array2<f64> {
        &self.axes[0]
    }

    /// y coordinates.
    pub fn y(&self) -> &Array2<f64> {
        &self.axes[1]
    }

    /// z coordinates.
    pub fn z(&self) -> &Array2<f64> {
        &self.axes[2]
    }
}

/// Cell widths, `(block, axis)`.
pub(crate) fn spacing(blocks: &[Block]) -> Array2<f64> {
    Array2::from_shape_fn((blocks.len(), 3), |(b, a)| blocks[b].cell_size[a])
}
