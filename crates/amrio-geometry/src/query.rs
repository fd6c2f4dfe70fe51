//! Which blocks does a plane, line or box pass through?
//!
//! Every test is half-open per axis, `min <= v < max`, so a plane lying on
//! a shared face selects only the block above it.

use amrio_core::BlockId;

use crate::bounds::BoundingBox;
use crate::error::GeometryError;
use crate::geometry::GeometryData;

impl GeometryData {
    fn check_axis(&self, axis: usize) -> Result<(), GeometryError> {
        if axis >= self.ndim() {
            return Err(GeometryError::DimensionMismatch {
                axis,
                ndim: self.ndim(),
            });
        }
        Ok(())
    }

    fn blocks_where(&self, mut keep: impl FnMut(&BoundingBox) -> bool) -> Vec<BlockId> {
        self.blocks()
            .iter()
            .filter(|b| keep(&b.bounds))
            .map(|b| b.id)
            .collect()
    }

    /// Blocks cut by the plane `coordinate[axis] == value`.
    pub fn blocks_from_plane(&self, axis: usize, value: f64) -> Result<Vec<BlockId>, GeometryError> {
        self.check_axis(axis)?;
        Ok(self.blocks_where(|b| b.min[axis] <= value && value < b.max[axis]))
    }

    /// Blocks cut by the axis-aligned line where both `(axis, value)`
    /// constraints hold.
    pub fn blocks_from_line(&self, constraints: [(usize, f64); 2]) -> Result<Vec<BlockId>, GeometryError> {
        for (axis, _) in constraints {
            self.check_axis(axis)?;
        }
        Ok(self.blocks_where(|b| {
            constraints
                .iter()
                .all(|&(axis, v)| b.min[axis] <= v && v < b.max[axis])
        }))
    }

    /// Blocks overlapping `query` on every active axis.
    ///
    /// A degenerate query (`min == max` on an axis) behaves like a plane
    /// on that axis.
    pub fn blocks_from_bbox(&self, query: &BoundingBox) -> Vec<BlockId> {
        let ndim = self.ndim();
        self.blocks_where(|b| {
            (0..ndim).all(|a| b.min[a] <= query.max[a] && query.min[a] < b.max[a])
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::block::{BlockRecord, BlockShape};
    use crate::bounds::BoundingBox;
    use crate::config::ResolveConfig;
    use crate::error::GeometryError;
    use crate::geometry::GeometryData;
    use amrio_core::BlockId;

    fn strip() -> GeometryData {
        let records = (0..3)
            .map(|i| {
                let x = i as f64;
                BlockRecord::leaf(
                    BlockId(i),
                    BoundingBox::new([x, 0.0, 0.0], [x + 1.0, 1.0, 0.0]),
                    1,
                )
            })
            .collect();
        let shape = BlockShape::new(2, [2, 2, 1], 1).unwrap();
        GeometryData::new(shape, records, &ResolveConfig::default()).unwrap()
    }

    #[test]
    fn plane_on_shared_face_selects_upper_block() {
        let geo = strip();
        assert_eq!(geo.blocks_from_plane(0, 1.0).unwrap(), vec![BlockId(1)]);
        assert!(geo.blocks_from_plane(0, 3.0).unwrap().is_empty());
        assert_eq!(geo.blocks_from_plane(1, 0.5).unwrap().len(), 3);
    }

    #[test]
    fn inactive_axis_is_rejected() {
        let geo = strip();
        assert_eq!(
            geo.blocks_from_plane(2, 0.0).unwrap_err(),
            GeometryError::DimensionMismatch { axis: 2, ndim: 2 }
        );
    }

    #[test]
    fn line_intersects_both_constraints() {
        let geo = strip();
        assert_eq!(geo.blocks_from_line([(0, 2.5), (1, 0.5)]).unwrap(), vec![BlockId(2)]);
        assert!(geo.blocks_from_line([(0, 2.5), (1, 1.5)]).unwrap().is_empty());
    }

    #[test]
    fn bbox_selects_overlapping_blocks() {
        let geo = strip();
        let q = BoundingBox::new([0.5, 0.2, 0.0], [1.5, 0.4, 0.0]);
        assert_eq!(geo.blocks_from_bbox(&q), vec![BlockId(0), BlockId(1)]);
        let inside = BoundingBox::new([1.2, 0.2, 0.0], [1.4, 0.4, 0.0]);
        assert_eq!(geo.blocks_from_bbox(&inside), vec![BlockId(1)]);
    }
}
