//! Axis-aligned boxes and block faces.

use std::fmt;

use amrio_core::BlockId;

use crate::error::GeometryError;

/// One face of an axis-aligned block.
///
/// Faces are ordered low/high per axis, x first, matching the slot order
/// of [`Block::neighbors`](crate::Block::neighbors).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    /// `-x`
    XLow,
    /// `+x`
    XHigh,
    /// `-y`
    YLow,
    /// `+y`
    YHigh,
    /// `-z`
    ZLow,
    /// `+z`
    ZHigh,
}

impl Face {
    /// All six faces in slot order.
    pub const ALL: [Face; 6] = [
        Face::XLow,
        Face::XHigh,
        Face::YLow,
        Face::YHigh,
        Face::ZLow,
        Face::ZHigh,
    ];

    /// The face on `axis`, high side if `high`.
    pub fn from_axis(axis: usize, high: bool) -> Face {
        Self::ALL[(axis.min(2)) * 2 + usize::from(high)]
    }

    /// Spatial axis normal to the face (0 = x).
    pub fn axis(self) -> usize {
        self.index() / 2
    }

    /// Whether the face looks toward increasing coordinates.
    pub fn is_high(self) -> bool {
        self.index() % 2 == 1
    }

    /// The face on the other side of the same axis.
    pub fn opposite(self) -> Face {
        Self::ALL[self.index() ^ 1]
    }

    /// Slot index in `0..6`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The faces of a `ndim`-dimensional block.
    pub fn all(ndim: usize) -> impl Iterator<Item = Face> {
        Self::ALL.into_iter().take(2 * ndim.min(3))
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::XLow => "-x",
            Self::XHigh => "+x",
            Self::YLow => "-y",
            Self::YHigh => "+y",
            Self::ZLow => "-z",
            Self::ZHigh => "+z",
        };
        f.write_str(name)
    }
}

/// An axis-aligned box in physical coordinates.
///
/// Always three axes wide; axes at or beyond a geometry's dimensionality
/// are ignored by every predicate that takes `ndim`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Lower corner.
    pub min: [f64; 3],
    /// Upper corner.
    pub max: [f64; 3],
}

impl BoundingBox {
    /// A box from its corners.
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Check `min <= max` on every active axis; NaN bounds fail too.
    pub fn validate(&self, block: BlockId, ndim: usize) -> Result<(), GeometryError> {
        for axis in 0..ndim.min(3) {
            let (min, max) = (self.min[axis], self.max[axis]);
            if min.is_nan() || max.is_nan() || min > max {
                return Err(GeometryError::MalformedBounds {
                    block,
                    axis,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Midpoint on every axis.
    pub fn center(&self) -> [f64; 3] {
        std::array::from_fn(|a| 0.5 * (self.min[a] + self.max[a]))
    }

    /// Side length on every axis.
    pub fn extent(&self) -> [f64; 3] {
        std::array::from_fn(|a| self.max[a] - self.min[a])
    }

    /// Whether `point` lies in `[min, max)` on every active axis.
    pub fn contains_point(&self, point: [f64; 3], ndim: usize) -> bool {
        (0..ndim.min(3)).all(|a| self.min[a] <= point[a] && point[a] < self.max[a])
    }

    /// Whether the boxes overlap with positive volume on every active axis.
    pub fn intersects(&self, other: &BoundingBox, ndim: usize) -> bool {
        (0..ndim.min(3)).all(|a| self.min[a] < other.max[a] && other.min[a] < self.max[a])
    }

    /// Overlap length of the two boxes on one axis, zero when disjoint.
    pub fn overlap_on(&self, other: &BoundingBox, axis: usize) -> f64 {
        (self.max[axis].min(other.max[axis]) - self.min[axis].max(other.min[axis])).max(0.0)
    }

    /// Area shared across `face`: product of overlaps on the active axes
    /// transverse to the face. One for one-dimensional geometry.
    pub fn face_overlap(&self, other: &BoundingBox, face: Face, ndim: usize) -> f64 {
        (0..ndim.min(3))
            .filter(|&a| a != face.axis())
            .map(|a| self.overlap_on(other, a))
            .product()
    }

    /// Whether `other` sits flush against `face` of this box.
    ///
    /// The gap on the normal axis must be within `tolerance` times this
    /// box's extent there, and every active transverse axis must overlap by
    /// more than `tolerance` times this box's extent on that axis, so boxes
    /// touching only along an edge or at a corner do not count.
    pub fn shares_face(&self, other: &BoundingBox, face: Face, tolerance: f64, ndim: usize) -> bool {
        let extent = self.extent();
        let axis = face.axis();
        let gap = if face.is_high() {
            other.min[axis] - self.max[axis]
        } else {
            self.min[axis] - other.max[axis]
        };
        if gap.abs() > tolerance * extent[axis] {
            return false;
        }
        (0..ndim.min(3))
            .filter(|&a| a != axis)
            .all(|a| self.overlap_on(other, a) > tolerance * extent[a])
    }

    /// Whether `face` lies on the matching face of `domain`.
    pub fn on_domain_face(&self, domain: &BoundingBox, face: Face, tolerance: f64) -> bool {
        let axis = face.axis();
        let eps = tolerance * self.extent()[axis];
        if face.is_high() {
            (self.max[axis] - domain.max[axis]).abs() <= eps
        } else {
            (self.min[axis] - domain.min[axis]).abs() <= eps
        }
    }

    /// The smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: std::array::from_fn(|a| self.min[a].min(other.min[a])),
            max: std::array::from_fn(|a| self.max[a].max(other.max[a])),
        }
    }
}
