//! Block records, resolved blocks, and the shared per-block array shape.

use std::fmt;
use std::ops::Range;

use amrio_core::BlockId;
use smallvec::SmallVec;

use crate::bounds::{BoundingBox, Face};
use crate::error::GeometryError;

// ── TreePath ────────────────────────────────────────────────────

/// Position of a block in the refinement tree: the child index taken at
/// each level on the way down from a root block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TreePath(SmallVec<[u8; 8]>);

impl TreePath {
    /// The path of a root block.
    pub fn root() -> Self {
        Self::default()
    }

    /// A path from explicit child indices.
    pub fn from_slice(steps: &[u8]) -> Self {
        Self(SmallVec::from_slice(steps))
    }

    /// Number of refinements below the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The child indices, root first.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// The path of this block's `index`-th child.
    pub fn child(&self, index: u8) -> Self {
        let mut steps = self.0.clone();
        steps.push(index);
        Self(steps)
    }

    /// The path of the parent block, `None` at a root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.0.split_last()?;
        Some(Self::from_slice(init))
    }

    /// Whether `other` lies strictly below this path.
    pub fn is_ancestor_of(&self, other: &TreePath) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }
}

impl From<Vec<u8>> for TreePath {
    fn from(steps: Vec<u8>) -> Self {
        Self(SmallVec::from_vec(steps))
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

// ── Records ─────────────────────────────────────────────────────

/// A block as decoded from a snapshot, before neighbor resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockRecord {
    /// Id within its source; dense `0..n` once sources are concatenated.
    pub id: BlockId,
    /// Physical extent.
    pub bounds: BoundingBox,
    /// Refinement level; higher is finer.
    pub level: u32,
    /// Ancestry in the refinement tree.
    pub tree_path: TreePath,
    /// Parent block, `None` for a root.
    pub parent: Option<BlockId>,
    /// Child blocks, empty for a leaf.
    pub children: SmallVec<[BlockId; 8]>,
}

impl BlockRecord {
    /// A root leaf record with no tree links.
    pub fn leaf(id: BlockId, bounds: BoundingBox, level: u32) -> Self {
        Self {
            id,
            bounds,
            level,
            tree_path: TreePath::root(),
            parent: None,
            children: SmallVec::new(),
        }
    }
}

/// What lies across one face of a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Neighbor {
    /// Nothing: the face is on the domain boundary, or no block matched.
    #[default]
    Boundary,
    /// A block at the same refinement level.
    Same(BlockId),
    /// A block one level coarser.
    Coarser(BlockId),
    /// The representative of the finer blocks across the face.
    Finer(BlockId),
}

impl Neighbor {
    /// The neighbor's id, `None` at a boundary.
    pub fn id(self) -> Option<BlockId> {
        match self {
            Self::Boundary => None,
            Self::Same(id) | Self::Coarser(id) | Self::Finer(id) => Some(id),
        }
    }

    /// Whether the face has no neighbor.
    pub fn is_boundary(self) -> bool {
        matches!(self, Self::Boundary)
    }
}

/// A block with derived metrics and resolved face neighbors.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Dense id; also the block's row in every field array.
    pub id: BlockId,
    /// Physical extent.
    pub bounds: BoundingBox,
    /// Refinement level.
    pub level: u32,
    /// Ancestry in the refinement tree.
    pub tree_path: TreePath,
    /// Parent block, `None` for a root.
    pub parent: Option<BlockId>,
    /// Child blocks, empty for a leaf.
    pub children: SmallVec<[BlockId; 8]>,
    /// Midpoint of `bounds`.
    pub center: [f64; 3],
    /// Side lengths of `bounds`.
    pub size: [f64; 3],
    /// Width of one interior cell on each axis.
    pub cell_size: [f64; 3],
    /// One slot per [`Face`], in [`Face::ALL`] order.
    pub neighbors: [Neighbor; 6],
}

impl Block {
    pub(crate) fn from_record(record: BlockRecord, shape: &BlockShape) -> Self {
        let size = record.bounds.extent();
        Self {
            id: record.id,
            center: record.bounds.center(),
            cell_size: std::array::from_fn(|a| size[a] / shape.cells()[a] as f64),
            size,
            bounds: record.bounds,
            level: record.level,
            tree_path: record.tree_path,
            parent: record.parent,
            children: record.children,
            neighbors: [Neighbor::Boundary; 6],
        }
    }

    /// The neighbor across `face`.
    pub fn neighbor(&self, face: Face) -> Neighbor {
        self.neighbors[face.index()]
    }

    /// Whether the block has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// ── BlockShape ──────────────────────────────────────────────────

/// Cell layout shared by every block of a geometry.
///
/// Each active axis has `cells` interior cells and `guards` guard cells on
/// both sides. Axes at or beyond `ndim` are inactive: one cell, no guard.
///
/// Field arrays are laid out `(block, z, y, x)`, so spatial axis `a` is
/// array axis `3 - a`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockShape {
    ndim: usize,
    cells: [usize; 3],
    guards: usize,
}

impl BlockShape {
    /// Create a shape, forcing inactive axes to a single cell.
    ///
    /// Fails if `ndim` is not 1, 2 or 3, if an active axis has no cells, or
    /// if the guard band is wider than the interior it is copied from.
    pub fn new(ndim: usize, cells: [usize; 3], guards: usize) -> Result<Self, GeometryError> {
        if !(1..=3).contains(&ndim) {
            return Err(GeometryError::InvalidShape {
                reason: format!("ndim must be 1, 2 or 3, got {ndim}"),
            });
        }
        let mut normalized = [1usize; 3];
        for axis in 0..ndim {
            let n = cells[axis];
            if n == 0 {
                return Err(GeometryError::InvalidShape {
                    reason: format!("axis {axis} has no interior cells"),
                });
            }
            if guards > n {
                return Err(GeometryError::InvalidShape {
                    reason: format!("{guards} guard cells exceed {n} interior cells on axis {axis}"),
                });
            }
            normalized[axis] = n;
        }
        Ok(Self {
            ndim,
            cells: normalized,
            guards,
        })
    }

    /// Number of active spatial axes.
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Interior cells per spatial axis `[x, y, z]`.
    pub fn cells(&self) -> [usize; 3] {
        self.cells
    }

    /// Guard width on active axes.
    pub fn guards(&self) -> usize {
        self.guards
    }

    /// Whether spatial `axis` is active.
    pub fn is_active(&self, axis: usize) -> bool {
        axis < self.ndim
    }

    /// Guard width on spatial `axis`, zero when inactive.
    pub fn guard(&self, axis: usize) -> usize {
        if self.is_active(axis) {
            self.guards
        } else {
            0
        }
    }

    /// Padded cells on spatial `axis`.
    pub fn padded(&self, axis: usize) -> usize {
        self.cells[axis] + 2 * self.guard(axis)
    }

    /// Interior index range on spatial `axis`, in padded coordinates.
    pub fn interior_range(&self, axis: usize) -> Range<usize> {
        let g = self.guard(axis);
        g..g + self.cells[axis]
    }

    /// Whether a padded `(z, y, x)` cell index lies in the interior.
    pub fn is_interior_cell(&self, zyx: [usize; 3]) -> bool {
        (0..3).all(|axis| self.interior_range(axis).contains(&zyx[2 - axis]))
    }

    /// Array axis holding spatial `axis`.
    pub fn array_axis(axis: usize) -> usize {
        3 - axis
    }

    /// Padded array shape `(blocks, z, y, x)`.
    pub fn padded_shape(&self, blocks: usize) -> [usize; 4] {
        [blocks, self.padded(2), self.padded(1), self.padded(0)]
    }

    /// Interior-only array shape `(blocks, z, y, x)`.
    pub fn interior_shape(&self, blocks: usize) -> [usize; 4] {
        [blocks, self.cells[2], self.cells[1], self.cells[0]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_path_ancestry() {
        let root = TreePath::root();
        let child = root.child(3);
        let grandchild = child.child(1);
        assert!(root.is_ancestor_of(&grandchild));
        assert!(child.is_ancestor_of(&grandchild));
        assert!(!grandchild.is_ancestor_of(&child));
        assert!(!child.is_ancestor_of(&child));
        assert_eq!(grandchild.parent(), Some(child.clone()));
        assert_eq!(root.parent(), None);
        assert_eq!(grandchild.depth(), 2);
        assert_eq!(grandchild.to_string(), "/3/1");
    }

    #[test]
    fn shape_pads_active_axes_only() {
        let shape = BlockShape::new(2, [8, 4, 99], 2).unwrap();
        assert_eq!(shape.cells(), [8, 4, 1]);
        assert_eq!(shape.padded_shape(5), [5, 1, 8, 12]);
        assert_eq!(shape.interior_shape(5), [5, 1, 4, 8]);
        assert_eq!(shape.interior_range(0), 2..10);
        assert_eq!(shape.interior_range(2), 0..1);
        assert_eq!(BlockShape::array_axis(0), 3);
    }

    #[test]
    fn shape_rejects_bad_layouts() {
        assert!(BlockShape::new(0, [1, 1, 1], 0).is_err());
        assert!(BlockShape::new(4, [1, 1, 1], 0).is_err());
        assert!(BlockShape::new(2, [4, 0, 1], 1).is_err());
        assert!(BlockShape::new(1, [2, 1, 1], 3).is_err());
    }

    #[test]
    fn neighbor_ids() {
        assert_eq!(Neighbor::Same(BlockId(2)).id(), Some(BlockId(2)));
        assert!(Neighbor::Boundary.is_boundary());
        assert_eq!(Neighbor::default(), Neighbor::Boundary);
    }
}
