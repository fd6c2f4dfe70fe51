//! Guard-cell fill plan.
//!
//! The plan is computed once per geometry and applied to every field of
//! the timestep. Each [`Stencil`] writes one guard cell as the mean of one
//! or more interior cells:
//!
//! - same-level face: one source, the neighbor's interior cell nearest the
//!   shared face (direct copy);
//! - coarser face: one source, the coarse cell containing the guard cell's
//!   center (piecewise-constant injection);
//! - finer face: every interior cell of every finer block across the face
//!   whose center falls inside the guard cell (block average);
//! - edge or corner: one source, reached through a chain of same-level face
//!   neighbors taken in ascending axis order; skipped if any link is not
//!   same-level;
//! - boundary face: no stencil, guard cells keep their decoded values.
//!
//! Destinations are always guard cells and sources always interior cells,
//! so applying a plan never changes what a later application reads.

use std::ops::Range;

use smallvec::SmallVec;

use crate::block::{Block, BlockShape, Neighbor};
use crate::bounds::Face;
use crate::resolve::{adjacent_at_level, LevelIndex};

/// Padded cell index `(block, z, y, x)`.
pub type CellIndex = [usize; 4];

/// One guard cell and the interior cells whose mean fills it.
#[derive(Clone, Debug, PartialEq)]
pub struct Stencil {
    /// The guard cell written.
    pub dest: CellIndex,
    /// Interior cells averaged into it.
    pub sources: SmallVec<[CellIndex; 8]>,
}

/// Every guard-cell stencil of one timestep's geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct GuardPlan {
    shape: BlockShape,
    block_count: usize,
    stencils: Vec<Stencil>,
}

impl GuardPlan {
    /// Block layout the plan indexes into.
    pub fn shape(&self) -> &BlockShape {
        &self.shape
    }

    /// Number of blocks the plan covers.
    pub fn block_count(&self) -> usize {
        self.block_count
    }

    /// Padded array shape the plan expects, `(block, z, y, x)`.
    pub fn padded_shape(&self) -> [usize; 4] {
        self.shape.padded_shape(self.block_count)
    }

    /// All stencils, grouped by destination block.
    pub fn stencils(&self) -> &[Stencil] {
        &self.stencils
    }

    /// Number of guard cells the plan fills.
    pub fn len(&self) -> usize {
        self.stencils.len()
    }

    /// Returns `true` if the plan fills nothing.
    pub fn is_empty(&self) -> bool {
        self.stencils.is_empty()
    }

    pub(crate) fn build(
        blocks: &[Block],
        index: &LevelIndex,
        shape: &BlockShape,
        tolerance: f64,
    ) -> Self {
        let mut builder = Builder {
            blocks,
            index,
            shape,
            tolerance,
            stencils: Vec::new(),
        };
        let regions = regions(shape);
        for block in blocks {
            for parts in &regions {
                builder.region(block, parts);
            }
        }
        Self {
            shape: *shape,
            block_count: blocks.len(),
            stencils: builder.stencils,
        }
    }
}

// ── Regions ─────────────────────────────────────────────────────

/// Position of a region along one spatial axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Part {
    Interior,
    Low,
    High,
}

impl Part {
    fn range(self, shape: &BlockShape, axis: usize) -> Range<usize> {
        let g = shape.guard(axis);
        let n = shape.cells()[axis];
        match self {
            Self::Interior => shape.interior_range(axis),
            Self::Low => 0..g,
            Self::High => g + n..n + 2 * g,
        }
    }

    /// Index in the same-level neighbor across this side.
    fn wrap(self, shape: &BlockShape, axis: usize, i: usize) -> usize {
        let n = shape.cells()[axis];
        match self {
            Self::Interior => i,
            Self::Low => i + n,
            Self::High => i - n,
        }
    }

    fn face(self, axis: usize) -> Option<Face> {
        match self {
            Self::Interior => None,
            Self::Low => Some(Face::from_axis(axis, false)),
            Self::High => Some(Face::from_axis(axis, true)),
        }
    }
}

/// Every guard region of a block: faces first, then edges and corners.
fn regions(shape: &BlockShape) -> Vec<[Part; 3]> {
    if shape.guards() == 0 {
        return Vec::new();
    }
    let options = |axis: usize| -> &'static [Part] {
        if shape.is_active(axis) {
            &[Part::Interior, Part::Low, Part::High]
        } else {
            &[Part::Interior]
        }
    };
    let mut out = Vec::new();
    for &z in options(2) {
        for &y in options(1) {
            for &x in options(0) {
                let parts = [x, y, z];
                if parts.iter().any(|p| *p != Part::Interior) {
                    out.push(parts);
                }
            }
        }
    }
    out.sort_by_key(|parts| parts.iter().filter(|p| **p != Part::Interior).count());
    out
}

fn for_each_cell(ranges: &[Range<usize>; 3], mut f: impl FnMut([usize; 3])) {
    for z in ranges[2].clone() {
        for y in ranges[1].clone() {
            for x in ranges[0].clone() {
                f([x, y, z]);
            }
        }
    }
}

fn cell(block: &Block, xyz: [usize; 3]) -> CellIndex {
    [block.id.index(), xyz[2], xyz[1], xyz[0]]
}

// ── Builder ─────────────────────────────────────────────────────

struct Builder<'a> {
    blocks: &'a [Block],
    index: &'a LevelIndex,
    shape: &'a BlockShape,
    tolerance: f64,
    stencils: Vec<Stencil>,
}

impl Builder<'_> {
    fn region(&mut self, block: &Block, parts: &[Part; 3]) {
        let blocks = self.blocks;
        let sides: SmallVec<[(usize, Face); 3]> = (0..3)
            .filter_map(|axis| parts[axis].face(axis).map(|f| (axis, f)))
            .collect();
        let ranges: [Range<usize>; 3] = std::array::from_fn(|a| parts[a].range(self.shape, a));
        match sides.as_slice() {
            [] => {}
            [(_, face)] => match block.neighbor(*face) {
                Neighbor::Boundary => {}
                Neighbor::Same(id) => self.copy(block, &blocks[id.index()], parts, &ranges),
                Neighbor::Coarser(id) => self.inject(block, &blocks[id.index()], &ranges),
                Neighbor::Finer(_) => self.average(block, *face, &ranges),
            },
            chain => {
                let mut current = block;
                for (_, face) in chain {
                    match current.neighbor(*face) {
                        Neighbor::Same(id) => current = &blocks[id.index()],
                        _ => return,
                    }
                }
                self.copy(block, current, parts, &ranges);
            }
        }
    }

    /// Direct copy from a same-level block offset by one block width on
    /// every non-interior axis.
    fn copy(&mut self, block: &Block, source: &Block, parts: &[Part; 3], ranges: &[Range<usize>; 3]) {
        let shape = self.shape;
        let mut out = Vec::new();
        for_each_cell(ranges, |d| {
            let s = std::array::from_fn(|a| parts[a].wrap(shape, a, d[a]));
            out.push(Stencil {
                dest: cell(block, d),
                sources: SmallVec::from_elem(cell(source, s), 1),
            });
        });
        self.stencils.append(&mut out);
    }

    /// Coarse cell containing each guard cell's center.
    fn inject(&mut self, block: &Block, coarse: &Block, ranges: &[Range<usize>; 3]) {
        let shape = self.shape;
        let mut out = Vec::new();
        for_each_cell(ranges, |d| {
            let s: [usize; 3] = std::array::from_fn(|a| {
                if !shape.is_active(a) {
                    return 0;
                }
                let g = shape.guard(a);
                let n = shape.cells()[a];
                let center = block.bounds.min[a] + (d[a] as f64 - g as f64 + 0.5) * block.cell_size[a];
                let k = ((center - coarse.bounds.min[a]) / coarse.cell_size[a]).floor();
                (k.max(0.0) as usize).min(n - 1) + g
            });
            out.push(Stencil {
                dest: cell(block, d),
                sources: SmallVec::from_elem(cell(coarse, s), 1),
            });
        });
        self.stencils.append(&mut out);
    }

    /// Mean of every finer interior cell whose center lies in the guard cell.
    fn average(&mut self, block: &Block, face: Face, ranges: &[Range<usize>; 3]) {
        let shape = self.shape;
        let ndim = shape.ndim();
        let fine: Vec<&Block> = adjacent_at_level(
            self.blocks,
            self.index,
            block,
            face,
            block.level + 1,
            self.tolerance,
            ndim,
        )
        .collect();
        let mut out = Vec::new();
        for_each_cell(ranges, |d| {
            let mut sources = SmallVec::new();
            for m in &fine {
                let spans: [Range<usize>; 3] = std::array::from_fn(|a| {
                    if !shape.is_active(a) {
                        return 0..1;
                    }
                    let g = shape.guard(a);
                    let n = shape.cells()[a];
                    let lo = block.bounds.min[a] + (d[a] as f64 - g as f64) * block.cell_size[a];
                    let hi = lo + block.cell_size[a];
                    let first = first_center_at_or_after(lo, m, a).min(n);
                    let last = first_center_at_or_after(hi, m, a).min(n);
                    first + g..last.max(first) + g
                });
                for_each_cell(&spans, |s| sources.push(cell(m, s)));
            }
            if !sources.is_empty() {
                out.push(Stencil {
                    dest: cell(block, d),
                    sources,
                });
            }
        });
        self.stencils.append(&mut out);
    }
}

/// Interior index of the first cell of `block` on `axis` whose center is
/// `>= x`, clamped below at zero.
fn first_center_at_or_after(x: f64, block: &Block, axis: usize) -> usize {
    let k = ((x - block.bounds.min[axis]) / block.cell_size[axis] - 0.5).ceil();
    k.max(0.0) as usize
}
