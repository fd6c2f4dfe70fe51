//! Face-neighbor resolution across refinement levels.

use std::collections::BTreeMap;

use amrio_core::BlockId;
use tracing::warn;

use crate::block::{Block, Neighbor};
use crate::bounds::{BoundingBox, Face};

/// Blocks bucketed by refinement level, ids ascending within a level.
#[derive(Clone, Debug, Default)]
pub(crate) struct LevelIndex {
    levels: BTreeMap<u32, Vec<BlockId>>,
}

impl LevelIndex {
    pub(crate) fn build(blocks: &[Block]) -> Self {
        let mut levels: BTreeMap<u32, Vec<BlockId>> = BTreeMap::new();
        for block in blocks {
            levels.entry(block.level).or_default().push(block.id);
        }
        Self { levels }
    }

    pub(crate) fn at(&self, level: u32) -> &[BlockId] {
        self.levels
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.keys().copied()
    }
}

/// Face counts from one resolution pass, by neighbor kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Faces matched at the same level.
    pub same: usize,
    /// Faces matched one level coarser.
    pub coarser: usize,
    /// Faces matched one level finer.
    pub finer: usize,
    /// Faces with no match.
    pub boundary: usize,
    /// Unmatched faces that are not on the domain boundary.
    pub interior_unmatched: usize,
}

/// Every block at `level` flush against `face` of `block`, ascending id.
pub(crate) fn adjacent_at_level<'a>(
    blocks: &'a [Block],
    index: &'a LevelIndex,
    block: &'a Block,
    face: Face,
    level: u32,
    tolerance: f64,
    ndim: usize,
) -> impl Iterator<Item = &'a Block> + 'a {
    index
        .at(level)
        .iter()
        .map(move |id| &blocks[id.index()])
        .filter(move |other| {
            other.id != block.id && block.bounds.shares_face(&other.bounds, face, tolerance, ndim)
        })
}

/// The candidate at `level` sharing the largest face area, lowest id on ties.
fn representative(
    blocks: &[Block],
    index: &LevelIndex,
    block: &Block,
    face: Face,
    level: u32,
    tolerance: f64,
    ndim: usize,
) -> Option<BlockId> {
    let mut best: Option<(f64, BlockId)> = None;
    for other in adjacent_at_level(blocks, index, block, face, level, tolerance, ndim) {
        let overlap = block.bounds.face_overlap(&other.bounds, face, ndim);
        // Candidates arrive in ascending id order, so strict `>` keeps the
        // lowest id among equal overlaps.
        if best.is_none_or(|(o, _)| overlap > o) {
            best = Some((overlap, other.id));
        }
    }
    best.map(|(_, id)| id)
}

fn search_face(
    blocks: &[Block],
    index: &LevelIndex,
    block: &Block,
    face: Face,
    tolerance: f64,
    ndim: usize,
) -> Neighbor {
    let level = block.level;
    if let Some(id) = representative(blocks, index, block, face, level, tolerance, ndim) {
        return Neighbor::Same(id);
    }
    if let Some(coarser) = level.checked_sub(1) {
        if let Some(id) = representative(blocks, index, block, face, coarser, tolerance, ndim) {
            return Neighbor::Coarser(id);
        }
    }
    if let Some(finer) = level.checked_add(1) {
        if let Some(id) = representative(blocks, index, block, face, finer, tolerance, ndim) {
            return Neighbor::Finer(id);
        }
    }
    Neighbor::Boundary
}

/// Fill `neighbors` on every block. Never fails: unmatched faces become
/// [`Neighbor::Boundary`].
pub(crate) fn resolve_neighbors(
    blocks: &mut [Block],
    index: &LevelIndex,
    domain: &BoundingBox,
    tolerance: f64,
    ndim: usize,
) -> ResolveStats {
    let mut stats = ResolveStats::default();
    // TODO: blocks resolve independently; split this loop across a worker
    // pool once snapshot block counts make the quadratic scan dominant.
    let resolved: Vec<[Neighbor; 6]> = blocks
        .iter()
        .map(|block| {
            let mut slots = [Neighbor::Boundary; 6];
            for face in Face::all(ndim) {
                let neighbor = search_face(blocks, index, block, face, tolerance, ndim);
                match neighbor {
                    Neighbor::Same(_) => stats.same += 1,
                    Neighbor::Coarser(_) => stats.coarser += 1,
                    Neighbor::Finer(_) => stats.finer += 1,
                    Neighbor::Boundary => {
                        stats.boundary += 1;
                        if !block.bounds.on_domain_face(domain, face, tolerance) {
                            stats.interior_unmatched += 1;
                            warn!(
                                block = %block.id,
                                level = block.level,
                                face = %face,
                                "face inside the domain has no neighbor within one level"
                            );
                        }
                    }
                }
                slots[face.index()] = neighbor;
            }
            slots
        })
        .collect();
    for (block, neighbors) in blocks.iter_mut().zip(resolved) {
        block.neighbors = neighbors;
    }
    stats
}
