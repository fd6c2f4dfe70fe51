//! Per-timestep geometry: validated blocks, neighbors, mesh, guard plan.

use amrio_core::BlockId;
use ndarray::Array2;
use tracing::trace;

use crate::block::{Block, BlockRecord, BlockShape, Neighbor};
use crate::bounds::{BoundingBox, Face};
use crate::config::ResolveConfig;
use crate::error::GeometryError;
use crate::guard::GuardPlan;
use crate::mesh::{self, MeshCoordinates, Staggering};
use crate::resolve::{resolve_neighbors, LevelIndex, ResolveStats};

/// All blocks of one timestep with their resolved neighbor graph.
///
/// Immutable once built. Block `i` of [`blocks`](Self::blocks) has id `i`
/// and is row `i` of every field array of the same timestep.
#[derive(Clone, Debug)]
pub struct GeometryData {
    shape: BlockShape,
    blocks: Vec<Block>,
    levels: LevelIndex,
    domain: BoundingBox,
    meshes: [MeshCoordinates; 3],
    spacing: Array2<f64>,
    guard_plan: GuardPlan,
    stats: ResolveStats,
}

impl GeometryData {
    /// Validate `records`, resolve neighbors, and derive the mesh and the
    /// guard plan.
    ///
    /// Records may arrive in any order; after sorting by id they must be
    /// exactly `0..n`. Parent and child links must name existing blocks.
    ///
    /// # Errors
    ///
    /// [`GeometryError::EmptyGeometry`], [`GeometryError::MalformedBounds`],
    /// [`GeometryError::DuplicateBlockId`], [`GeometryError::NonContiguousIds`],
    /// [`GeometryError::DanglingReference`], or
    /// [`GeometryError::InvalidTolerance`] from `config`.
    pub fn new(
        shape: BlockShape,
        mut records: Vec<BlockRecord>,
        config: &ResolveConfig,
    ) -> Result<Self, GeometryError> {
        config.validate()?;
        if records.is_empty() {
            return Err(GeometryError::EmptyGeometry);
        }
        let ndim = shape.ndim();
        for record in &records {
            record.bounds.validate(record.id, ndim)?;
        }
        records.sort_by_key(|r| r.id);
        if let Some(pair) = records.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(GeometryError::DuplicateBlockId { id: pair[0].id });
        }
        for (i, record) in records.iter().enumerate() {
            let expected = BlockId(i as u32);
            if record.id != expected {
                return Err(GeometryError::NonContiguousIds {
                    expected,
                    found: record.id,
                });
            }
        }
        let count = records.len();
        for record in &records {
            let links = record.parent.iter().chain(record.children.iter());
            if let Some(missing) = links.copied().find(|id| id.index() >= count) {
                return Err(GeometryError::DanglingReference {
                    block: record.id,
                    reference: missing,
                });
            }
        }

        let mut blocks: Vec<Block> = records
            .into_iter()
            .map(|r| Block::from_record(r, &shape))
            .collect();
        let domain = blocks
            .iter()
            .skip(1)
            .fold(blocks[0].bounds, |acc, b| acc.union(&b.bounds));
        let levels = LevelIndex::build(&blocks);
        let stats = resolve_neighbors(&mut blocks, &levels, &domain, config.tolerance, ndim);
        trace!(
            blocks = count,
            levels = levels.levels().count(),
            same = stats.same,
            coarser = stats.coarser,
            finer = stats.finer,
            boundary = stats.boundary,
            interior_unmatched = stats.interior_unmatched,
            "resolved block neighbors"
        );

        let meshes = Staggering::ALL.map(|s| MeshCoordinates::build(&blocks, &shape, s));
        let spacing = mesh::spacing(&blocks);
        let guard_plan = GuardPlan::build(&blocks, &levels, &shape, config.tolerance);
        trace!(stencils = guard_plan.len(), "built guard plan");

        Ok(Self {
            shape,
            blocks,
            levels,
            domain,
            meshes,
            spacing,
            guard_plan,
            stats,
        })
    }

    /// Per-block cell layout.
    pub fn shape(&self) -> &BlockShape {
        &self.shape
    }

    /// Number of active spatial axes.
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always `false`: construction rejects empty geometries.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The block with `id`.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    /// All blocks, in id order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Blocks at refinement `level`, in id order.
    pub fn blocks_at_level(&self, level: u32) -> impl Iterator<Item = &Block> + '_ {
        self.levels
            .at(level)
            .iter()
            .map(move |id| &self.blocks[id.index()])
    }

    /// Blocks with no children.
    pub fn leaf_blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter().filter(|b| b.is_leaf())
    }

    /// Refinement levels present, ascending.
    pub fn levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.levels()
    }

    /// The smallest box containing every block.
    pub fn domain(&self) -> &BoundingBox {
        &self.domain
    }

    /// What lies across `face` of block `id`; `None` if `id` does not exist.
    pub fn neighbor(&self, id: BlockId, face: Face) -> Option<Neighbor> {
        self.block(id).map(|b| b.neighbor(face))
    }

    /// Cell coordinates at the given staggering.
    pub fn mesh(&self, staggering: Staggering) -> &MeshCoordinates {
        &self.meshes[staggering.index()]
    }

    /// Cell widths, shaped `(block, 3)` with columns x, y, z.
    pub fn spacing(&self) -> &Array2<f64> {
        &self.spacing
    }

    /// Guard-cell stencils for fields of this timestep.
    pub fn guard_plan(&self) -> &GuardPlan {
        &self.guard_plan
    }

    /// Face counts from neighbor resolution.
    pub fn resolve_stats(&self) -> ResolveStats {
        self.stats
    }
}

impl PartialEq for GeometryData {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.blocks == other.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::TreePath;
    use proptest::prelude::*;
    use smallvec::smallvec;

    fn record(id: u32, min: [f64; 2], max: [f64; 2], level: u32) -> BlockRecord {
        BlockRecord::leaf(
            BlockId(id),
            BoundingBox::new([min[0], min[1], 0.0], [max[0], max[1], 1.0]),
            level,
        )
    }

    fn shape2d() -> BlockShape {
        BlockShape::new(2, [4, 4, 1], 1).unwrap()
    }

    fn build(records: Vec<BlockRecord>) -> Result<GeometryData, GeometryError> {
        GeometryData::new(shape2d(), records, &ResolveConfig::default())
    }

    /// Coarse block 0 on the left, fine blocks 1 (bottom) and 2 (top) on
    /// the right.
    fn coarse_fine() -> GeometryData {
        build(vec![
            record(0, [0.0, 0.0], [1.0, 1.0], 1),
            record(1, [1.0, 0.0], [1.5, 0.5], 2),
            record(2, [1.0, 0.5], [1.5, 1.0], 2),
        ])
        .unwrap()
    }

    fn assert_symmetric(geo: &GeometryData) {
        for block in geo.blocks() {
            for face in Face::all(geo.ndim()) {
                match block.neighbor(face) {
                    Neighbor::Same(n) => {
                        assert_eq!(
                            geo.neighbor(n, face.opposite()),
                            Some(Neighbor::Same(block.id)),
                            "block {} face {face}",
                            block.id
                        );
                    }
                    Neighbor::Finer(n) => {
                        assert_eq!(geo.neighbor(n, face.opposite()), Some(Neighbor::Coarser(block.id)));
                    }
                    Neighbor::Coarser(n) => {
                        let coarse = geo.block(n).unwrap();
                        assert!(matches!(coarse.neighbor(face.opposite()), Neighbor::Finer(_)));
                        assert_eq!(coarse.level + 1, block.level);
                    }
                    Neighbor::Boundary => {}
                }
            }
        }
    }

    #[test]
    fn two_adjacent_blocks_point_at_each_other() {
        let geo = build(vec![
            record(0, [0.0, 0.0], [1.0, 1.0], 1),
            record(1, [1.0, 0.0], [2.0, 1.0], 1),
        ])
        .unwrap();
        assert_eq!(geo.neighbor(BlockId(0), Face::XHigh), Some(Neighbor::Same(BlockId(1))));
        assert_eq!(geo.neighbor(BlockId(1), Face::XLow), Some(Neighbor::Same(BlockId(0))));
        assert_eq!(geo.neighbor(BlockId(0), Face::XLow), Some(Neighbor::Boundary));
        assert_eq!(geo.neighbor(BlockId(0), Face::YHigh), Some(Neighbor::Boundary));
        assert_eq!(geo.resolve_stats().same, 2);
        assert_eq!(geo.resolve_stats().interior_unmatched, 0);
    }

    #[test]
    fn coarse_fine_faces_resolve_across_levels() {
        let geo = coarse_fine();
        assert_eq!(geo.neighbor(BlockId(1), Face::XLow), Some(Neighbor::Coarser(BlockId(0))));
        assert_eq!(geo.neighbor(BlockId(2), Face::XLow), Some(Neighbor::Coarser(BlockId(0))));
        // equal overlap with both fine blocks: lowest id is representative
        assert_eq!(geo.neighbor(BlockId(0), Face::XHigh), Some(Neighbor::Finer(BlockId(1))));
        assert_eq!(geo.neighbor(BlockId(1), Face::YHigh), Some(Neighbor::Same(BlockId(2))));
        assert_symmetric(&geo);
    }

    #[test]
    fn representative_prefers_largest_overlap() {
        // fine block 2 overlaps the coarse face over [0.25, 1.0), block 1 over [0.0, 0.25)
        let geo = build(vec![
            record(0, [0.0, 0.0], [1.0, 1.0], 1),
            record(1, [1.0, -0.25], [1.5, 0.25], 2),
            record(2, [1.0, 0.25], [1.5, 0.75], 2),
        ])
        .unwrap();
        assert_eq!(geo.neighbor(BlockId(0), Face::XHigh), Some(Neighbor::Finer(BlockId(2))));
    }

    #[test]
    fn lone_coarsest_block_is_all_boundary() {
        let geo = build(vec![record(0, [0.0, 0.0], [1.0, 1.0], 1)]).unwrap();
        let block = geo.block(BlockId(0)).unwrap();
        assert!(block.neighbors.iter().all(|n| n.is_boundary()));
        assert_eq!(geo.resolve_stats().boundary, 4);
    }

    #[test]
    fn level_jump_of_two_is_unmatched_inside_domain() {
        let geo = build(vec![
            record(0, [0.0, 0.0], [1.0, 1.0], 1),
            record(1, [1.0, 0.0], [1.25, 0.25], 3),
        ])
        .unwrap();
        assert_eq!(geo.neighbor(BlockId(1), Face::XLow), Some(Neighbor::Boundary));
        assert!(geo.resolve_stats().interior_unmatched >= 1);
    }

    #[test]
    fn records_are_sorted_by_id() {
        let geo = build(vec![
            record(1, [1.0, 0.0], [2.0, 1.0], 1),
            record(0, [0.0, 0.0], [1.0, 1.0], 1),
        ])
        .unwrap();
        assert_eq!(geo.blocks()[0].bounds.min[0], 0.0);
        assert_eq!(geo.domain().max, [2.0, 1.0, 1.0]);
    }

    #[test]
    fn malformed_bounds_fail_construction() {
        let err = build(vec![record(0, [1.0, 0.0], [0.0, 1.0], 1)]).unwrap_err();
        assert!(matches!(err, GeometryError::MalformedBounds { axis: 0, .. }));
    }

    #[test]
    fn id_errors() {
        assert_eq!(build(vec![]).unwrap_err(), GeometryError::EmptyGeometry);
        let dup = build(vec![
            record(0, [0.0, 0.0], [1.0, 1.0], 1),
            record(0, [1.0, 0.0], [2.0, 1.0], 1),
        ]);
        assert_eq!(dup.unwrap_err(), GeometryError::DuplicateBlockId { id: BlockId(0) });
        let gap = build(vec![
            record(0, [0.0, 0.0], [1.0, 1.0], 1),
            record(2, [1.0, 0.0], [2.0, 1.0], 1),
        ]);
        assert_eq!(
            gap.unwrap_err(),
            GeometryError::NonContiguousIds {
                expected: BlockId(1),
                found: BlockId(2)
            }
        );
    }

    #[test]
    fn dangling_links_fail() {
        let mut r = record(0, [0.0, 0.0], [1.0, 1.0], 1);
        r.children = smallvec![BlockId(7)];
        assert_eq!(
            build(vec![r]).unwrap_err(),
            GeometryError::DanglingReference {
                block: BlockId(0),
                reference: BlockId(7)
            }
        );
    }

    #[test]
    fn parent_blocks_and_levels() {
        let mut parent = record(0, [0.0, 0.0], [1.0, 1.0], 1);
        parent.children = smallvec![BlockId(1), BlockId(2)];
        let mut a = record(1, [0.0, 0.0], [0.5, 1.0], 2);
        a.parent = Some(BlockId(0));
        a.tree_path = TreePath::from_slice(&[0]);
        let mut b = record(2, [0.5, 0.0], [1.0, 1.0], 2);
        b.parent = Some(BlockId(0));
        b.tree_path = TreePath::from_slice(&[1]);
        let geo = build(vec![parent, a, b]).unwrap();
        assert_eq!(geo.leaf_blocks().count(), 2);
        assert_eq!(geo.levels().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(geo.blocks_at_level(2).count(), 2);
        assert_eq!(geo.neighbor(BlockId(1), Face::XHigh), Some(Neighbor::Same(BlockId(2))));
    }

    #[test]
    fn mesh_coordinates_include_guards() {
        let geo = build(vec![record(0, [0.0, 0.0], [1.0, 2.0], 1)]).unwrap();
        let center = geo.mesh(Staggering::Center);
        assert_eq!(center.x().dim(), (1, 6));
        assert!((center.x()[[0, 0]] - -0.125).abs() < 1e-12);
        assert!((center.x()[[0, 1]] - 0.125).abs() < 1e-12);
        assert!((center.y()[[0, 1]] - 0.25).abs() < 1e-12);
        let left = geo.mesh(Staggering::Left);
        assert!((left.x()[[0, 1]] - 0.0).abs() < 1e-12);
        let right = geo.mesh(Staggering::Right);
        assert!((right.x()[[0, 4]] - 1.0).abs() < 1e-12);
        assert_eq!(center.z().dim(), (1, 1));
        assert_eq!(geo.spacing()[[0, 1]], 0.5);
    }

    proptest! {
        #[test]
        fn uniform_grids_resolve_symmetrically(nx in 1usize..5, ny in 1usize..5) {
            let mut records = Vec::new();
            for j in 0..ny {
                for i in 0..nx {
                    let id = (j * nx + i) as u32;
                    records.push(record(id, [i as f64, j as f64], [i as f64 + 1.0, j as f64 + 1.0], 1));
                }
            }
            let geo = build(records).unwrap();
            assert_symmetric(&geo);
            let expected_same = 2 * ((nx - 1) * ny + nx * (ny - 1));
            prop_assert_eq!(geo.resolve_stats().same, expected_same);
            prop_assert_eq!(geo.resolve_stats().interior_unmatched, 0);
        }
    }
}
