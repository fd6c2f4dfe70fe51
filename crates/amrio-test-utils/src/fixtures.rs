//! Synthetic snapshots.
//!
//! Every builder is deterministic. Field values encode their position so
//! tests can tell which block and cell a guard value came from:
//!
//! - `"dens"`: `block * 100 + y * 10 + x + t` over interior cells.
//! - `"pres"`: the constant `t`.

use amrio_core::{BlockId, ScalarValue, Time};
use amrio_geometry::{BlockRecord, BlockShape, BoundingBox, TreePath};
use amrio_sim::{DecodedSnapshot, ParameterGroup, ScalarData, SnapshotPart, StaticData};
use indexmap::IndexMap;
use ndarray::Array4;

/// 2D blocks of 4×4 cells with one guard layer.
pub fn square_shape() -> BlockShape {
    BlockShape::new(2, [4, 4, 1], 1).expect("4x4 cells with one guard layer")
}

/// A 2D block record spanning `min..max` in x and y.
pub fn record(id: u32, min: [f64; 2], max: [f64; 2], level: u32) -> BlockRecord {
    BlockRecord::leaf(
        BlockId(id),
        BoundingBox::new([min[0], min[1], 0.0], [max[0], max[1], 1.0]),
        level,
    )
}

/// Two level-1 unit blocks side by side along x.
pub fn two_block_records() -> Vec<BlockRecord> {
    vec![
        record(0, [0.0, 0.0], [1.0, 1.0], 1),
        record(1, [1.0, 0.0], [2.0, 1.0], 1),
    ]
}

/// One coarse unit block with two fine blocks on its `+x` face.
///
/// The fine blocks are children of an otherwise absent parent, so only
/// the tree paths link them.
pub fn coarse_fine_records() -> Vec<BlockRecord> {
    let mut records = vec![
        record(0, [0.0, 0.0], [1.0, 1.0], 1),
        record(1, [1.0, 0.0], [1.5, 0.5], 2),
        record(2, [1.0, 0.5], [1.5, 1.0], 2),
    ];
    records[1].tree_path = TreePath::root().child(1).child(0);
    records[2].tree_path = TreePath::root().child(1).child(2);
    records
}

/// An `nx × ny` grid of level-1 unit blocks, ids row-major.
pub fn uniform_grid_records(nx: usize, ny: usize) -> Vec<BlockRecord> {
    let mut records = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let id = (j * nx + i) as u32;
            let (x, y) = (i as f64, j as f64);
            records.push(record(id, [x, y], [x + 1.0, y + 1.0], 1));
        }
    }
    records
}

/// Interior-shaped field payloads for `blocks` blocks of [`square_shape`].
pub fn fields(blocks: usize, t: f64) -> IndexMap<String, Array4<f64>> {
    let dens = Array4::from_shape_fn((blocks, 1, 4, 4), |(b, _, y, x)| {
        (b * 100 + y * 10 + x) as f64 + t
    });
    let pres = Array4::from_elem((blocks, 1, 4, 4), t);
    IndexMap::from([("dens".to_string(), dens), ("pres".to_string(), pres)])
}

/// Scalars with time, step size, and step counter.
pub fn scalars(t: f64) -> ScalarData {
    ScalarData::new()
        .with(ScalarData::TIME, t)
        .with(ScalarData::DT, 0.5)
        .with(ScalarData::STEP, (t * 2.0) as i64)
}

/// Run parameters shared by every fixture.
pub fn statics() -> StaticData {
    StaticData::new()
        .with_group(
            "real runtime parameters",
            [("cfl", ScalarValue::Real(0.4)), ("ins invReynolds", ScalarValue::Real(1e-3))]
                .into_iter()
                .collect(),
        )
        .with_group(
            "string runtime parameters",
            ParameterGroup::new().with("run comment", "lid driven cavity"),
        )
}

/// A single-part snapshot of `records` on [`square_shape`].
pub fn snapshot(t: f64, records: Vec<BlockRecord>) -> DecodedSnapshot {
    let n = records.len();
    DecodedSnapshot::single(
        Time(t),
        square_shape(),
        SnapshotPart {
            blocks: records,
            fields: fields(n, t),
        },
        scalars(t),
        statics(),
    )
}

/// [`two_block_records`] at time `t`.
pub fn two_block_snapshot(t: f64) -> DecodedSnapshot {
    snapshot(t, two_block_records())
}

/// [`coarse_fine_records`] at time `t`.
pub fn coarse_fine_snapshot(t: f64) -> DecodedSnapshot {
    snapshot(t, coarse_fine_records())
}

/// [`uniform_grid_records`] at time `t`.
pub fn uniform_snapshot(nx: usize, ny: usize, t: f64) -> DecodedSnapshot {
    snapshot(t, uniform_grid_records(nx, ny))
}

// ── 3D ──────────────────────────────────────────────────────────

/// 3D blocks of 2×2×2 cells with one guard layer.
pub fn cube_shape() -> BlockShape {
    BlockShape::new(3, [2, 2, 2], 1).expect("2x2x2 cells with one guard layer")
}

/// A 2×2×2 arrangement of level-1 unit cubes, id `z * 4 + y * 2 + x`.
pub fn cube_of_eight_records() -> Vec<BlockRecord> {
    (0..8u32)
        .map(|id| {
            let min = [(id % 2) as f64, ((id / 2) % 2) as f64, (id / 4) as f64];
            let max = min.map(|m| m + 1.0);
            BlockRecord::leaf(BlockId(id), BoundingBox::new(min, max), 1)
        })
        .collect()
}

/// [`cube_of_eight_records`] at time `t`; `"dens"` is
/// `block * 1000 + z * 100 + y * 10 + x + t` over interior cells.
pub fn cube_snapshot(t: f64) -> DecodedSnapshot {
    let records = cube_of_eight_records();
    let n = records.len();
    let dens = Array4::from_shape_fn((n, 2, 2, 2), |(b, z, y, x)| {
        (b * 1000 + z * 100 + y * 10 + x) as f64 + t
    });
    DecodedSnapshot::single(
        Time(t),
        cube_shape(),
        SnapshotPart {
            blocks: records,
            fields: IndexMap::from([("dens".to_string(), dens)]),
        },
        scalars(t),
        statics(),
    )
}
