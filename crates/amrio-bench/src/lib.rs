//! Benchmark profiles for amrio neighbor resolution and guard fill.
//!
//! - [`reference_grid`]: 16x16 uniform level-1 blocks (256 blocks)
//! - [`refined_grid`]: `n`x`n` coarse blocks with the upper half in x
//!   refined once, so every row has a coarse/fine interface

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use amrio_geometry::{BlockRecord, GeometryData, ResolveConfig};
use amrio_test_utils::fixtures::{record, square_shape, uniform_grid_records};

/// 16x16 uniform grid.
pub fn reference_grid() -> Vec<BlockRecord> {
    uniform_grid_records(16, 16)
}

/// `n`x`n` unit blocks; columns `n/2..n` are split into four level-2
/// blocks each.
pub fn refined_grid(n: usize) -> Vec<BlockRecord> {
    let mut records = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let (x, y) = (i as f64, j as f64);
            if i < n / 2 {
                let id = records.len() as u32;
                records.push(record(id, [x, y], [x + 1.0, y + 1.0], 1));
            } else {
                for (dx, dy) in [(0.0, 0.0), (0.5, 0.0), (0.0, 0.5), (0.5, 0.5)] {
                    let id = records.len() as u32;
                    let min = [x + dx, y + dy];
                    records.push(record(id, min, [min[0] + 0.5, min[1] + 0.5], 2));
                }
            }
        }
    }
    records
}

/// Resolve `records` on the 4x4-cell fixture shape.
pub fn build(records: Vec<BlockRecord>) -> GeometryData {
    GeometryData::new(square_shape(), records, &ResolveConfig::default())
        .expect("benchmark grids are valid")
}
