//! Property tests for merging: split-merge round-trip, guard-fill
//! idempotence, and neighbor symmetry of merged geometry.

use amrio_core::{OnDuplicate, Time};
use amrio_geometry::{Face, Neighbor};
use amrio_sim::{SimulationConfig, SimulationData};
use amrio_test_utils::fixtures::{coarse_fine_snapshot, two_block_snapshot, uniform_snapshot};
use proptest::prelude::*;

fn merged(times: &[f64]) -> SimulationData {
    SimulationData::from_snapshots(
        times.iter().map(|&t| two_block_snapshot(t)),
        SimulationConfig::default(),
    )
    .unwrap()
}

fn distinct_times() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::btree_set(0u32..1000, 1..12)
        .prop_map(|set| set.into_iter().map(|n| n as f64 * 0.25).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn halves_merge_to_the_whole(times in distinct_times(), split in 0usize..12) {
        let split = split.min(times.len());
        let whole = merged(&times);

        let mut front = merged(&times[..split]);
        front.extend(merged(&times[split..]), OnDuplicate::Reject).unwrap();
        prop_assert_eq!(&front, &whole);

        // merging in the other direction lands in the same order
        let mut back = merged(&times[split..]);
        back.extend(merged(&times[..split]), OnDuplicate::Reject).unwrap();
        prop_assert_eq!(&back, &whole);
    }

    #[test]
    fn overlapping_merge_is_rejected_whole(times in distinct_times()) {
        let mut data = merged(&times);
        let before = data.clone();
        let overlap = merged(&times[..1]);
        prop_assert!(data.extend(overlap, OnDuplicate::Reject).is_err());
        prop_assert_eq!(&data, &before);
    }

    #[test]
    fn uniform_grids_resolve_symmetrically(nx in 1usize..5, ny in 1usize..5) {
        let data = SimulationData::from_snapshots(
            [uniform_snapshot(nx, ny, 0.0)],
            SimulationConfig::default(),
        )
        .unwrap();
        let geo = data.geometry_at(Time(0.0)).unwrap();
        for block in geo.blocks() {
            for face in Face::all(2) {
                match block.neighbor(face) {
                    Neighbor::Same(n) => {
                        prop_assert_eq!(geo.neighbor(n, face.opposite()), Some(Neighbor::Same(block.id)));
                    }
                    Neighbor::Boundary => {}
                    other => prop_assert!(false, "unexpected {:?} on a uniform grid", other),
                }
            }
        }
    }
}

#[test]
fn refilling_merged_guards_changes_nothing() {
    for snapshot in [two_block_snapshot(1.0), coarse_fine_snapshot(1.0)] {
        let data = SimulationData::from_snapshots([snapshot], SimulationConfig::default()).unwrap();
        let geo = data.geometry_at(Time(1.0)).unwrap();
        let filled = data.fields().get(Time(1.0)).unwrap();
        let mut again = filled.clone();
        again.fill_guards(geo.guard_plan()).unwrap();
        assert_eq!(&again, filled);
    }
}

#[test]
fn coarse_fine_neighbors_are_consistent_across_levels() {
    let data = SimulationData::from_snapshots([coarse_fine_snapshot(0.0)], SimulationConfig::default()).unwrap();
    let geo = data.geometry_at(Time(0.0)).unwrap();
    for block in geo.blocks() {
        for face in Face::all(2) {
            match block.neighbor(face) {
                Neighbor::Coarser(n) => {
                    let coarse = geo.block(n).unwrap();
                    assert_eq!(coarse.level + 1, block.level);
                    assert!(matches!(coarse.neighbor(face.opposite()), Neighbor::Finer(_)));
                }
                Neighbor::Finer(n) => {
                    let fine = geo.block(n).unwrap();
                    assert_eq!(fine.level, block.level + 1);
                    assert_eq!(fine.neighbor(face.opposite()), Neighbor::Coarser(block.id));
                }
                _ => {}
            }
        }
    }
}
