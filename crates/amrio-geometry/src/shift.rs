//! Block-id shifting for timesteps assembled from several sources.
//!
//! Each source enumerates its blocks from zero. Concatenating sources moves
//! every id, parent link and child link of a source by the number of
//! blocks already taken from earlier sources.

use crate::block::BlockRecord;

/// Move every id and link in `records` by `offset`.
pub fn shift_records(records: &mut [BlockRecord], offset: u32) {
    if offset == 0 {
        return;
    }
    for record in records {
        record.id = record.id.shifted(offset);
        record.parent = record.parent.map(|p| p.shifted(offset));
        for child in &mut record.children {
            *child = child.shifted(offset);
        }
    }
}

/// Concatenate independently enumerated sources into one record list.
///
/// Returns the merged records and the block offset at which each source
/// starts, in source order.
pub fn concat_sources<I>(sources: I) -> (Vec<BlockRecord>, Vec<u32>)
where
    I: IntoIterator<Item = Vec<BlockRecord>>,
{
    let mut merged = Vec::new();
    let mut offsets = Vec::new();
    for mut source in sources {
        let offset = merged.len() as u32;
        shift_records(&mut source, offset);
        offsets.push(offset);
        merged.append(&mut source);
    }
    (merged, offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::TreePath;
    use crate::bounds::BoundingBox;
    use amrio_core::BlockId;
    use smallvec::smallvec;

    fn family() -> Vec<BlockRecord> {
        let bounds = BoundingBox::new([0.0; 3], [1.0; 3]);
        let mut parent = BlockRecord::leaf(BlockId(0), bounds, 1);
        parent.children = smallvec![BlockId(1)];
        let mut child = BlockRecord::leaf(BlockId(1), bounds, 2);
        child.parent = Some(BlockId(0));
        child.tree_path = TreePath::from_slice(&[0]);
        vec![parent, child]
    }

    #[test]
    fn offsets_are_running_block_counts() {
        let (merged, offsets) = concat_sources([family(), family(), family()]);
        assert_eq!(offsets, vec![0, 2, 4]);
        let ids: Vec<u32> = merged.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn links_move_with_ids() {
        let (merged, _) = concat_sources([family(), family()]);
        assert_eq!(merged[2].children.as_slice(), &[BlockId(3)]);
        assert_eq!(merged[3].parent, Some(BlockId(2)));
        assert_eq!(merged[3].tree_path, TreePath::from_slice(&[0]));
    }
}
