//! Restoration ordering: nearest rubble reappears first.

use mend_world::BlockPos;

use crate::snapshot::CapturedBlock;

/// Sorts captured blocks by ascending distance from the event origin.
///
/// The sort is stable, so equidistant blocks keep their capture order --
/// which already places supports ahead of their dependents.
pub fn sort_nearest_first(blocks: &mut [CapturedBlock], origin: BlockPos) {
    blocks.sort_by(|a, b| {
        a.pos()
            .distance(origin)
            .total_cmp(&b.pos().distance(origin))
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::snapshot::CapturedBlock;
    use mend_world::BlockPos;

    fn capture_at(positions: &[(i32, i32, i32)]) -> (Vec<CapturedBlock>, BlockPos) {
        let (registry, palette) = fixtures::palette_registry();
        let (mut world, wid) = fixtures::empty_world();
        let origin = BlockPos::new(0, 64, 0, wid);
        let mut blocks = Vec::new();
        for &(x, y, z) in positions {
            let pos = BlockPos::new(x, y, z, wid);
            world.set(pos, fixtures::state(palette.stone));
            blocks.push(CapturedBlock::capture(&mut world, pos, &registry).unwrap());
        }
        (blocks, origin)
    }

    #[test]
    fn test_nearest_first() {
        let (mut blocks, origin) = capture_at(&[(5, 64, 0), (1, 64, 0), (3, 64, 0)]);
        sort_nearest_first(&mut blocks, origin);
        let xs: Vec<i32> = blocks.iter().map(|b| b.pos().x).collect();
        assert_eq!(xs, vec![1, 3, 5]);
    }

    #[test]
    fn test_ties_keep_capture_order() {
        // Two blocks at the same distance on opposite sides of the origin.
        let (mut blocks, origin) = capture_at(&[(2, 64, 0), (-2, 64, 0), (1, 64, 0)]);
        sort_nearest_first(&mut blocks, origin);
        let xs: Vec<i32> = blocks.iter().map(|b| b.pos().x).collect();
        // (1,..) is closest; the equidistant pair stays in capture order.
        assert_eq!(xs, vec![1, 2, -2]);
    }

    #[test]
    fn test_empty_and_single_are_noops() {
        let (mut blocks, origin) = capture_at(&[]);
        sort_nearest_first(&mut blocks, origin);
        assert!(blocks.is_empty());

        let (mut blocks, origin) = capture_at(&[(4, 64, 4)]);
        sort_nearest_first(&mut blocks, origin);
        assert_eq!(blocks.len(), 1);
    }
}
