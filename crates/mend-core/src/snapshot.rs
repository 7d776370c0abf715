//! Captured blocks: one destroyed block, snapshotted and removed in one step.

use mend_world::{BlockPos, BlockRegistry, BlockState, WorldModel};

/// Restoration behavior resolved from the registry at capture time.
///
/// Stored with the snapshot so restoration never inspects the registry again;
/// the behavior an event captured under is the behavior it restores under.
#[derive(Clone, Copy, Debug)]
pub struct RestoreBehavior {
    /// A failed restore may be deferred and retried once instead of dropping
    /// the block as loot.
    pub delayable: bool,
}

/// A record of one destroyed block: identity, position, placement data, and
/// resolved behavior.
///
/// Creating a snapshot removes the block from the live world; the two are not
/// separable steps, which is what keeps a concurrently recorded event from
/// capturing the same position twice.
#[derive(Clone, Debug)]
pub struct CapturedBlock {
    state: BlockState,
    pos: BlockPos,
    behavior: RestoreBehavior,
    deferred: bool,
}

impl CapturedBlock {
    /// Snapshots the block at `pos` and removes it from the world.
    ///
    /// Returns `None` -- and leaves the world untouched -- when the position
    /// is already empty or the kind is unknown to the registry. Both are
    /// capture anomalies, skipped rather than raised.
    pub fn capture(
        world: &mut dyn WorldModel,
        pos: BlockPos,
        registry: &BlockRegistry,
    ) -> Option<CapturedBlock> {
        let state = world.state_at(pos)?;
        let Some(def) = registry.def_of(state.id) else {
            tracing::warn!(
                "unknown block kind {} at ({}, {}, {}); leaving in place",
                state.id.kind.0,
                pos.x,
                pos.y,
                pos.z
            );
            return None;
        };
        let behavior = RestoreBehavior {
            delayable: def.delayable,
        };
        world.remove_at(pos)?;
        Some(Self {
            state,
            pos,
            behavior,
            deferred: false,
        })
    }

    /// The captured position.
    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    /// The captured identity and placement data.
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// The behavior resolved at capture time.
    pub fn behavior(&self) -> RestoreBehavior {
        self.behavior
    }

    /// Whether this block already used its one deferred retry.
    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Consumes the single deferred retry.
    pub fn defer(&mut self) {
        self.deferred = true;
    }

    /// Attempts to place the block back exactly as captured.
    ///
    /// Returns `false` when the target position is now occupied; the world is
    /// left untouched in that case.
    pub fn restore(&self, world: &mut dyn WorldModel) -> bool {
        world.place_at(self.pos, self.state)
    }

    /// Places the block back unconditionally, overwriting any occupant.
    ///
    /// Used by the immediate-restore path, which must never leave its blocks
    /// missing.
    pub fn force_restore(&self, world: &mut dyn WorldModel) {
        world.force_place(self.pos, self.state);
    }

    /// Gives the block up as loot at its captured position.
    pub fn drop_loot(self, world: &mut dyn WorldModel) {
        world.drop_loot(self.pos, self.state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use mend_world::{BlockId, BlockKind, BlockPos};

    #[test]
    fn test_capture_removes_from_world() {
        let (registry, palette) = fixtures::palette_registry();
        let (mut world, wid) = fixtures::empty_world();
        let pos = BlockPos::new(0, 64, 0, wid);
        world.set(pos, fixtures::state(palette.stone));

        let captured = CapturedBlock::capture(&mut world, pos, &registry).unwrap();
        assert_eq!(captured.pos(), pos);
        assert_eq!(captured.state(), fixtures::state(palette.stone));
        assert_eq!(world.state_at(pos), None);
    }

    #[test]
    fn test_capture_of_empty_position_is_none() {
        let (registry, _palette) = fixtures::palette_registry();
        let (mut world, wid) = fixtures::empty_world();
        let pos = BlockPos::new(0, 64, 0, wid);
        assert!(CapturedBlock::capture(&mut world, pos, &registry).is_none());
    }

    #[test]
    fn test_capture_of_unknown_kind_leaves_block() {
        let (registry, _palette) = fixtures::palette_registry();
        let (mut world, wid) = fixtures::empty_world();
        let pos = BlockPos::new(0, 64, 0, wid);
        let bogus = BlockState::new(BlockId::new(BlockKind(999), 0));
        world.set(pos, bogus);

        assert!(CapturedBlock::capture(&mut world, pos, &registry).is_none());
        assert_eq!(world.state_at(pos), Some(bogus));
    }

    #[test]
    fn test_restore_round_trips_state() {
        let (registry, palette) = fixtures::palette_registry();
        let (mut world, wid) = fixtures::empty_world();
        let pos = BlockPos::new(3, 70, -2, wid);
        let state = fixtures::wall_state(palette.wall_torch, mend_world::Facing::East);
        world.set(pos, state);

        let captured = CapturedBlock::capture(&mut world, pos, &registry).unwrap();
        assert!(captured.restore(&mut world));
        assert_eq!(world.state_at(pos), Some(state));
    }

    #[test]
    fn test_restore_refuses_occupied_position() {
        let (registry, palette) = fixtures::palette_registry();
        let (mut world, wid) = fixtures::empty_world();
        let pos = BlockPos::new(0, 64, 0, wid);
        world.set(pos, fixtures::state(palette.stone));

        let captured = CapturedBlock::capture(&mut world, pos, &registry).unwrap();
        world.set(pos, fixtures::state(palette.dirt));

        assert!(!captured.restore(&mut world));
        assert_eq!(world.state_at(pos), Some(fixtures::state(palette.dirt)));
    }

    #[test]
    fn test_force_restore_overwrites() {
        let (registry, palette) = fixtures::palette_registry();
        let (mut world, wid) = fixtures::empty_world();
        let pos = BlockPos::new(0, 64, 0, wid);
        world.set(pos, fixtures::state(palette.tnt));

        let captured = CapturedBlock::capture(&mut world, pos, &registry).unwrap();
        world.set(pos, fixtures::state(palette.dirt));

        captured.force_restore(&mut world);
        assert_eq!(world.state_at(pos), Some(fixtures::state(palette.tnt)));
    }

    #[test]
    fn test_behavior_resolved_at_capture() {
        let (registry, palette) = fixtures::palette_registry();
        let (mut world, wid) = fixtures::empty_world();
        let stone_pos = BlockPos::new(0, 64, 0, wid);
        let torch_pos = BlockPos::new(1, 64, 0, wid);
        world.set(stone_pos, fixtures::state(palette.stone));
        world.set(torch_pos, fixtures::state(palette.torch));

        let stone = CapturedBlock::capture(&mut world, stone_pos, &registry).unwrap();
        let torch = CapturedBlock::capture(&mut world, torch_pos, &registry).unwrap();
        assert!(stone.behavior().delayable);
        assert!(!torch.behavior().delayable);
    }

    #[test]
    fn test_defer_is_single_use_marker() {
        let (registry, palette) = fixtures::palette_registry();
        let (mut world, wid) = fixtures::empty_world();
        let pos = BlockPos::new(0, 64, 0, wid);
        world.set(pos, fixtures::state(palette.stone));

        let mut captured = CapturedBlock::capture(&mut world, pos, &registry).unwrap();
        assert!(!captured.is_deferred());
        captured.defer();
        assert!(captured.is_deferred());
    }
}
