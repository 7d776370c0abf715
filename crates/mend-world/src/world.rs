//! The world model contract, and an in-memory grid world for tests and demos.
//!
//! The healing engine never owns terrain. It reads and writes through
//! [`WorldModel`], which a host implements over its own storage. [`GridWorld`]
//! is the reference implementation: a flat position-keyed map, one authority
//! for which blocks exist.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::pos::{BlockPos, WorldId};
use crate::state::BlockState;

/// Host-side world access consumed by the healing engine.
///
/// Air is modeled as absence: `state_at` returns `None` for empty positions.
/// Implementations are expected to be cheap per call; the capture pipeline
/// performs one lookup per visited position.
pub trait WorldModel {
    /// Returns the state at `pos`, or `None` if the position is empty.
    fn state_at(&self, pos: BlockPos) -> Option<BlockState>;

    /// Removes and returns the state at `pos`.
    ///
    /// Returns `None` if the position was already empty.
    fn remove_at(&mut self, pos: BlockPos) -> Option<BlockState>;

    /// Places `state` at `pos` if the position is empty.
    ///
    /// Returns `false` (and leaves the world untouched) when the position is
    /// occupied.
    fn place_at(&mut self, pos: BlockPos, state: BlockState) -> bool;

    /// Places `state` at `pos` unconditionally, overwriting any occupant.
    fn force_place(&mut self, pos: BlockPos, state: BlockState);

    /// Inclusive minimum and exclusive maximum build height of a world.
    fn height_bounds(&self, world: WorldId) -> (i32, i32);

    /// Returns `true` if the position carries a protection marker.
    fn is_protected(&self, pos: BlockPos) -> bool;

    /// Spawns the block as a loose item at `pos` instead of placing it.
    fn drop_loot(&mut self, pos: BlockPos, state: BlockState);

    /// The configured name of a world, used for per-world policy lookup.
    fn world_name(&self, world: WorldId) -> &str;
}

struct WorldDef {
    name: String,
    min_y: i32,
    max_y: i32,
}

/// In-memory [`WorldModel`] backed by an
/// [`FxHashMap`](rustc_hash::FxHashMap) keyed by [`BlockPos`].
///
/// Records loot drops instead of spawning entities, so tests can assert on
/// what was dropped and what never was.
pub struct GridWorld {
    blocks: FxHashMap<BlockPos, BlockState>,
    worlds: Vec<WorldDef>,
    protected: FxHashSet<BlockPos>,
    loot: Vec<(BlockPos, BlockState)>,
}

impl GridWorld {
    /// Creates an empty grid world with no worlds registered.
    pub fn new() -> Self {
        Self {
            blocks: FxHashMap::default(),
            worlds: Vec::new(),
            protected: FxHashSet::default(),
            loot: Vec::new(),
        }
    }

    /// Registers a world with the given name and build-height bounds.
    ///
    /// Returns the id to use in [`BlockPos::world`].
    pub fn add_world(&mut self, name: &str, min_y: i32, max_y: i32) -> WorldId {
        let id = WorldId(self.worlds.len() as u32);
        self.worlds.push(WorldDef {
            name: name.to_string(),
            min_y,
            max_y,
        });
        id
    }

    /// Authors a block directly, overwriting any occupant.
    pub fn set(&mut self, pos: BlockPos, state: BlockState) {
        self.blocks.insert(pos, state);
    }

    /// Marks a position as protected from healing-by-timer.
    pub fn mark_protected(&mut self, pos: BlockPos) {
        self.protected.insert(pos);
    }

    /// Everything dropped as loot so far, in drop order.
    pub fn loot(&self) -> &[(BlockPos, BlockState)] {
        &self.loot
    }

    /// Number of occupied positions across all worlds.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn world_def(&self, world: WorldId) -> &WorldDef {
        // Ids are only produced by add_world; out of range is a programming
        // error, same as an unknown registry kind.
        &self.worlds[world.0 as usize]
    }
}

impl WorldModel for GridWorld {
    fn state_at(&self, pos: BlockPos) -> Option<BlockState> {
        self.blocks.get(&pos).copied()
    }

    fn remove_at(&mut self, pos: BlockPos) -> Option<BlockState> {
        self.blocks.remove(&pos)
    }

    fn place_at(&mut self, pos: BlockPos, state: BlockState) -> bool {
        if self.blocks.contains_key(&pos) {
            return false;
        }
        self.blocks.insert(pos, state);
        true
    }

    fn force_place(&mut self, pos: BlockPos, state: BlockState) {
        self.blocks.insert(pos, state);
    }

    fn height_bounds(&self, world: WorldId) -> (i32, i32) {
        let def = self.world_def(world);
        (def.min_y, def.max_y)
    }

    fn is_protected(&self, pos: BlockPos) -> bool {
        self.protected.contains(&pos)
    }

    fn drop_loot(&mut self, pos: BlockPos, state: BlockState) {
        tracing::debug!("dropping block at ({}, {}, {}) as loot", pos.x, pos.y, pos.z);
        self.loot.push((pos, state));
    }

    fn world_name(&self, world: WorldId) -> &str {
        &self.world_def(world).name
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BlockKind;
    use crate::state::BlockId;

    fn stone() -> BlockState {
        BlockState::new(BlockId::new(BlockKind(1), 0))
    }

    fn dirt() -> BlockState {
        BlockState::new(BlockId::new(BlockKind(2), 0))
    }

    fn world_with_one() -> (GridWorld, WorldId) {
        let mut w = GridWorld::new();
        let id = w.add_world("overworld", 0, 256);
        (w, id)
    }

    #[test]
    fn test_set_then_state_at() {
        let (mut w, id) = world_with_one();
        let p = BlockPos::new(1, 64, 1, id);
        w.set(p, stone());
        assert_eq!(w.state_at(p), Some(stone()));
        assert_eq!(w.state_at(p.offset(1, 0, 0)), None);
    }

    #[test]
    fn test_remove_empties_position() {
        let (mut w, id) = world_with_one();
        let p = BlockPos::new(0, 10, 0, id);
        w.set(p, stone());
        assert_eq!(w.remove_at(p), Some(stone()));
        assert_eq!(w.remove_at(p), None);
        assert_eq!(w.state_at(p), None);
    }

    #[test]
    fn test_place_at_refuses_occupied() {
        let (mut w, id) = world_with_one();
        let p = BlockPos::new(0, 10, 0, id);
        assert!(w.place_at(p, stone()));
        assert!(!w.place_at(p, dirt()));
        assert_eq!(w.state_at(p), Some(stone()));
    }

    #[test]
    fn test_force_place_overwrites() {
        let (mut w, id) = world_with_one();
        let p = BlockPos::new(0, 10, 0, id);
        w.set(p, stone());
        w.force_place(p, dirt());
        assert_eq!(w.state_at(p), Some(dirt()));
    }

    #[test]
    fn test_protected_markers() {
        let (mut w, id) = world_with_one();
        let p = BlockPos::new(3, 3, 3, id);
        assert!(!w.is_protected(p));
        w.mark_protected(p);
        assert!(w.is_protected(p));
    }

    #[test]
    fn test_loot_record() {
        let (mut w, id) = world_with_one();
        let p = BlockPos::new(0, 5, 0, id);
        w.drop_loot(p, stone());
        assert_eq!(w.loot(), &[(p, stone())]);
    }

    #[test]
    fn test_world_names_and_bounds() {
        let mut w = GridWorld::new();
        let a = w.add_world("overworld", 0, 256);
        let b = w.add_world("nether", -64, 128);
        assert_eq!(w.world_name(a), "overworld");
        assert_eq!(w.world_name(b), "nether");
        assert_eq!(w.height_bounds(b), (-64, 128));
    }
}
