//! Block positions used as map/set keys throughout the healing engine.

use serde::{Deserialize, Serialize};

/// Identifies a world (dimension) hosted by the world model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// A discretized block position within a world.
///
/// Two positions are equal when all three coordinates and the world id
/// match. Immutable once constructed; every capture/dedup map is keyed by
/// this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    /// Block-grid X coordinate.
    pub x: i32,
    /// Block-grid Y coordinate (height axis).
    pub y: i32,
    /// Block-grid Z coordinate.
    pub z: i32,
    /// The world this position belongs to.
    pub world: WorldId,
}

impl BlockPos {
    /// Creates a new block position.
    pub fn new(x: i32, y: i32, z: i32, world: WorldId) -> Self {
        Self { x, y, z, world }
    }

    /// Returns the position offset by `(dx, dy, dz)`.
    ///
    /// Typically called with unit offsets (e.g. `(0, -1, 0)` for the block
    /// below). The `world` field is preserved.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
            world: self.world,
        }
    }

    /// Euclidean distance to another position.
    ///
    /// The world id is ignored; callers never compare positions across
    /// worlds.
    pub fn distance(self, other: BlockPos) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        let dz = f64::from(self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32, z: i32) -> BlockPos {
        BlockPos::new(x, y, z, WorldId(0))
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(pos(1, 2, 3), pos(1, 2, 3));
        assert_ne!(pos(1, 2, 3), pos(1, 2, 4));
        assert_ne!(pos(1, 2, 3), BlockPos::new(1, 2, 3, WorldId(1)));
    }

    #[test]
    fn test_usable_as_map_key() {
        use rustc_hash::FxHashSet;
        let mut set = FxHashSet::default();
        assert!(set.insert(pos(0, 64, 0)));
        assert!(!set.insert(pos(0, 64, 0)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_offset_preserves_world() {
        let p = BlockPos::new(5, 60, -5, WorldId(3));
        let q = p.offset(0, -1, 0);
        assert_eq!(q, BlockPos::new(5, 59, -5, WorldId(3)));
    }

    #[test]
    fn test_distance() {
        assert_eq!(pos(0, 0, 0).distance(pos(3, 4, 0)), 5.0);
        assert_eq!(pos(7, 7, 7).distance(pos(7, 7, 7)), 0.0);
    }
}
