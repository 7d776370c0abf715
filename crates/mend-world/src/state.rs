//! Block identity and placement data.

use serde::{Deserialize, Serialize};

use crate::registry::BlockKind;

/// Identifies what occupies a position: material kind plus sub-state variant.
///
/// The variant distinguishes sub-states of the same kind (wood species,
/// growth stage). Blacklist lookups match on kind, optionally narrowed to a
/// variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId {
    /// The material kind, assigned by the [`BlockRegistry`](crate::BlockRegistry).
    pub kind: BlockKind,
    /// Sub-state within the kind.
    pub variant: u8,
}

impl BlockId {
    /// Air: the empty block.
    pub const AIR: BlockId = BlockId {
        kind: BlockKind(0),
        variant: 0,
    };

    /// Creates a new block id.
    pub fn new(kind: BlockKind, variant: u8) -> Self {
        Self { kind, variant }
    }

    /// Returns `true` if this is the air id (kind 0).
    pub fn is_air(self) -> bool {
        self.kind.0 == 0
    }
}

/// A cardinal facing decoded from an [`Orientation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Down,
    Up,
    North,
    South,
    East,
    West,
}

impl Facing {
    /// The opposite facing.
    pub fn opposite(self) -> Facing {
        match self {
            Facing::Down => Facing::Up,
            Facing::Up => Facing::Down,
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::East => Facing::West,
            Facing::West => Facing::East,
        }
    }

    /// Unit offset `(dx, dy, dz)` of the neighboring position in this
    /// direction.
    pub fn unit_offset(self) -> (i32, i32, i32) {
        match self {
            Facing::Down => (0, -1, 0),
            Facing::Up => (0, 1, 0),
            Facing::North => (0, 0, -1),
            Facing::South => (0, 0, 1),
            Facing::East => (1, 0, 0),
            Facing::West => (-1, 0, 0),
        }
    }
}

/// Opaque placement byte captured with a block.
///
/// Carries everything needed to re-place a block exactly as it stood. The
/// low three bits encode a [`Facing`] for wall-attached kinds; the remaining
/// bits are free for host-specific placement data and are round-tripped
/// untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Orientation(pub u8);

impl Orientation {
    /// Encodes a facing into the low bits.
    pub fn from_facing(facing: Facing) -> Self {
        let bits = match facing {
            Facing::Down => 0,
            Facing::Up => 1,
            Facing::North => 2,
            Facing::South => 3,
            Facing::East => 4,
            Facing::West => 5,
        };
        Orientation(bits)
    }

    /// Decodes the facing from the low three bits.
    ///
    /// Unknown bit patterns decode to [`Facing::Down`] (treat garbage as the
    /// commonest attachment).
    pub fn facing(self) -> Facing {
        match self.0 & 0b111 {
            1 => Facing::Up,
            2 => Facing::North,
            3 => Facing::South,
            4 => Facing::East,
            5 => Facing::West,
            _ => Facing::Down,
        }
    }
}

/// Everything the world stores at an occupied position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    /// What the block is.
    pub id: BlockId,
    /// How it is placed.
    pub orientation: Orientation,
}

impl BlockState {
    /// Creates a block state with default orientation.
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            orientation: Orientation::default(),
        }
    }

    /// Creates a block state with an explicit orientation.
    pub fn oriented(id: BlockId, orientation: Orientation) -> Self {
        Self { id, orientation }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
