//! Block type registry: maps compact [`BlockKind`] values to restoration metadata.
//!
//! The registry is built once at startup and frozen. Air is always kind 0 so
//! that an absent map entry and "nothing to restore" mean the same thing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::BlockId;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier for a block material kind (2 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockKind(pub u16);

/// How a block kind is supported by its surroundings.
///
/// Anything other than `FreeStanding` makes the kind *dependent*: its support
/// position must be captured (and therefore restored) before the block
/// itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportKind {
    /// Needs no neighbor (stone, dirt, planks).
    FreeStanding,
    /// Stands on the block below (standing torch, sapling, rail).
    OnFloor,
    /// Mounted on the block behind its facing (wall torch, ladder, lever).
    OnWall,
    /// Hangs from the block above (lantern, vine tip).
    Hanging,
}

/// Full restoration descriptor for a block kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockTypeDef {
    /// Human-readable name (e.g. "stone", "wall_torch").
    pub name: String,
    /// Whether the block occludes the space it occupies.
    pub solid: bool,
    /// Support requirement; drives the dependency resolver.
    pub support: SupportKind,
    /// Chain-reaction-sensitive (detonates when destroyed, e.g. TNT).
    pub explosive: bool,
    /// Eligible for the probabilistic collateral scan around an event.
    pub collateral: bool,
    /// Whether a failed restore may be deferred and retried once instead of
    /// dropping the block as loot.
    pub delayable: bool,
}

impl BlockTypeDef {
    /// Returns `true` if this kind requires a support neighbor.
    pub fn is_dependent(&self) -> bool {
        self.support != SupportKind::FreeStanding
    }
}

/// Errors that can occur during block type registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A kind with the same name has already been registered.
    #[error("duplicate block kind name: {0}")]
    DuplicateName(String),
    /// All 65 535 user-defined slots have been consumed.
    #[error("block registry is full (max 65536 kinds)")]
    RegistryFull,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps [`BlockKind`] → [`BlockTypeDef`] with O(1) lookup by index and
/// O(1) reverse lookup by name.
pub struct BlockRegistry {
    /// Dense array where `index == BlockKind.0`.
    types: Vec<BlockTypeDef>,
    /// Reverse lookup: name → kind.
    name_to_kind: HashMap<String, BlockKind>,
}

impl BlockRegistry {
    /// Creates a new registry with air pre-registered as kind 0.
    pub fn new() -> Self {
        let air = BlockTypeDef {
            name: "air".to_string(),
            solid: false,
            support: SupportKind::FreeStanding,
            explosive: false,
            collateral: false,
            delayable: false,
        };

        let mut name_to_kind = HashMap::new();
        name_to_kind.insert("air".to_string(), BlockKind(0));

        Self {
            types: vec![air],
            name_to_kind,
        }
    }

    /// Registers a new block kind and returns its assigned id.
    ///
    /// Kinds are assigned sequentially starting from 1 (0 is air).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a kind with the same name
    /// already exists, or [`RegistryError::RegistryFull`] if all 65 536 slots
    /// are consumed.
    pub fn register(&mut self, def: BlockTypeDef) -> Result<BlockKind, RegistryError> {
        if self.name_to_kind.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.types.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }

        let kind = BlockKind(self.types.len() as u16);
        self.name_to_kind.insert(def.name.clone(), kind);
        self.types.push(def);
        Ok(kind)
    }

    /// Returns the definition for a given kind.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is out of range — this indicates a programming error
    /// since kinds are only produced by the registry itself.
    pub fn get(&self, kind: BlockKind) -> &BlockTypeDef {
        &self.types[kind.0 as usize]
    }

    /// Returns the definition behind a block id, or `None` for unknown kinds.
    ///
    /// The safe variant used on states read back from a world model, where an
    /// unknown kind is a host anomaly to skip rather than a crash.
    pub fn def_of(&self, id: BlockId) -> Option<&BlockTypeDef> {
        self.types.get(id.kind.0 as usize)
    }

    /// Returns the kind for a named block type, or `None` if not found.
    pub fn lookup_by_name(&self, name: &str) -> Option<BlockKind> {
        self.name_to_kind.get(name).copied()
    }

    /// Returns `true` if the given kind requires a support neighbor.
    ///
    /// Unknown kinds are treated as free-standing.
    pub fn is_dependent(&self, kind: BlockKind) -> bool {
        self.types
            .get(kind.0 as usize)
            .is_some_and(BlockTypeDef::is_dependent)
    }

    /// Returns the total number of registered kinds (including air).
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.types.len() <= 1
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
