//! World model contract, block identity types, and the block-type registry.

pub mod pos;
pub mod registry;
pub mod state;
pub mod world;

pub use pos::{BlockPos, WorldId};
pub use registry::{BlockKind, BlockRegistry, BlockTypeDef, RegistryError, SupportKind};
pub use state::{BlockId, BlockState, Facing, Orientation};
pub use world::{GridWorld, WorldModel};
