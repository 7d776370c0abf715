//! Shared test fixtures: a small block palette, empty worlds, and policy
//! defaults.

use mend_config::{Config, WorldPolicy};
use mend_world::{
    BlockId, BlockKind, BlockRegistry, BlockState, BlockTypeDef, Facing, GridWorld, Orientation,
    SupportKind, WorldId,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

pub(crate) struct Palette {
    pub stone: BlockKind,
    pub dirt: BlockKind,
    pub torch: BlockKind,
    pub wall_torch: BlockKind,
    pub lantern: BlockKind,
    pub tnt: BlockKind,
    pub obsidian: BlockKind,
}

fn def(name: &str, support: SupportKind) -> BlockTypeDef {
    BlockTypeDef {
        name: name.to_string(),
        solid: support == SupportKind::FreeStanding,
        support,
        explosive: false,
        collateral: false,
        delayable: support == SupportKind::FreeStanding,
    }
}

pub(crate) fn palette_registry() -> (BlockRegistry, Palette) {
    let mut registry = BlockRegistry::new();
    let stone = registry.register(def("stone", SupportKind::FreeStanding)).unwrap();
    let dirt = registry.register(def("dirt", SupportKind::FreeStanding)).unwrap();
    let torch = registry.register(def("torch", SupportKind::OnFloor)).unwrap();
    let wall_torch = registry.register(def("wall_torch", SupportKind::OnWall)).unwrap();
    let lantern = registry.register(def("lantern", SupportKind::Hanging)).unwrap();
    let tnt = registry
        .register(BlockTypeDef {
            explosive: true,
            delayable: false,
            ..def("tnt", SupportKind::FreeStanding)
        })
        .unwrap();
    let obsidian = registry
        .register(BlockTypeDef {
            collateral: true,
            ..def("obsidian", SupportKind::FreeStanding)
        })
        .unwrap();

    (
        registry,
        Palette {
            stone,
            dirt,
            torch,
            wall_torch,
            lantern,
            tnt,
            obsidian,
        },
    )
}

pub(crate) fn empty_world() -> (GridWorld, WorldId) {
    let mut world = GridWorld::new();
    let id = world.add_world("overworld", 0, 256);
    (world, id)
}

pub(crate) fn state(kind: BlockKind) -> BlockState {
    BlockState::new(BlockId::new(kind, 0))
}

pub(crate) fn wall_state(kind: BlockKind, facing: Facing) -> BlockState {
    BlockState::oriented(BlockId::new(kind, 0), Orientation::from_facing(facing))
}

pub(crate) fn default_policy() -> WorldPolicy {
    Config::default().world_policy("overworld")
}

pub(crate) fn rng() -> Xoshiro256StarStar {
    Xoshiro256StarStar::seed_from_u64(42)
}
