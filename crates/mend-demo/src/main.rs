//! Demo binary that detonates an explosion in an in-memory world and replays
//! the healing timeline.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p mend-demo` for the default batch heal, or
//! `cargo run -p mend-demo -- --block-per-block true --wait 3` to watch the
//! incremental mode restore one block per tick.

use std::time::{Duration, Instant};

use clap::Parser;
use mend_config::{CliArgs, Config};
use mend_core::{HealScheduler, NoSuffocation};
use mend_world::{
    BlockId, BlockKind, BlockPos, BlockRegistry, BlockState, BlockTypeDef, Facing, GridWorld,
    Orientation, SupportKind, WorldId, WorldModel,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::info;

struct Palette {
    stone: BlockKind,
    planks: BlockKind,
    torch: BlockKind,
    wall_torch: BlockKind,
    tnt: BlockKind,
    obsidian: BlockKind,
}

fn build_registry() -> (BlockRegistry, Palette) {
    let mut registry = BlockRegistry::new();
    let solid = |name: &str| BlockTypeDef {
        name: name.to_string(),
        solid: true,
        support: SupportKind::FreeStanding,
        explosive: false,
        collateral: false,
        delayable: true,
    };

    let stone = registry.register(solid("stone")).expect("fresh registry");
    let planks = registry.register(solid("planks")).expect("fresh registry");
    let torch = registry
        .register(BlockTypeDef {
            name: "torch".to_string(),
            solid: false,
            support: SupportKind::OnFloor,
            explosive: false,
            collateral: false,
            delayable: false,
        })
        .expect("fresh registry");
    let wall_torch = registry
        .register(BlockTypeDef {
            name: "wall_torch".to_string(),
            solid: false,
            support: SupportKind::OnWall,
            explosive: false,
            collateral: false,
            delayable: false,
        })
        .expect("fresh registry");
    let tnt = registry
        .register(BlockTypeDef {
            explosive: true,
            delayable: false,
            ..solid("tnt")
        })
        .expect("fresh registry");
    let obsidian = registry
        .register(BlockTypeDef {
            collateral: true,
            ..solid("obsidian")
        })
        .expect("fresh registry");

    (
        registry,
        Palette {
            stone,
            planks,
            torch,
            wall_torch,
            tnt,
            obsidian,
        },
    )
}

/// A stone platform carrying a small planks hut with torches, a TNT cache,
/// and an obsidian corner.
fn build_world(palette: &Palette) -> (GridWorld, WorldId) {
    let mut world = GridWorld::new();
    let wid = world.add_world("overworld", 0, 256);
    let state = |kind: BlockKind| BlockState::new(BlockId::new(kind, 0));

    // Platform.
    for x in -6..=6 {
        for z in -6..=6 {
            world.set(BlockPos::new(x, 63, z, wid), state(palette.stone));
        }
    }

    // Hut walls.
    for x in -2i32..=2 {
        for z in -2i32..=2 {
            if x.abs() == 2 || z.abs() == 2 {
                for y in 64..=66 {
                    world.set(BlockPos::new(x, y, z, wid), state(palette.planks));
                }
            }
        }
    }

    // A standing torch inside, a wall torch on the east wall.
    world.set(BlockPos::new(0, 64, 0, wid), state(palette.torch));
    world.set(
        BlockPos::new(3, 65, 0, wid),
        BlockState::oriented(
            BlockId::new(palette.wall_torch, 0),
            Orientation::from_facing(Facing::East),
        ),
    );

    // TNT cache by the hut and an obsidian corner.
    world.set(BlockPos::new(-4, 64, 0, wid), state(palette.tnt));
    for z in 4..=5 {
        world.set(BlockPos::new(4, 64, z, wid), state(palette.obsidian));
    }

    (world, wid)
}

/// Everything within the blast sphere, with a ragged edge.
fn blast(world: &GridWorld, wid: WorldId, origin: BlockPos, radius: i32, seed: u64) -> Vec<BlockPos> {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let mut destroyed = Vec::new();
    for x in (origin.x - radius)..=(origin.x + radius) {
        for y in (origin.y - radius)..=(origin.y + radius) {
            for z in (origin.z - radius)..=(origin.z + radius) {
                let pos = BlockPos::new(x, y, z, wid);
                let distance = pos.distance(origin);
                if distance > f64::from(radius) || world.state_at(pos).is_none() {
                    continue;
                }
                // Full damage near the center, crumbling odds at the edge.
                if distance < f64::from(radius) - 1.0 || rng.gen_range(0.0..1.0) < 0.6 {
                    destroyed.push(pos);
                }
            }
        }
    }
    destroyed
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(|| dirs::config_dir().map(|d| d.join("mend")))
        .unwrap_or_else(|| std::path::PathBuf::from("."));
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|err| {
        eprintln!("config error: {err}; using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    mend_log::init_logging(None, cfg!(debug_assertions), Some(&config));

    // Collateral on, reproducible: the demo should tell the same story twice.
    config.collateral.enabled = true;
    config.collateral.radius = 4;
    config.collateral.chance_percent = 80;
    if config.collateral.seed.is_none() {
        config.collateral.seed = Some(42);
    }
    config.safety.prevent_chain_reaction = true;

    let (registry, palette) = build_registry();
    let (mut world, wid) = build_world(&palette);
    let intact = world.block_count();
    info!("built world with {} blocks", intact);

    let origin = BlockPos::new(0, 64, 0, wid);
    let destroyed = blast(&world, wid, origin, 4, 7);
    info!("explosion at ({}, {}, {}) destroys {} blocks", origin.x, origin.y, origin.z, destroyed.len());

    let t0 = Instant::now();
    let mut scheduler = HealScheduler::from_config(&config);
    scheduler
        .record_event(&mut world, &registry, &config, &destroyed, origin, t0)
        .expect("config validated at startup");

    let event = scheduler.events().last();
    if let Some(event) = event {
        info!(
            "recorded event: {} blocks queued, {} immediate, radius {:.1}",
            event.remaining(),
            scheduler.immediate_pending(),
            event.radius()
        );
    }

    // Replay the timeline with simulated one-second polls; nothing sleeps.
    let mut now = t0;
    let mut tick = 0u32;
    while !scheduler.is_idle() {
        now += Duration::from_secs(1);
        tick += 1;
        let before = world.block_count();
        scheduler.poll(&mut world, &mut NoSuffocation, &config, now);
        let after = world.block_count();
        if after != before {
            info!("t+{:>3}s: {} blocks restored ({} live)", tick, after - before, after);
        }
    }

    let lost = world.loot().len();
    info!(
        "healed in {} ticks: {} of {} blocks live, {} dropped as loot",
        tick,
        world.block_count(),
        intact,
        lost
    );
}
